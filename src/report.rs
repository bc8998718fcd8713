//! Monthly reporting over persisted payroll lines.
//!
//! Reports only read what a payroll run has already written; they never
//! compute or persist lines themselves.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{PayMonth, PayrollExportRow, PayrollLine, ShiftRecord};
use crate::storage::{DateRange, Storage};

/// Name used in export rows when the employee record is gone.
pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown";

/// Persisted payroll for a month alongside attendance totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    /// The reported month.
    pub month: PayMonth,
    /// Persisted lines in employee id order.
    pub payroll: Vec<PayrollLine>,
    /// Closed-shift hours for the month keyed by employee id.
    pub attendance_summary: BTreeMap<String, Decimal>,
}

impl MonthlyReport {
    /// Sum of net pay across all lines.
    pub fn total_net_pay(&self) -> Decimal {
        self.payroll.iter().map(|l| l.net_pay).sum()
    }
}

/// Builds the monthly report for every employee with a persisted line.
///
/// Attendance totals are re-read from the ledger, so hours booked after the
/// run show up here even though the stored line does not reflect them.
pub fn monthly_report<S: Storage + ?Sized>(store: &S, month: PayMonth) -> EngineResult<MonthlyReport> {
    let payroll = store.read_payroll_lines(month)?;

    let mut attendance_summary = BTreeMap::new();
    for line in &payroll {
        let shifts = store.read_shifts(&line.employee_id, DateRange::month(month))?;
        let total: Decimal = shifts.iter().map(ShiftRecord::worked_hours).sum();
        attendance_summary.insert(line.employee_id.clone(), total);
    }

    debug!(month = %month, lines = payroll.len(), "Monthly report built");

    Ok(MonthlyReport {
        month,
        payroll,
        attendance_summary,
    })
}

/// Returns export rows for the month's persisted lines.
pub fn export_rows<S: Storage + ?Sized>(
    store: &S,
    month: PayMonth,
) -> EngineResult<Vec<PayrollExportRow>> {
    let lines = store.read_payroll_lines(month)?;
    let mut rows = Vec::with_capacity(lines.len());
    for line in &lines {
        let full_name = store
            .read_employee(&line.employee_id)?
            .map(|e| e.full_name)
            .unwrap_or_else(|| UNKNOWN_EMPLOYEE_NAME.to_string());
        rows.push(line.export_row(&full_name));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceLedger;
    use crate::calculation::PayrollRun;
    use crate::clock::FixedClock;
    use crate::config::PayrollPolicy;
    use crate::models::{EmployeeUpdate, NewEmployee};
    use crate::storage::InMemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn march() -> PayMonth {
        PayMonth::new(2024, 3).unwrap()
    }

    fn paid_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (id, name) in [("E1", "Ada Lovelace"), ("E2", "Grace Hopper")] {
            store
                .insert_employee(NewEmployee {
                    id: id.to_string(),
                    full_name: name.to_string(),
                    role: "Engineer".to_string(),
                    department: None,
                    contact: None,
                    hourly_rate: Some(dec("20")),
                })
                .unwrap();
        }
        let ledger = AttendanceLedger::new(&store);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        ledger.add_full_shift("E1", date, "09:00", "17:30").unwrap();
        ledger.add_full_shift("E2", date, "09:00", "12:00").unwrap();

        let policy = PayrollPolicy::default();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();
        store
    }

    #[test]
    fn test_monthly_report_totals() {
        let store = paid_store();
        let report = monthly_report(&store, march()).unwrap();

        assert_eq!(report.payroll.len(), 2);
        assert_eq!(report.attendance_summary["E1"], dec("8.5"));
        assert_eq!(report.attendance_summary["E2"], dec("3"));
        assert_eq!(report.total_net_pay(), dec("230"));
    }

    #[test]
    fn test_monthly_report_counts_only_closed_shifts_in_month() {
        let store = paid_store();
        let ledger = AttendanceLedger::new(&store);
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        ledger.add_full_shift("E1", date("2024-02-29"), "09:00", "17:00").unwrap();
        ledger.add_full_shift("E1", date("2024-03-31"), "09:00", "10:30").unwrap();
        ledger.add_full_shift("E1", date("2024-04-01"), "09:00", "17:00").unwrap();
        ledger.clock_in("E2", date("2024-03-06"), "09:00").unwrap();

        let report = monthly_report(&store, march()).unwrap();
        assert_eq!(report.attendance_summary["E1"], dec("10"));
        assert_eq!(report.attendance_summary["E2"], dec("3"));
    }

    #[test]
    fn test_monthly_report_empty_month() {
        let store = paid_store();
        let report = monthly_report(&store, PayMonth::new(2024, 4).unwrap()).unwrap();
        assert!(report.payroll.is_empty());
        assert!(report.attendance_summary.is_empty());
    }

    #[test]
    fn test_export_rows_use_current_names() {
        let store = paid_store();
        store
            .update_employee(
                "E2",
                &EmployeeUpdate {
                    full_name: Some("Grace B. Hopper".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let rows = export_rows(&store, march()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].full_name, "Ada Lovelace");
        assert_eq!(rows[0].gross_pay, dec("170"));
        assert_eq!(rows[1].full_name, "Grace B. Hopper");
    }
}
