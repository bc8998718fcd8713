//! Monthly payroll run.
//!
//! Drives the [`PayrollCalculator`] across every active employee for a month
//! and persists one [`PayrollLine`] per employee, honouring the configured
//! [`RerunPolicy`].

use tracing::{info, warn};

use crate::clock::Clock;
use crate::config::{PayrollPolicy, RerunPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayMonth, PayrollLine};
use crate::storage::Storage;

use super::payroll_calculator::PayrollCalculator;

/// An employee the run could not pay.
#[derive(Debug)]
pub struct RunFailure {
    /// The employee that failed.
    pub employee_id: String,
    /// Why no line was written for them.
    pub error: EngineError,
}

/// Outcome of a payroll run.
#[derive(Debug)]
pub struct PayrollRunReport {
    /// The month that was run.
    pub month: PayMonth,
    /// Lines persisted by this run, in employee id order.
    pub generated: Vec<PayrollLine>,
    /// Employees skipped with their error, in employee id order.
    pub failures: Vec<RunFailure>,
}

impl PayrollRunReport {
    /// Returns true when every active employee received a line.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Orchestrates payroll generation for a whole month.
pub struct PayrollRun<'a, S: Storage + ?Sized> {
    store: &'a S,
    policy: &'a PayrollPolicy,
    clock: &'a dyn Clock,
}

impl<'a, S: Storage + ?Sized> PayrollRun<'a, S> {
    /// Creates a run over the given store, policy and time source.
    pub fn new(store: &'a S, policy: &'a PayrollPolicy, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Runs payroll for `year`/`month`.
    ///
    /// Per-employee failures (`MissingRate`, `PayrollAlreadyGenerated`,
    /// `AmountOverflow`, storage errors while paying one employee) are collected in the report
    /// and do not stop the batch. Only an invalid month or a failure to list
    /// employees returns an error.
    pub fn run(&self, year: i32, month: u32) -> EngineResult<PayrollRunReport> {
        let month = PayMonth::new(year, month)?;
        self.run_month(month)
    }

    /// Runs payroll for an already-validated month.
    pub fn run_month(&self, month: PayMonth) -> EngineResult<PayrollRunReport> {
        let employees = self.store.list_active_employees()?;
        info!(
            month = %month,
            employees = employees.len(),
            rerun_policy = ?self.policy.rerun_policy,
            "Starting payroll run"
        );

        let mut generated = Vec::new();
        let mut failures = Vec::new();

        for employee in &employees {
            match self.pay_employee(employee, month) {
                Ok(line) => generated.push(line),
                Err(error) => {
                    warn!(
                        employee_id = %employee.id,
                        month = %month,
                        error = %error,
                        "Payroll run skipped employee"
                    );
                    failures.push(RunFailure {
                        employee_id: employee.id.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            month = %month,
            generated = generated.len(),
            failed = failures.len(),
            "Payroll run completed"
        );

        Ok(PayrollRunReport {
            month,
            generated,
            failures,
        })
    }

    fn pay_employee(&self, employee: &Employee, month: PayMonth) -> EngineResult<PayrollLine> {
        let rate = employee.payable_rate()?;

        if self.policy.rerun_policy == RerunPolicy::Reject
            && self.store.read_payroll_line(&employee.id, month)?.is_some()
        {
            return Err(EngineError::PayrollAlreadyGenerated {
                employee_id: employee.id.clone(),
                year: month.year(),
                month: month.month(),
            });
        }

        let calculator = PayrollCalculator::new(self.store, self.policy, self.clock);
        let line = calculator.compute_with_trace(&employee.id, month, rate)?.line;
        self.store.write_payroll_line(&line)?;

        info!(
            employee_id = %employee.id,
            month = %month,
            net_pay = %line.net_pay,
            "Payroll line generated"
        );
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::AttendanceLedger;
    use crate::clock::FixedClock;
    use crate::models::{EmployeeUpdate, NewAdjustment, NewEmployee};
    use crate::storage::InMemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn clock_at(hour: u32) -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap())
    }

    fn march() -> PayMonth {
        PayMonth::new(2024, 3).unwrap()
    }

    fn hire(store: &InMemoryStore, id: &str, rate: Option<&str>) {
        store
            .insert_employee(NewEmployee {
                id: id.to_string(),
                full_name: format!("Employee {}", id),
                role: "Staff".to_string(),
                department: None,
                contact: None,
                hourly_rate: rate.map(dec),
            })
            .unwrap();
    }

    fn work_days(store: &InMemoryStore, id: &str, days: u32) {
        let ledger = AttendanceLedger::new(store);
        for day in 1..=days {
            let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
            ledger.add_full_shift(id, date, "08:00", "18:00").unwrap();
        }
    }

    /// E1 and E2 are payable, E3 has no rate.
    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        hire(&store, "E1", Some("20"));
        hire(&store, "E2", Some("25.50"));
        hire(&store, "E3", None);
        work_days(&store, "E1", 17);
        work_days(&store, "E2", 4);
        store
            .insert_adjustment(NewAdjustment {
                employee_id: "E1".to_string(),
                year: 2024,
                month: 3,
                description: "Uniform".to_string(),
                amount: dec("-50"),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_run_pays_active_employees_and_isolates_failures() {
        let store = seeded_store();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);

        let report = PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();

        assert_eq!(report.month, march());
        assert_eq!(report.generated.len(), 2);
        assert_eq!(report.generated[0].employee_id, "E1");
        assert_eq!(report.generated[0].net_pay, dec("3450"));
        assert_eq!(report.generated[1].employee_id, "E2");
        assert_eq!(report.generated[1].gross_pay, dec("1020"));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].employee_id, "E3");
        assert!(matches!(
            report.failures[0].error,
            EngineError::MissingRate { .. }
        ));
        assert!(!report.is_complete());

        let persisted = store.read_payroll_lines(march()).unwrap();
        assert_eq!(persisted, report.generated);
    }

    #[test]
    fn test_inactive_employees_skipped() {
        let store = seeded_store();
        store
            .update_employee(
                "E2",
                &EmployeeUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);

        let report = PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();

        assert_eq!(report.generated.len(), 1);
        assert_eq!(report.generated[0].employee_id, "E1");
        assert!(store.read_payroll_line("E2", march()).unwrap().is_none());
    }

    #[test]
    fn test_reject_policy_rerun_rejects_every_paid_employee() {
        let store = seeded_store();
        let policy = PayrollPolicy::default();
        let first_clock = clock_at(8);
        let first = PayrollRun::new(&store, &policy, &first_clock)
            .run(2024, 3)
            .unwrap();

        let second_clock = clock_at(9);
        let second = PayrollRun::new(&store, &policy, &second_clock)
            .run(2024, 3)
            .unwrap();

        assert!(second.generated.is_empty());
        let rejected: Vec<&str> = second
            .failures
            .iter()
            .filter(|f| matches!(f.error, EngineError::PayrollAlreadyGenerated { .. }))
            .map(|f| f.employee_id.as_str())
            .collect();
        assert_eq!(rejected, vec!["E1", "E2"]);

        // Stored lines still carry the first run's timestamp
        assert_eq!(store.read_payroll_lines(march()).unwrap(), first.generated);
    }

    #[test]
    fn test_replace_policy_rerun_yields_identical_lines() {
        let store = seeded_store();
        let policy = PayrollPolicy::default().with_rerun_policy(RerunPolicy::Replace);
        let clock = clock_at(8);
        let run = PayrollRun::new(&store, &policy, &clock);

        let first = run.run(2024, 3).unwrap();
        let second = run.run(2024, 3).unwrap();

        assert_eq!(first.generated, second.generated);
        assert_eq!(store.read_payroll_lines(march()).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_policy_picks_up_new_attendance() {
        let store = seeded_store();
        let policy = PayrollPolicy::default().with_rerun_policy(RerunPolicy::Replace);
        let clock = clock_at(8);
        let run = PayrollRun::new(&store, &policy, &clock);

        run.run(2024, 3).unwrap();
        AttendanceLedger::new(&store)
            .add_full_shift("E2", NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), "09:00", "11:00")
            .unwrap();
        run.run(2024, 3).unwrap();

        let line = store.read_payroll_line("E2", march()).unwrap().unwrap();
        assert_eq!(line.regular_hours, dec("42"));
    }

    #[test]
    fn test_rate_snapshot_taken_at_run_time() {
        let store = seeded_store();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);
        PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();

        store
            .update_employee(
                "E1",
                &EmployeeUpdate {
                    hourly_rate: Some(dec("99")),
                    ..Default::default()
                },
            )
            .unwrap();

        let line = store.read_payroll_line("E1", march()).unwrap().unwrap();
        assert_eq!(line.hourly_rate, dec("20"));
    }

    #[test]
    fn test_empty_registry() {
        let store = InMemoryStore::new();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);

        let report = PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();
        assert!(report.generated.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_invalid_month_aborts() {
        let store = seeded_store();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);

        assert!(matches!(
            PayrollRun::new(&store, &policy, &clock).run(2024, 0),
            Err(EngineError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_overflowing_employee_fails_alone() {
        let store = seeded_store();
        // Inserted straight into storage, past the registry's rate bound
        hire(&store, "E4", Some("79228162514264337593543950335"));
        AttendanceLedger::new(&store)
            .add_full_shift("E4", NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), "09:00", "11:00")
            .unwrap();
        let policy = PayrollPolicy::default();
        let clock = clock_at(8);

        let report = PayrollRun::new(&store, &policy, &clock).run(2024, 3).unwrap();

        let paid: Vec<&str> = report
            .generated
            .iter()
            .map(|line| line.employee_id.as_str())
            .collect();
        assert_eq!(paid, vec!["E1", "E2"]);

        let overflowed: Vec<&str> = report
            .failures
            .iter()
            .filter(|f| matches!(f.error, EngineError::AmountOverflow { .. }))
            .map(|f| f.employee_id.as_str())
            .collect();
        assert_eq!(overflowed, vec!["E4"]);
        assert!(store.read_payroll_line("E4", march()).unwrap().is_none());

        // The store stays usable after the run
        AttendanceLedger::new(&store)
            .clock_in("E1", NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), "09:00")
            .unwrap();
    }
}
