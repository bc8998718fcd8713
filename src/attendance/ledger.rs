//! Attendance ledger.
//!
//! The ledger is the only component that creates or mutates shift records.
//! It enforces at most one open shift per employee per date and aggregates
//! closed shifts into daily hour totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{parse_time_of_day, shift_hours, validate_shift};
use crate::error::{EngineError, EngineResult};
use crate::models::{NewShift, ShiftOrigin, ShiftRecord};
use crate::storage::{DateRange, Storage};

/// Records clock events and answers hour-total queries for employees.
///
/// Operations on one employee must be applied in the order they were issued;
/// the duplicate-open-shift and no-open-shift checks read then write, so
/// callers sharing a store across threads serialize ledger writes.
///
/// # Example
///
/// ```
/// use payroll_engine::attendance::AttendanceLedger;
/// use payroll_engine::storage::InMemoryStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::new();
/// let ledger = AttendanceLedger::new(&store);
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
///
/// ledger.clock_in("E1", date, "09:00").unwrap();
/// ledger.clock_out("E1", date, "17:30").unwrap();
/// assert_eq!(ledger.daily_hours("E1", date).unwrap(), Decimal::new(85, 1));
/// ```
pub struct AttendanceLedger<'a, S: Storage + ?Sized> {
    store: &'a S,
}

impl<'a, S: Storage + ?Sized> AttendanceLedger<'a, S> {
    /// Creates a ledger over the given store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Opens a shift.
    ///
    /// Fails with `DuplicateOpenShift` if the employee already has an open
    /// shift on `date`, whatever the time given, and otherwise with
    /// `InvalidTimeFormat` for a malformed time. Returns the new record's
    /// identifier.
    pub fn clock_in(&self, employee_id: &str, date: NaiveDate, time_in: &str) -> EngineResult<u64> {
        if self.latest_open_shift(employee_id, date)?.is_some() {
            warn!(employee_id = %employee_id, date = %date, "Clock-in rejected: shift already open");
            return Err(EngineError::DuplicateOpenShift {
                employee_id: employee_id.to_string(),
                date,
            });
        }

        let parsed_in = parse_time_of_day(time_in)?;

        let id = self.store.insert_shift(NewShift {
            employee_id: employee_id.to_string(),
            date,
            time_in: parsed_in,
            time_out: None,
            duration_hours: None,
            origin: ShiftOrigin::Clock,
        })?;

        info!(employee_id = %employee_id, date = %date, shift_id = id, time_in = %time_in, "Clocked in");
        Ok(id)
    }

    /// Closes the most recent open shift for the employee on `date`.
    ///
    /// Fails with `NoOpenShift` if nothing is open, whatever the time given.
    /// With an open shift, fails with `InvalidTimeFormat` / `InvalidShiftOrder`
    /// if the time-out does not validate against the shift's time-in. On
    /// success the record's time-out and duration are written once and the
    /// closed record is returned.
    pub fn clock_out(
        &self,
        employee_id: &str,
        date: NaiveDate,
        time_out: &str,
    ) -> EngineResult<ShiftRecord> {
        let Some(mut shift) = self.latest_open_shift(employee_id, date)? else {
            warn!(employee_id = %employee_id, date = %date, "Clock-out rejected: no open shift");
            return Err(EngineError::NoOpenShift {
                employee_id: employee_id.to_string(),
                date,
            });
        };

        let parsed_out = parse_time_of_day(time_out)?;
        let duration = shift_hours(shift.time_in, parsed_out)?;
        shift.time_out = Some(parsed_out);
        shift.duration_hours = Some(duration);
        self.store.update_shift(&shift)?;

        info!(
            employee_id = %employee_id,
            date = %date,
            shift_id = shift.id,
            duration_hours = %duration,
            "Clocked out"
        );
        Ok(shift)
    }

    /// Records a complete shift in one step, for backfill and corrections.
    ///
    /// The record is closed on insert, so no open-shift check applies. It is
    /// marked with [`ShiftOrigin::Correction`].
    pub fn add_full_shift(
        &self,
        employee_id: &str,
        date: NaiveDate,
        time_in: &str,
        time_out: &str,
    ) -> EngineResult<u64> {
        let validated = validate_shift(time_in, time_out)?;

        let id = self.store.insert_shift(NewShift {
            employee_id: employee_id.to_string(),
            date,
            time_in: validated.time_in,
            time_out: Some(validated.time_out),
            duration_hours: Some(validated.duration_hours),
            origin: ShiftOrigin::Correction,
        })?;

        info!(
            employee_id = %employee_id,
            date = %date,
            shift_id = id,
            duration_hours = %validated.duration_hours,
            "Full shift recorded"
        );
        Ok(id)
    }

    /// Returns the summed duration of closed shifts on `date`.
    ///
    /// Open shifts contribute nothing until they are closed. A date with no
    /// shifts yields zero.
    pub fn daily_hours(&self, employee_id: &str, date: NaiveDate) -> EngineResult<Decimal> {
        let shifts = self.store.read_shifts(employee_id, DateRange::day(date))?;
        let total: Decimal = shifts.iter().map(ShiftRecord::worked_hours).sum();
        debug!(employee_id = %employee_id, date = %date, shifts = shifts.len(), total_hours = %total, "Daily hours");
        Ok(total)
    }

    /// Returns every shift for the employee, ordered by date then time-in.
    pub fn list_for_employee(&self, employee_id: &str) -> EngineResult<Vec<ShiftRecord>> {
        self.store.read_shifts(employee_id, DateRange::ALL)
    }

    /// Returns the employee's shifts within an optional inclusive window.
    pub fn list_between(
        &self,
        employee_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> EngineResult<Vec<ShiftRecord>> {
        self.store.read_shifts(employee_id, DateRange { start, end })
    }

    /// Finds the open shift with the highest identifier on `date`.
    fn latest_open_shift(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<ShiftRecord>> {
        let shifts = self.store.read_shifts(employee_id, DateRange::day(date))?;
        Ok(shifts
            .into_iter()
            .filter(ShiftRecord::is_open)
            .max_by_key(|s| s.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_clock_in_then_out() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        let closed = ledger.clock_out("E1", date, "17:30").unwrap();

        assert_eq!(closed.duration_hours, Some(dec("8.5")));
        assert!(!closed.is_open());
        assert_eq!(ledger.daily_hours("E1", date).unwrap(), dec("8.5"));
    }

    #[test]
    fn test_second_clock_in_is_duplicate() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        match ledger.clock_in("E1", date, "09:00") {
            Err(EngineError::DuplicateOpenShift { employee_id, date: d }) => {
                assert_eq!(employee_id, "E1");
                assert_eq!(d, date);
            }
            other => panic!("Expected DuplicateOpenShift, got {:?}", other),
        }
        // nothing extra was written
        assert_eq!(ledger.list_for_employee("E1").unwrap().len(), 1);
    }

    #[test]
    fn test_open_shift_on_other_date_does_not_block() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);

        ledger.clock_in("E1", make_date("2024-03-01"), "09:00").unwrap();
        assert!(ledger.clock_in("E1", make_date("2024-03-02"), "09:00").is_ok());
        assert!(ledger.clock_in("E2", make_date("2024-03-01"), "09:00").is_ok());
    }

    #[test]
    fn test_clock_in_after_close_allows_split_shift() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "08:00").unwrap();
        ledger.clock_out("E1", date, "12:00").unwrap();
        ledger.clock_in("E1", date, "13:00").unwrap();
        ledger.clock_out("E1", date, "17:15").unwrap();

        assert_eq!(ledger.daily_hours("E1", date).unwrap(), dec("8.25"));
    }

    #[test]
    fn test_clock_out_without_open_shift() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);

        match ledger.clock_out("E1", make_date("2024-03-01"), "17:00") {
            Err(EngineError::NoOpenShift { employee_id, .. }) => assert_eq!(employee_id, "E1"),
            other => panic!("Expected NoOpenShift, got {:?}", other),
        }
    }

    #[test]
    fn test_clock_out_twice_fails_second_time() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        ledger.clock_out("E1", date, "17:00").unwrap();
        assert!(matches!(
            ledger.clock_out("E1", date, "18:00"),
            Err(EngineError::NoOpenShift { .. })
        ));
        // the accepted duration is untouched
        assert_eq!(ledger.daily_hours("E1", date).unwrap(), dec("8"));
    }

    #[test]
    fn test_clock_out_before_clock_in_keeps_shift_open() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        assert!(matches!(
            ledger.clock_out("E1", date, "08:00"),
            Err(EngineError::InvalidShiftOrder { .. })
        ));

        let shifts = ledger.list_for_employee("E1").unwrap();
        assert!(shifts[0].is_open());
        assert!(ledger.clock_out("E1", date, "10:00").is_ok());
    }

    #[test]
    fn test_malformed_times_rejected() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        assert!(matches!(
            ledger.clock_in("E1", date, "9am"),
            Err(EngineError::InvalidTimeFormat { .. })
        ));
        ledger.clock_in("E1", date, "09:00").unwrap();
        assert!(matches!(
            ledger.clock_out("E1", date, "5pm"),
            Err(EngineError::InvalidTimeFormat { .. })
        ));
        // The open shift is left untouched by the rejected clock-out
        assert!(ledger.list_for_employee("E1").unwrap()[0].is_open());
    }

    #[test]
    fn test_clock_out_malformed_time_without_open_shift_is_no_open_shift() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        let result = ledger.clock_out("E1", date, "5pm");
        assert!(matches!(result, Err(EngineError::NoOpenShift { .. })));
    }

    #[test]
    fn test_second_clock_in_with_malformed_time_is_duplicate() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        let result = ledger.clock_in("E1", date, "nine");
        assert!(matches!(result, Err(EngineError::DuplicateOpenShift { .. })));
        assert_eq!(ledger.list_for_employee("E1").unwrap().len(), 1);
    }

    #[test]
    fn test_clock_out_picks_highest_open_id() {
        let store = InMemoryStore::new();
        let date = make_date("2024-03-01");
        // two open shifts can only appear through direct storage writes
        for time_in in ["08:00", "10:00"] {
            store
                .insert_shift(NewShift {
                    employee_id: "E1".to_string(),
                    date,
                    time_in: parse_time_of_day(time_in).unwrap(),
                    time_out: None,
                    duration_hours: None,
                    origin: ShiftOrigin::Clock,
                })
                .unwrap();
        }

        let ledger = AttendanceLedger::new(&store);
        let closed = ledger.clock_out("E1", date, "12:00").unwrap();
        assert_eq!(closed.time_in, parse_time_of_day("10:00").unwrap());
        assert_eq!(closed.duration_hours, Some(dec("2")));
    }

    #[test]
    fn test_open_shift_contributes_zero() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "09:00").unwrap();
        assert_eq!(ledger.daily_hours("E1", date).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_open_shift_excluded_alongside_closed() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.add_full_shift("E1", date, "06:00", "10:00").unwrap();
        ledger.clock_in("E1", date, "11:00").unwrap();
        assert_eq!(ledger.daily_hours("E1", date).unwrap(), dec("4"));
    }

    #[test]
    fn test_no_shifts_is_zero() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        assert_eq!(
            ledger.daily_hours("E1", make_date("2024-03-01")).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_add_full_shift_bypasses_open_check() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        ledger.clock_in("E1", date, "13:00").unwrap();
        ledger.add_full_shift("E1", date, "08:00", "12:00").unwrap();

        let shifts = ledger.list_for_employee("E1").unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].origin, ShiftOrigin::Correction);
        assert_eq!(shifts[0].duration_hours, Some(dec("4")));
        // the open shift can still be closed
        assert!(ledger.clock_out("E1", date, "17:00").is_ok());
    }

    #[test]
    fn test_add_full_shift_validates() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        let date = make_date("2024-03-01");

        assert!(matches!(
            ledger.add_full_shift("E1", date, "12:00", "08:00"),
            Err(EngineError::InvalidShiftOrder { .. })
        ));
        assert!(ledger.list_for_employee("E1").unwrap().is_empty());
    }

    #[test]
    fn test_list_for_employee_ordering() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);

        ledger.add_full_shift("E1", make_date("2024-03-02"), "08:00", "09:00").unwrap();
        ledger.add_full_shift("E1", make_date("2024-03-01"), "14:00", "15:00").unwrap();
        ledger.add_full_shift("E1", make_date("2024-03-01"), "07:00", "08:00").unwrap();
        ledger.add_full_shift("E2", make_date("2024-03-01"), "07:00", "08:00").unwrap();

        let shifts = ledger.list_for_employee("E1").unwrap();
        let order: Vec<String> = shifts
            .iter()
            .map(|s| format!("{} {}", s.date, s.time_in.format("%H:%M")))
            .collect();
        assert_eq!(
            order,
            vec!["2024-03-01 07:00", "2024-03-01 14:00", "2024-03-02 08:00"]
        );
    }

    #[test]
    fn test_list_between_window() {
        let store = InMemoryStore::new();
        let ledger = AttendanceLedger::new(&store);
        for day in ["2024-03-01", "2024-03-05", "2024-03-09"] {
            ledger.add_full_shift("E1", make_date(day), "09:00", "10:00").unwrap();
        }

        let shifts = ledger
            .list_between("E1", Some(make_date("2024-03-02")), Some(make_date("2024-03-09")))
            .unwrap();
        assert_eq!(shifts.len(), 2);

        let all = ledger.list_between("E1", None, None).unwrap();
        assert_eq!(all.len(), 3);
    }
}
