//! Storage collaborator interface.
//!
//! The engine never owns a database handle. Every component takes a
//! [`Storage`] implementation at construction and reads and writes strongly
//! typed records through it. Each method is atomic on its own; the payroll run
//! relies on [`Storage::write_payroll_line`] replacing a prior line for the
//! same employee-month in a single step.

mod memory;

pub use memory::InMemoryStore;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{
    AdjustmentEntry, Employee, EmployeeUpdate, NewAdjustment, NewEmployee, NewShift, PayMonth,
    PayrollLine, ShiftRecord,
};

/// An inclusive date window used to select shift records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First date included, unbounded when `None`.
    pub start: Option<NaiveDate>,
    /// Last date included, unbounded when `None`.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A window covering every date.
    pub const ALL: DateRange = DateRange {
        start: None,
        end: None,
    };

    /// A window covering a single date.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: Some(date),
            end: Some(date),
        }
    }

    /// A window covering every day of a pay month.
    pub fn month(month: PayMonth) -> Self {
        Self {
            start: Some(month.first_day()),
            end: Some(month.last_day()),
        }
    }

    /// Checks if a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// Typed persistence used by the attendance ledger, the payroll calculator
/// and the payroll run.
pub trait Storage: Send + Sync {
    /// Inserts a shift and returns its identifier. Identifiers increase in
    /// insertion order.
    fn insert_shift(&self, shift: NewShift) -> EngineResult<u64>;

    /// Overwrites the stored shift with the same identifier.
    fn update_shift(&self, shift: &ShiftRecord) -> EngineResult<()>;

    /// Returns an employee's shifts inside `range`, ordered by date, then
    /// time-in, then identifier.
    fn read_shifts(&self, employee_id: &str, range: DateRange) -> EngineResult<Vec<ShiftRecord>>;

    /// Inserts an adjustment entry and returns its identifier.
    fn insert_adjustment(&self, adjustment: NewAdjustment) -> EngineResult<u64>;

    /// Returns the adjustment entries recorded for an employee-month.
    fn read_adjustments(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Vec<AdjustmentEntry>>;

    /// Returns the persisted payroll line for an employee-month, if any.
    fn read_payroll_line(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<Option<PayrollLine>>;

    /// Returns every persisted line for a month, ordered by employee.
    fn read_payroll_lines(&self, month: PayMonth) -> EngineResult<Vec<PayrollLine>>;

    /// Persists a payroll line, atomically replacing any line already stored
    /// for the same employee-month.
    fn write_payroll_line(&self, line: &PayrollLine) -> EngineResult<()>;

    /// Registers an employee. Fails with `DuplicateEmployee` if the id exists.
    fn insert_employee(&self, employee: NewEmployee) -> EngineResult<Employee>;

    /// Returns an employee by identifier.
    fn read_employee(&self, employee_id: &str) -> EngineResult<Option<Employee>>;

    /// Returns active employees ordered by identifier.
    fn list_active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Applies a validated change request and returns the updated record.
    fn update_employee(&self, employee_id: &str, update: &EmployeeUpdate)
    -> EngineResult<Employee>;
}
