//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the attendance ledger, payroll calculator and payroll
//! run can report. Every variant carries enough context (employee, date,
//! month) to be shown to a user as-is.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::NoOpenShift {
///     employee_id: "E1".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
/// };
/// assert_eq!(error.to_string(), "No open shift for employee 'E1' on 2024-03-01");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A time-of-day string was not in `HH:MM` form.
    #[error("Invalid time format '{value}': expected HH:MM")]
    InvalidTimeFormat {
        /// The rejected input.
        value: String,
    },

    /// A shift's time-out was not strictly after its time-in.
    #[error("Invalid shift: time out {time_out} must be after time in {time_in}")]
    InvalidShiftOrder {
        /// The shift start as given.
        time_in: String,
        /// The shift end as given.
        time_out: String,
    },

    /// The employee already has an open shift on this date.
    #[error("Employee '{employee_id}' already has an open shift on {date}")]
    DuplicateOpenShift {
        /// The employee identifier.
        employee_id: String,
        /// The date of the open shift.
        date: NaiveDate,
    },

    /// Clock-out was requested but no shift is open.
    #[error("No open shift for employee '{employee_id}' on {date}")]
    NoOpenShift {
        /// The employee identifier.
        employee_id: String,
        /// The date that was searched.
        date: NaiveDate,
    },

    /// A payroll line already exists and the run policy rejects re-runs.
    #[error("Payroll already generated for employee '{employee_id}' for {year}-{month:02}")]
    PayrollAlreadyGenerated {
        /// The employee identifier.
        employee_id: String,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
    },

    /// The employee has no usable hourly rate.
    #[error("Employee '{employee_id}' has no valid hourly rate")]
    MissingRate {
        /// The employee identifier.
        employee_id: String,
    },

    /// The employee is deactivated.
    #[error("Employee '{employee_id}' is inactive")]
    EmployeeInactive {
        /// The employee identifier.
        employee_id: String,
    },

    /// No employee with this identifier exists.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee identifier.
        employee_id: String,
    },

    /// An employee with this identifier already exists.
    #[error("Employee already exists: {employee_id}")]
    DuplicateEmployee {
        /// The employee identifier.
        employee_id: String,
    },

    /// An employee change request was empty or held invalid values.
    #[error("Invalid employee update: {message}")]
    InvalidEmployeeUpdate {
        /// A description of what was wrong.
        message: String,
    },

    /// An adjustment request held an unusable amount.
    #[error("Invalid adjustment: {message}")]
    InvalidAdjustment {
        /// A description of what was wrong.
        message: String,
    },

    /// A pay amount for an employee-month exceeded the decimal range.
    #[error("Pay amount overflow for employee '{employee_id}' for {year}-{month:02}")]
    AmountOverflow {
        /// The employee identifier.
        employee_id: String,
        /// The payroll year.
        year: i32,
        /// The payroll month (1-12).
        month: u32,
    },

    /// A year/month pair does not name a calendar month.
    #[error("Invalid payroll month {year}-{month}")]
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// The storage collaborator failed.
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
