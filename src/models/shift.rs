//! Shift record model and related types.
//!
//! This module defines the [`ShiftRecord`] stored by the attendance ledger and
//! the [`NewShift`] input used to create one.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a shift record entered the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftOrigin {
    /// Opened by clock-in, closed by clock-out.
    Clock,
    /// Entered as a complete shift by an administrator (backfill or correction).
    Correction,
}

/// A shift recorded for an employee on a date.
///
/// A record with no `time_out` is open. Open records carry no duration; they
/// are not zero-hour shifts and contribute nothing to daily totals until
/// closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Storage-assigned identifier, increasing in insertion order.
    pub id: u64,
    /// The employee this shift belongs to.
    pub employee_id: String,
    /// The date the shift was worked.
    pub date: NaiveDate,
    /// Start time of day.
    pub time_in: NaiveTime,
    /// End time of day, absent while the shift is open.
    pub time_out: Option<NaiveTime>,
    /// Worked hours rounded to 2 decimals, absent while the shift is open.
    pub duration_hours: Option<Decimal>,
    /// How the record was created.
    pub origin: ShiftOrigin,
}

impl ShiftRecord {
    /// Returns true while the shift has no time-out.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{ShiftOrigin, ShiftRecord};
    /// use chrono::{NaiveDate, NaiveTime};
    ///
    /// let shift = ShiftRecord {
    ///     id: 1,
    ///     employee_id: "E1".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ///     time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ///     time_out: None,
    ///     duration_hours: None,
    ///     origin: ShiftOrigin::Clock,
    /// };
    /// assert!(shift.is_open());
    /// assert_eq!(shift.worked_hours(), rust_decimal::Decimal::ZERO);
    /// ```
    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }

    /// Returns the hours this shift contributes to aggregations: its duration
    /// once closed, zero while open.
    pub fn worked_hours(&self) -> Decimal {
        self.duration_hours.unwrap_or(Decimal::ZERO)
    }
}

/// Input for inserting a shift record; storage assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    /// The employee this shift belongs to.
    pub employee_id: String,
    /// The date the shift was worked.
    pub date: NaiveDate,
    /// Start time of day.
    pub time_in: NaiveTime,
    /// End time of day, `None` for an open shift.
    pub time_out: Option<NaiveTime>,
    /// Worked hours, `None` for an open shift.
    pub duration_hours: Option<Decimal>,
    /// How the record is being created.
    pub origin: ShiftOrigin,
}

impl NewShift {
    /// Attaches the storage-assigned identifier.
    pub fn with_id(self, id: u64) -> ShiftRecord {
        ShiftRecord {
            id,
            employee_id: self.employee_id,
            date: self.date,
            time_in: self.time_in,
            time_out: self.time_out,
            duration_hours: self.duration_hours,
            origin: self.origin,
        }
    }
}
