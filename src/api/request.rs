//! Request types for the payroll API.
//!
//! Times of day travel as `HH:MM` strings so that format errors surface as
//! `INVALID_TIME_FORMAT` rather than as JSON errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{NewAdjustment, PayMonth};

/// Request body for `POST /attendance/clock-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockInRequest {
    /// The employee clocking in.
    pub employee_id: String,
    /// The work date.
    pub date: NaiveDate,
    /// Time of day, `HH:MM`.
    pub time_in: String,
}

/// Request body for `POST /attendance/clock-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockOutRequest {
    /// The employee clocking out.
    pub employee_id: String,
    /// The work date of the open shift.
    pub date: NaiveDate,
    /// Time of day, `HH:MM`.
    pub time_out: String,
}

/// Request body for `POST /attendance/shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullShiftRequest {
    /// The employee the shift belongs to.
    pub employee_id: String,
    /// The work date.
    pub date: NaiveDate,
    /// Start, `HH:MM`.
    pub time_in: String,
    /// End, `HH:MM`.
    pub time_out: String,
}

/// Optional window for `GET /attendance/:employee_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    /// First date included.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Last date included.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Request body for `POST /adjustments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    /// The employee being adjusted.
    pub employee_id: String,
    /// Pay year.
    pub year: i32,
    /// Pay month, 1-12.
    pub month: u32,
    /// Free-text reason.
    #[serde(default)]
    pub description: String,
    /// Signed amount; deductions are negative.
    pub amount: Decimal,
}

impl AdjustmentRequest {
    /// Validates the month and amount and converts into a storable adjustment.
    pub fn into_new_adjustment(self) -> EngineResult<NewAdjustment> {
        let month = PayMonth::new(self.year, self.month)?;
        let adjustment = NewAdjustment {
            employee_id: self.employee_id,
            year: month.year(),
            month: month.month(),
            description: self.description,
            amount: self.amount,
        };
        adjustment.validate()?;
        Ok(adjustment)
    }
}

/// Request body for `POST /payroll/compute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// The employee to compute.
    pub employee_id: String,
    /// Pay year.
    pub year: i32,
    /// Pay month, 1-12.
    pub month: u32,
    /// Rate to price at; the employee's current rate when omitted.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// Request body for `POST /payroll/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Pay year.
    pub year: i32,
    /// Pay month, 1-12.
    pub month: u32,
}
