//! Calculation logic for the payroll engine.
//!
//! This module contains shift validation and duration rounding, the monthly
//! overtime split, the per-employee payroll calculator and the monthly
//! payroll run that persists calculator output.

mod overtime_split;
mod payroll_calculator;
mod payroll_run;
mod shift_duration;

pub use overtime_split::{MonthlyHoursSplit, split_monthly_hours};
pub use payroll_calculator::PayrollCalculator;
pub use payroll_run::{PayrollRun, PayrollRunReport, RunFailure};
pub use shift_duration::{
    DURATION_DECIMAL_PLACES, TIME_FORMAT, ValidatedShift, parse_time_of_day, round_hours,
    shift_hours, validate_shift,
};
