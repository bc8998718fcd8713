//! Core data models for the payroll engine.
//!
//! This module contains all the domain records the ledger, calculator and
//! payroll run read and write.

mod adjustment;
mod employee;
mod pay_month;
mod payroll_line;
mod shift;

pub use adjustment::{AdjustmentEntry, MAX_ADJUSTMENT_AMOUNT, NewAdjustment};
pub use employee::{Employee, EmployeeUpdate, MAX_HOURLY_RATE, NewEmployee};
pub use pay_month::PayMonth;
pub use payroll_line::{AuditStep, PayrollCalculation, PayrollExportRow, PayrollLine};
pub use shift::{NewShift, ShiftOrigin, ShiftRecord};
