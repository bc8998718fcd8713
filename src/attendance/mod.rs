//! Attendance tracking.
//!
//! The [`AttendanceLedger`] turns clock events into validated shift records
//! and daily hour totals.

mod ledger;

pub use ledger::AttendanceLedger;
