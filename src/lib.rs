//! Attendance and Monthly Payroll Engine
//!
//! This crate records clock-in/clock-out attendance, validates shifts,
//! aggregates daily and monthly hours, and computes monthly payroll with
//! overtime past a fixed monthly threshold and signed manual adjustments.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod storage;
