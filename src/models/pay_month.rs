//! Pay month model.
//!
//! This module contains the [`PayMonth`] type used to define the calculation
//! window for monthly payroll.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// A calendar month that payroll is computed for.
///
/// Construction through [`PayMonth::new`] guarantees the month is 1-12 and the
/// year is representable, so every accessor is infallible.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let month = PayMonth::new(2024, 2).unwrap();
/// assert_eq!(month.days_in_month(), 29);
/// assert!(month.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert_eq!(month.to_string(), "2024-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PayMonth {
    year: i32,
    month: u32,
}

impl PayMonth {
    /// Creates a pay month, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(_) => Ok(Self { year, month }),
            None => Err(EngineError::InvalidMonth { year, month }),
        }
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns the number of days in the month (28-31), following Gregorian
    /// leap-year rules.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Iterates every calendar day of the month in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.days_in_month() as usize)
    }

    /// Checks if a given date falls within this month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
