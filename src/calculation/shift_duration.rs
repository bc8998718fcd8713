//! Shift validation and duration calculation.
//!
//! This module parses time-of-day strings, enforces that a shift ends after
//! it starts on the same day, and converts the elapsed time into hours.

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Accepted time-of-day layout.
pub const TIME_FORMAT: &str = "%H:%M";

/// Decimal places kept on shift durations.
pub const DURATION_DECIMAL_PLACES: u32 = 2;

/// A validated same-day shift interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedShift {
    /// Parsed start.
    pub time_in: NaiveTime,
    /// Parsed end, strictly after `time_in`.
    pub time_out: NaiveTime,
    /// Elapsed hours rounded to 2 decimals.
    pub duration_hours: Decimal,
}

/// Parses an `HH:MM` time of day.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::parse_time_of_day;
///
/// assert!(parse_time_of_day("09:30").is_ok());
/// assert!(parse_time_of_day("9.30am").is_err());
/// ```
pub fn parse_time_of_day(value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        EngineError::InvalidTimeFormat {
            value: value.to_string(),
        }
    })
}

/// Rounds hours to 2 decimal places, ties to even.
///
/// ```
/// use payroll_engine::calculation::round_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_hours(Decimal::new(125, 3)), Decimal::new(12, 2)); // 0.125 -> 0.12
/// assert_eq!(round_hours(Decimal::new(135, 3)), Decimal::new(14, 2)); // 0.135 -> 0.14
/// ```
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(
        DURATION_DECIMAL_PLACES,
        RoundingStrategy::MidpointNearestEven,
    )
}

/// Computes hours between two already-parsed times of day.
///
/// Fails with `InvalidShiftOrder` unless `time_out` is strictly after
/// `time_in`; overnight shifts are not supported.
pub fn shift_hours(time_in: NaiveTime, time_out: NaiveTime) -> EngineResult<Decimal> {
    if time_out <= time_in {
        return Err(EngineError::InvalidShiftOrder {
            time_in: time_in.format(TIME_FORMAT).to_string(),
            time_out: time_out.format(TIME_FORMAT).to_string(),
        });
    }

    let minutes = (time_out - time_in).num_minutes();
    Ok(round_hours(Decimal::from(minutes) / Decimal::from(60)))
}

/// Validates a time-in/time-out pair and returns the shift duration.
///
/// # Returns
///
/// The parsed interval with its duration in hours rounded to 2 decimals,
/// or an error if:
/// - Either string is not `HH:MM` (`InvalidTimeFormat`)
/// - `time_out` is not strictly after `time_in` (`InvalidShiftOrder`)
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::validate_shift;
/// use rust_decimal::Decimal;
///
/// let shift = validate_shift("09:00", "17:30").unwrap();
/// assert_eq!(shift.duration_hours, Decimal::new(85, 1));
///
/// assert!(validate_shift("17:30", "09:00").is_err());
/// ```
pub fn validate_shift(time_in: &str, time_out: &str) -> EngineResult<ValidatedShift> {
    let parsed_in = parse_time_of_day(time_in)?;
    let parsed_out = parse_time_of_day(time_out)?;
    let duration_hours = shift_hours(parsed_in, parsed_out)?;

    Ok(ValidatedShift {
        time_in: parsed_in,
        time_out: parsed_out,
        duration_hours,
    })
}
