//! Monthly overtime split.
//!
//! This module splits a month's worked hours into regular hours (up to the
//! monthly threshold) and overtime hours (everything beyond it).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// The result of splitting a month's hours at the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyHoursSplit {
    /// Hours up to the threshold.
    pub regular_hours: Decimal,
    /// Hours exceeding the threshold (can be zero).
    pub overtime_hours: Decimal,
    /// The audit step recording this split.
    pub audit_step: AuditStep,
}

/// Splits total monthly hours into regular and overtime portions.
///
/// `regular_hours + overtime_hours` always equals `total_hours`, and
/// `overtime_hours` is `max(0, total_hours - threshold)`.
///
/// # Examples
///
/// ## Month over the threshold
///
/// ```
/// use payroll_engine::calculation::split_monthly_hours;
/// use payroll_engine::config::REGULAR_THRESHOLD_HOURS;
/// use rust_decimal::Decimal;
///
/// let split = split_monthly_hours(Decimal::new(170, 0), REGULAR_THRESHOLD_HOURS, 1);
/// assert_eq!(split.regular_hours, Decimal::new(160, 0));
/// assert_eq!(split.overtime_hours, Decimal::new(10, 0));
/// ```
///
/// ## Month under the threshold
///
/// ```
/// use payroll_engine::calculation::split_monthly_hours;
/// use payroll_engine::config::REGULAR_THRESHOLD_HOURS;
/// use rust_decimal::Decimal;
///
/// let split = split_monthly_hours(Decimal::new(1205, 1), REGULAR_THRESHOLD_HOURS, 1);
/// assert_eq!(split.regular_hours, Decimal::new(1205, 1));
/// assert_eq!(split.overtime_hours, Decimal::ZERO);
/// ```
pub fn split_monthly_hours(
    total_hours: Decimal,
    threshold: Decimal,
    step_number: u32,
) -> MonthlyHoursSplit {
    let regular_hours = total_hours.min(threshold);
    let overtime_hours = (total_hours - threshold).max(Decimal::ZERO);

    let reasoning = if overtime_hours > Decimal::ZERO {
        format!(
            "{} hours worked exceeds {} hour monthly threshold by {} hours, paid as overtime",
            total_hours.normalize(),
            threshold.normalize(),
            overtime_hours.normalize()
        )
    } else if total_hours == threshold {
        format!(
            "{} hours worked equals {} hour monthly threshold, no overtime",
            total_hours.normalize(),
            threshold.normalize()
        )
    } else {
        format!(
            "{} hours worked is under {} hour monthly threshold, no overtime",
            total_hours.normalize(),
            threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "monthly_overtime_split".to_string(),
        rule_name: "Monthly Overtime Split".to_string(),
        input: serde_json::json!({
            "total_hours": total_hours.normalize().to_string(),
            "threshold": threshold.normalize().to_string()
        }),
        output: serde_json::json!({
            "regular_hours": regular_hours.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string()
        }),
        reasoning,
    };

    MonthlyHoursSplit {
        regular_hours,
        overtime_hours,
        audit_step,
    }
}
