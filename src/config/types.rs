//! Configuration types for payroll policy.
//!
//! This module contains the strongly-typed policy structure deserialized from
//! `payroll.yaml`, and the named constants used when no file overrides them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly hours paid at the base rate before overtime applies.
pub const REGULAR_THRESHOLD_HOURS: Decimal = Decimal::from_parts(160, 0, 0, false, 0);

/// Multiplier applied to the base rate for overtime hours.
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// How a payroll run treats an employee-month that already has a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerunPolicy {
    /// Fail the employee with `PayrollAlreadyGenerated` and keep the prior line.
    #[default]
    Reject,
    /// Supersede the prior line with the newly computed one.
    Replace,
}

/// The payroll policy in force for a deployment.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{PayrollPolicy, RerunPolicy};
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// assert_eq!(policy.regular_threshold_hours, Decimal::new(160, 0));
/// assert_eq!(policy.overtime_multiplier, Decimal::new(15, 1));
/// assert_eq!(policy.rerun_policy, RerunPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Monthly regular-hours cap.
    #[serde(default = "default_threshold")]
    pub regular_threshold_hours: Decimal,
    /// Overtime rate multiplier.
    #[serde(default = "default_multiplier")]
    pub overtime_multiplier: Decimal,
    /// Re-run behaviour for already generated months.
    #[serde(default)]
    pub rerun_policy: RerunPolicy,
}

fn default_threshold() -> Decimal {
    REGULAR_THRESHOLD_HOURS
}

fn default_multiplier() -> Decimal {
    OVERTIME_MULTIPLIER
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            regular_threshold_hours: REGULAR_THRESHOLD_HOURS,
            overtime_multiplier: OVERTIME_MULTIPLIER,
            rerun_policy: RerunPolicy::default(),
        }
    }
}

impl PayrollPolicy {
    /// Returns a copy with a different re-run policy.
    pub fn with_rerun_policy(mut self, rerun_policy: RerunPolicy) -> Self {
        self.rerun_policy = rerun_policy;
        self
    }

    /// Describes the first invalid value, if any.
    pub(crate) fn problem(&self) -> Option<String> {
        if self.regular_threshold_hours <= Decimal::ZERO {
            return Some(format!(
                "regular_threshold_hours must be positive, got {}",
                self.regular_threshold_hours
            ));
        }
        if self.overtime_multiplier < Decimal::ONE {
            return Some(format!(
                "overtime_multiplier must be at least 1, got {}",
                self.overtime_multiplier
            ));
        }
        None
    }
}

/// Top-level layout of `payroll.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PayrollConfigFile {
    pub payroll: PayrollPolicy,
}
