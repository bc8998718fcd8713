//! Payroll adjustment model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest absolute adjustment amount accepted for one entry.
pub const MAX_ADJUSTMENT_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A manual allowance (positive amount) or deduction (negative amount) for one
/// employee-month. Entries are immutable once stored and are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentEntry {
    /// Storage-assigned identifier.
    pub id: u64,
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// Free-text reason, e.g. "Transport allowance".
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
}

/// Input for recording an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdjustment {
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// Free-text reason.
    #[serde(default)]
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
}

impl NewAdjustment {
    /// Checks the amount lies within [`MAX_ADJUSTMENT_AMOUNT`] either side of zero.
    pub fn validate(&self) -> EngineResult<()> {
        if self.amount.abs() > MAX_ADJUSTMENT_AMOUNT {
            return Err(EngineError::InvalidAdjustment {
                message: format!("amount must be within +/-{}", MAX_ADJUSTMENT_AMOUNT),
            });
        }
        Ok(())
    }

    /// Attaches the storage-assigned identifier.
    pub fn with_id(self, id: u64) -> AdjustmentEntry {
        AdjustmentEntry {
            id,
            employee_id: self.employee_id,
            year: self.year,
            month: self.month,
            description: self.description,
            amount: self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn create_adjustment(amount: &str) -> NewAdjustment {
        NewAdjustment {
            employee_id: "E1".to_string(),
            year: 2024,
            month: 3,
            description: "Transport allowance".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
        }
    }

    #[test]
    fn test_amount_within_bound_is_valid() {
        assert!(create_adjustment("-50.25").validate().is_ok());
        assert!(create_adjustment("1000000000").validate().is_ok());
        assert!(create_adjustment("-1000000000").validate().is_ok());
    }

    #[test]
    fn test_amount_beyond_bound_is_rejected() {
        for amount in ["1000000000.01", "-79228162514264337593543950335"] {
            assert!(matches!(
                create_adjustment(amount).validate(),
                Err(EngineError::InvalidAdjustment { .. })
            ));
        }
    }
}
