//! Payroll result models.
//!
//! This module contains the [`PayrollLine`] produced for one employee-month,
//! the fixed-order [`PayrollExportRow`] handed to CSV/PDF consumers, and the
//! [`AuditStep`] trail recorded while a line is computed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayMonth;

/// The finalized pay computation for one employee for one month.
///
/// The hourly rate is a snapshot taken when the line was computed, so later
/// rate changes never alter historical payroll.
///
/// # Invariants
///
/// - `gross_pay = regular_hours × hourly_rate + overtime_hours × hourly_rate × overtime multiplier`
/// - `net_pay = gross_pay + total_adjustments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The employee this line pays.
    pub employee_id: String,
    /// Payroll year.
    pub year: i32,
    /// Payroll month (1-12).
    pub month: u32,
    /// Hours up to the monthly threshold.
    pub regular_hours: Decimal,
    /// Hours beyond the monthly threshold.
    pub overtime_hours: Decimal,
    /// Rate snapshot used for this line.
    pub hourly_rate: Decimal,
    /// Pay before adjustments.
    pub gross_pay: Decimal,
    /// Sum of allowances and deductions for the month.
    pub total_adjustments: Decimal,
    /// Gross pay plus adjustments.
    pub net_pay: Decimal,
    /// When the line was computed.
    pub generated_at: DateTime<Utc>,
}

impl PayrollLine {
    /// Returns the month this line covers.
    pub fn pay_month(&self) -> Option<PayMonth> {
        PayMonth::new(self.year, self.month).ok()
    }

    /// Returns regular plus overtime hours.
    pub fn total_hours(&self) -> Decimal {
        self.regular_hours + self.overtime_hours
    }

    /// Builds the export record for this line.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PayrollLine;
    /// use chrono::Utc;
    /// use rust_decimal::Decimal;
    ///
    /// let line = PayrollLine {
    ///     employee_id: "E1".to_string(),
    ///     year: 2024,
    ///     month: 3,
    ///     regular_hours: Decimal::new(160, 0),
    ///     overtime_hours: Decimal::new(10, 0),
    ///     hourly_rate: Decimal::new(20, 0),
    ///     gross_pay: Decimal::new(3500, 0),
    ///     total_adjustments: Decimal::new(-50, 0),
    ///     net_pay: Decimal::new(3450, 0),
    ///     generated_at: Utc::now(),
    /// };
    /// let row = line.export_row("Ada Lovelace");
    /// assert_eq!(row.full_name, "Ada Lovelace");
    /// assert_eq!(row.net_pay, Decimal::new(3450, 0));
    /// ```
    pub fn export_row(&self, full_name: &str) -> PayrollExportRow {
        PayrollExportRow {
            employee_id: self.employee_id.clone(),
            full_name: full_name.to_string(),
            regular_hours: self.regular_hours,
            overtime_hours: self.overtime_hours,
            hourly_rate: self.hourly_rate,
            gross_pay: self.gross_pay,
            total_adjustments: self.total_adjustments,
            net_pay: self.net_pay,
        }
    }
}

/// One row of tabular payroll export.
///
/// Fields serialize in declaration order, which is the column order consumers
/// rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollExportRow {
    /// Employee identifier.
    pub employee_id: String,
    /// Employee name.
    pub full_name: String,
    /// Regular hours.
    pub regular_hours: Decimal,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Hourly rate.
    pub hourly_rate: Decimal,
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Adjustments total.
    pub total_adjustments: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
}

impl PayrollExportRow {
    /// Column names in export order.
    pub const COLUMNS: [&'static str; 8] = [
        "employee_id",
        "full_name",
        "regular_hours",
        "overtime_hours",
        "hourly_rate",
        "gross_pay",
        "total_adjustments",
        "net_pay",
    ];

    /// Returns `(column, value)` pairs in export order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.employee_id.clone(),
            self.full_name.clone(),
            self.regular_hours.to_string(),
            self.overtime_hours.to_string(),
            self.hourly_rate.to_string(),
            self.gross_pay.to_string(),
            self.total_adjustments.to_string(),
            self.net_pay.to_string(),
        ];
        Self::COLUMNS.into_iter().zip(values).collect()
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A payroll line together with the steps that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// The computed, not yet persisted, line.
    pub line: PayrollLine,
    /// Every decision made while computing the line, in order.
    pub audit_steps: Vec<AuditStep>,
}
