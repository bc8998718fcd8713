//! Monthly payroll calculation.
//!
//! This module turns an employee's attendance for one month into a
//! [`PayrollLine`] by:
//! 1. Summing daily hours for every calendar day of the month
//! 2. Splitting the total at the monthly overtime threshold
//! 3. Summing the month's adjustment entries
//! 4. Pricing regular and overtime hours at the rate snapshot
//! 5. Adding adjustments to reach net pay

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::attendance::AttendanceLedger;
use crate::clock::Clock;
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PayMonth, PayrollCalculation, PayrollLine};
use crate::storage::Storage;

use super::overtime_split::split_monthly_hours;

/// Computes payroll lines without persisting them.
///
/// The calculator only reads from storage. Given the same ledger contents,
/// adjustments, rate, policy and clock it always produces the same line.
///
/// # Example
///
/// ```
/// use payroll_engine::attendance::AttendanceLedger;
/// use payroll_engine::calculation::PayrollCalculator;
/// use payroll_engine::clock::SystemClock;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::storage::InMemoryStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::new();
/// AttendanceLedger::new(&store)
///     .add_full_shift("E1", NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), "09:00", "17:00")
///     .unwrap();
///
/// let policy = PayrollPolicy::default();
/// let calculator = PayrollCalculator::new(&store, &policy, &SystemClock);
/// let line = calculator
///     .compute_for_employee_month("E1", 2024, 3, Decimal::new(20, 0))
///     .unwrap();
/// assert_eq!(line.gross_pay, Decimal::new(160, 0));
/// ```
pub struct PayrollCalculator<'a, S: Storage + ?Sized> {
    store: &'a S,
    policy: &'a PayrollPolicy,
    clock: &'a dyn Clock,
}

impl<'a, S: Storage + ?Sized> PayrollCalculator<'a, S> {
    /// Creates a calculator over the given store, policy and time source.
    pub fn new(store: &'a S, policy: &'a PayrollPolicy, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }

    /// Computes the payroll line for an employee-month at the given rate.
    ///
    /// # Returns
    ///
    /// The unpersisted line, or an error if:
    /// - `month` is not 1-12 (`InvalidMonth`)
    /// - `rate` is not positive (`MissingRate`)
    /// - storage fails (`StorageFailure`)
    pub fn compute_for_employee_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
        rate: Decimal,
    ) -> EngineResult<PayrollLine> {
        let month = PayMonth::new(year, month)?;
        Ok(self.compute_with_trace(employee_id, month, rate)?.line)
    }

    /// Computes the payroll line for an employee using their current rate.
    ///
    /// Fails with `EmployeeNotFound`, `EmployeeInactive` or `MissingRate`
    /// before any hours are read.
    pub fn compute_for_employee(
        &self,
        employee_id: &str,
        month: PayMonth,
    ) -> EngineResult<PayrollCalculation> {
        let employee =
            self.store
                .read_employee(employee_id)?
                .ok_or_else(|| EngineError::EmployeeNotFound {
                    employee_id: employee_id.to_string(),
                })?;

        if !employee.active {
            return Err(EngineError::EmployeeInactive {
                employee_id: employee.id,
            });
        }

        let rate = employee.payable_rate()?;
        self.compute_with_trace(&employee.id, month, rate)
    }

    /// Computes the payroll line together with its audit trail.
    ///
    /// Every money sum and product is checked; a result outside the decimal
    /// range fails with `AmountOverflow` instead of panicking.
    pub fn compute_with_trace(
        &self,
        employee_id: &str,
        month: PayMonth,
        rate: Decimal,
    ) -> EngineResult<PayrollCalculation> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::MissingRate {
                employee_id: employee_id.to_string(),
            });
        }

        let overflow = || EngineError::AmountOverflow {
            employee_id: employee_id.to_string(),
            year: month.year(),
            month: month.month(),
        };

        let mut audit_steps = Vec::new();
        let mut step_number: u32 = 1;

        // Step 1: Sum daily hours over every calendar day
        let ledger = AttendanceLedger::new(self.store);
        let mut total_hours = Decimal::ZERO;
        let mut days_worked: u32 = 0;
        for date in month.days() {
            let hours = ledger.daily_hours(employee_id, date)?;
            if hours > Decimal::ZERO {
                days_worked += 1;
            }
            total_hours += hours;
        }
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "monthly_hours_aggregation".to_string(),
            rule_name: "Monthly Hours Aggregation".to_string(),
            input: serde_json::json!({
                "employee_id": employee_id,
                "month": month.to_string(),
                "days_in_month": month.days_in_month()
            }),
            output: serde_json::json!({
                "total_hours": total_hours.normalize().to_string(),
                "days_worked": days_worked
            }),
            reasoning: format!(
                "Summed closed shifts over {} days of {}: {} hours across {} days worked",
                month.days_in_month(),
                month,
                total_hours.normalize(),
                days_worked
            ),
        });
        step_number += 1;

        // Step 2: Split at the monthly threshold
        let split = split_monthly_hours(
            total_hours,
            self.policy.regular_threshold_hours,
            step_number,
        );
        let regular_hours = split.regular_hours;
        let overtime_hours = split.overtime_hours;
        audit_steps.push(split.audit_step);
        step_number += 1;

        // Step 3: Sum adjustments
        let adjustments = self.store.read_adjustments(employee_id, month)?;
        let total_adjustments = adjustments
            .iter()
            .try_fold(Decimal::ZERO, |total, a| total.checked_add(a.amount))
            .ok_or_else(overflow)?;
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "adjustments_total".to_string(),
            rule_name: "Adjustments Total".to_string(),
            input: serde_json::json!({
                "entries": adjustments
                    .iter()
                    .map(|a| serde_json::json!({
                        "description": a.description,
                        "amount": a.amount.normalize().to_string()
                    }))
                    .collect::<Vec<_>>()
            }),
            output: serde_json::json!({
                "total_adjustments": total_adjustments.normalize().to_string()
            }),
            reasoning: format!(
                "{} adjustment entries total ${}",
                adjustments.len(),
                total_adjustments.normalize()
            ),
        });
        step_number += 1;

        // Step 4: Gross pay
        let multiplier = self.policy.overtime_multiplier;
        let regular_pay = regular_hours.checked_mul(rate).ok_or_else(overflow)?;
        let overtime_pay = overtime_hours
            .checked_mul(rate)
            .and_then(|pay| pay.checked_mul(multiplier))
            .ok_or_else(overflow)?;
        let gross_pay = regular_pay.checked_add(overtime_pay).ok_or_else(overflow)?;
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "gross_pay".to_string(),
            rule_name: "Gross Pay Calculation".to_string(),
            input: serde_json::json!({
                "regular_hours": regular_hours.normalize().to_string(),
                "overtime_hours": overtime_hours.normalize().to_string(),
                "rate": rate.normalize().to_string(),
                "overtime_multiplier": multiplier.normalize().to_string()
            }),
            output: serde_json::json!({
                "regular_pay": regular_pay.normalize().to_string(),
                "overtime_pay": overtime_pay.normalize().to_string(),
                "gross_pay": gross_pay.normalize().to_string()
            }),
            reasoning: format!(
                "{} hours x ${} + {} hours x ${} x {} = ${}",
                regular_hours.normalize(),
                rate.normalize(),
                overtime_hours.normalize(),
                rate.normalize(),
                multiplier.normalize(),
                gross_pay.normalize()
            ),
        });
        step_number += 1;

        // Step 5: Net pay
        let net_pay = gross_pay
            .checked_add(total_adjustments)
            .ok_or_else(overflow)?;
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "net_pay".to_string(),
            rule_name: "Net Pay Calculation".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_pay.normalize().to_string(),
                "total_adjustments": total_adjustments.normalize().to_string()
            }),
            output: serde_json::json!({
                "net_pay": net_pay.normalize().to_string()
            }),
            reasoning: format!(
                "${} gross + ${} adjustments = ${}",
                gross_pay.normalize(),
                total_adjustments.normalize(),
                net_pay.normalize()
            ),
        });

        debug!(
            employee_id = %employee_id,
            month = %month,
            total_hours = %total_hours,
            overtime_hours = %overtime_hours,
            "Payroll computed"
        );

        let line = PayrollLine {
            employee_id: employee_id.to_string(),
            year: month.year(),
            month: month.month(),
            regular_hours,
            overtime_hours,
            hourly_rate: rate,
            gross_pay,
            total_adjustments,
            net_pay,
            generated_at: self.clock.now(),
        };

        info!(
            employee_id = %employee_id,
            month = %month,
            gross_pay = %line.gross_pay,
            net_pay = %line.net_pay,
            "Payroll line calculated"
        );

        Ok(PayrollCalculation { line, audit_steps })
    }
}
