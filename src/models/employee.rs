//! Employee model and change requests.
//!
//! This module defines the [`Employee`] record read from storage, the
//! [`NewEmployee`] input used to register one, and the [`EmployeeUpdate`]
//! change request restricted to the fields that may be edited.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Highest hourly rate accepted when an employee is created or updated.
pub const MAX_HOURLY_RATE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// An employee whose attendance is tracked and who is paid monthly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's full name.
    pub full_name: String,
    /// The employee's role or job title.
    pub role: String,
    /// Optional department.
    #[serde(default)]
    pub department: Option<String>,
    /// Optional contact details.
    #[serde(default)]
    pub contact: Option<String>,
    /// The current hourly rate. `None` means no rate has been set.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Deactivated employees keep their history but are not paid.
    pub active: bool,
}

impl Employee {
    /// Returns the hourly rate if it is set and strictly positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee {
    ///     id: "E1".to_string(),
    ///     full_name: "Ada Lovelace".to_string(),
    ///     role: "Analyst".to_string(),
    ///     department: None,
    ///     contact: None,
    ///     hourly_rate: Some(Decimal::new(2000, 2)),
    ///     active: true,
    /// };
    /// assert_eq!(employee.payable_rate().unwrap(), Decimal::new(20, 0));
    ///
    /// employee.hourly_rate = Some(Decimal::ZERO);
    /// assert!(employee.payable_rate().is_err());
    /// ```
    pub fn payable_rate(&self) -> EngineResult<Decimal> {
        match self.hourly_rate {
            Some(rate) if rate > Decimal::ZERO => Ok(rate),
            _ => Err(EngineError::MissingRate {
                employee_id: self.id.clone(),
            }),
        }
    }

    /// Applies a validated change request in place.
    pub fn apply(&mut self, update: &EmployeeUpdate) {
        if let Some(full_name) = &update.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(role) = &update.role {
            self.role = role.clone();
        }
        if let Some(department) = &update.department {
            self.department = Some(department.clone());
        }
        if let Some(contact) = &update.contact {
            self.contact = Some(contact.clone());
        }
        if let Some(rate) = update.hourly_rate {
            self.hourly_rate = Some(rate);
        }
        if let Some(active) = update.active {
            self.active = active;
        }
    }
}

/// Input for registering a new employee. New employees are always active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's full name.
    pub full_name: String,
    /// The employee's role or job title.
    pub role: String,
    /// Optional department.
    #[serde(default)]
    pub department: Option<String>,
    /// Optional contact details.
    #[serde(default)]
    pub contact: Option<String>,
    /// The starting hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

impl NewEmployee {
    /// Checks the identity fields are filled in and the rate, if given, is
    /// usable. Applies the same value rules as [`EmployeeUpdate::validate`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "id must not be blank".to_string(),
            });
        }
        if self.full_name.trim().is_empty() {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "full_name must not be blank".to_string(),
            });
        }
        if self.role.trim().is_empty() {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "role must not be blank".to_string(),
            });
        }
        validate_rate(self.hourly_rate)
    }
}

fn validate_rate(rate: Option<Decimal>) -> EngineResult<()> {
    match rate {
        Some(rate) if rate <= Decimal::ZERO => Err(EngineError::InvalidEmployeeUpdate {
            message: "hourly_rate must be positive".to_string(),
        }),
        Some(rate) if rate > MAX_HOURLY_RATE => Err(EngineError::InvalidEmployeeUpdate {
            message: format!("hourly_rate must not exceed {}", MAX_HOURLY_RATE),
        }),
        _ => Ok(()),
    }
}

impl From<NewEmployee> for Employee {
    fn from(new: NewEmployee) -> Self {
        Employee {
            id: new.id,
            full_name: new.full_name,
            role: new.role,
            department: new.department,
            contact: new.contact,
            hourly_rate: new.hourly_rate,
            active: true,
        }
    }
}

/// A change request for an existing employee.
///
/// Only the listed fields can change; deserializing a request that names any
/// other field fails instead of silently dropping it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeUpdate {
    /// New full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// New department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// New contact details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// New hourly rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
    /// Reactivate or deactivate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl EmployeeUpdate {
    /// Parses a change request from a JSON object, rejecting unknown fields.
    pub fn from_json(value: serde_json::Value) -> EngineResult<Self> {
        serde_json::from_value(value).map_err(|e| EngineError::InvalidEmployeeUpdate {
            message: e.to_string(),
        })
    }

    /// Checks the request changes something and that its values are usable.
    pub fn validate(&self) -> EngineResult<()> {
        if *self == EmployeeUpdate::default() {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "no fields to update".to_string(),
            });
        }
        if self.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "full_name must not be blank".to_string(),
            });
        }
        if self.role.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(EngineError::InvalidEmployeeUpdate {
                message: "role must not be blank".to_string(),
            });
        }
        validate_rate(self.hourly_rate)
    }
}
