//! Response types for the payroll API.
//!
//! This module defines the error response structures, the mapping from
//! engine errors to HTTP statuses and the bodies returned by handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::PayrollRunReport;
use crate::error::EngineError;
use crate::models::{PayMonth, PayrollLine};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// Returns the machine-readable code for an engine error.
pub fn error_code(error: &EngineError) -> &'static str {
    match error {
        EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
            "CONFIG_ERROR"
        }
        EngineError::InvalidTimeFormat { .. } => "INVALID_TIME_FORMAT",
        EngineError::InvalidShiftOrder { .. } => "INVALID_SHIFT_ORDER",
        EngineError::DuplicateOpenShift { .. } => "DUPLICATE_OPEN_SHIFT",
        EngineError::NoOpenShift { .. } => "NO_OPEN_SHIFT",
        EngineError::PayrollAlreadyGenerated { .. } => "PAYROLL_ALREADY_GENERATED",
        EngineError::MissingRate { .. } => "MISSING_RATE",
        EngineError::EmployeeInactive { .. } => "EMPLOYEE_INACTIVE",
        EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
        EngineError::DuplicateEmployee { .. } => "DUPLICATE_EMPLOYEE",
        EngineError::InvalidEmployeeUpdate { .. } => "INVALID_EMPLOYEE_UPDATE",
        EngineError::InvalidAdjustment { .. } => "INVALID_ADJUSTMENT",
        EngineError::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
        EngineError::InvalidMonth { .. } => "INVALID_MONTH",
        EngineError::StorageFailure { .. } => "STORAGE_FAILURE",
    }
}

fn error_status(error: &EngineError) -> StatusCode {
    match error {
        EngineError::ConfigNotFound { .. }
        | EngineError::ConfigParseError { .. }
        | EngineError::StorageFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidTimeFormat { .. }
        | EngineError::InvalidShiftOrder { .. }
        | EngineError::InvalidEmployeeUpdate { .. }
        | EngineError::InvalidAdjustment { .. }
        | EngineError::InvalidMonth { .. } => StatusCode::BAD_REQUEST,
        EngineError::DuplicateOpenShift { .. }
        | EngineError::NoOpenShift { .. }
        | EngineError::PayrollAlreadyGenerated { .. }
        | EngineError::DuplicateEmployee { .. } => StatusCode::CONFLICT,
        EngineError::MissingRate { .. }
        | EngineError::EmployeeInactive { .. }
        | EngineError::AmountOverflow { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::EmployeeNotFound { .. } => StatusCode::NOT_FOUND,
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = error_status(&error);
        let code = error_code(&error);
        let error = match error {
            // storage internals stay out of response bodies
            EngineError::StorageFailure { .. } => {
                ApiError::new(code, "Storage operation failed")
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiError::with_details(code, "Configuration error", error.to_string())
            }
            other => ApiError::new(code, other.to_string()),
        };
        ApiErrorResponse { status, error }
    }
}

/// Body returned when a shift is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreated {
    /// Identifier of the new shift record.
    pub id: u64,
}

/// Body for `GET /attendance/:employee_id/daily/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHoursResponse {
    /// The employee.
    pub employee_id: String,
    /// The date summed.
    pub date: NaiveDate,
    /// Sum of closed shift durations.
    pub total_hours: Decimal,
}

/// Body returned when an adjustment is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentCreated {
    /// Identifier of the new adjustment.
    pub id: u64,
}

/// One employee the run could not pay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFailureBody {
    /// The employee.
    pub employee_id: String,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Body for `POST /payroll/runs`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    /// The month that was run.
    pub month: PayMonth,
    /// Lines written by the run.
    pub generated: Vec<PayrollLine>,
    /// Employees skipped.
    pub failures: Vec<RunFailureBody>,
}

impl From<PayrollRunReport> for RunResponse {
    fn from(report: PayrollRunReport) -> Self {
        RunResponse {
            month: report.month,
            generated: report.generated,
            failures: report
                .failures
                .into_iter()
                .map(|f| RunFailureBody {
                    employee_id: f.employee_id,
                    code: error_code(&f.error).to_string(),
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}
