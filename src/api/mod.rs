//! HTTP API module for the payroll engine.
//!
//! This module exposes attendance capture, employee management, payroll
//! computation and monthly reporting over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AdjustmentRequest, AttendanceQuery, ClockInRequest, ClockOutRequest, ComputeRequest,
    FullShiftRequest, RunRequest,
};
pub use response::{ApiError, ApiErrorResponse, RunFailureBody, RunResponse, error_code};
pub use state::AppState;
