//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! mutating handler runs its engine call inside [`AppState::write`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, patch, post},
};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::attendance::AttendanceLedger;
use crate::calculation::{PayrollCalculator, PayrollRun};
use crate::error::EngineError;
use crate::models::{
    Employee, EmployeeUpdate, NewEmployee, PayMonth, PayrollCalculation, PayrollExportRow,
    ShiftRecord,
};
use crate::report::{MonthlyReport, export_rows, monthly_report};

use super::request::{
    AdjustmentRequest, AttendanceQuery, ClockInRequest, ClockOutRequest, ComputeRequest,
    FullShiftRequest, RunRequest,
};
use super::response::{
    AdjustmentCreated, ApiError, ApiErrorResponse, DailyHoursResponse, RunResponse, ShiftCreated,
};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", post(create_employee))
        .route(
            "/employees/:id",
            patch(update_employee).delete(deactivate_employee),
        )
        .route("/attendance/clock-in", post(clock_in))
        .route("/attendance/clock-out", post(clock_out))
        .route("/attendance/shifts", post(add_full_shift))
        .route("/attendance/:employee_id", get(list_attendance))
        .route("/attendance/:employee_id/daily/:date", get(daily_hours))
        .route("/adjustments", post(create_adjustment))
        .route("/payroll/compute", post(compute_payroll))
        .route("/payroll/runs", post(run_payroll))
        .route("/payroll/:year/:month/export", get(export_payroll))
        .route("/reports/:year/:month", get(report_month))
        .with_state(state)
}

/// Unwraps a JSON body, mapping extractor rejections to API errors.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

fn path_params<T>(
    correlation_id: Uuid,
    params: Result<Path<T>, PathRejection>,
) -> ApiResult<T> {
    params.map(|Path(p)| p).map_err(|rejection| {
        warn!(correlation_id = %correlation_id, error = %rejection.body_text(), "Invalid path");
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })
}

/// Logs an engine failure and converts it for the response.
fn engine_failure(correlation_id: Uuid, operation: &str, err: EngineError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation = operation,
        error = %err,
        "Request rejected"
    );
    err.into()
}

/// Handler for POST /employees.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let correlation_id = Uuid::new_v4();
    let new_employee = json_body(correlation_id, payload)?;

    if let Err(error) = new_employee.validate() {
        warn!(correlation_id = %correlation_id, error = %error, "Employee rejected");
        return Err(ApiErrorResponse::bad_request(ApiError::validation_error(
            error.to_string(),
        )));
    }

    let employee = state
        .write(|store| store.insert_employee(new_employee))
        .map_err(|e| engine_failure(correlation_id, "create_employee", e))?;

    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Handler for PATCH /employees/:id.
///
/// The body is checked field by field; unknown fields are rejected.
async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let body = json_body(correlation_id, payload)?;

    let update = EmployeeUpdate::from_json(body)
        .and_then(|update| update.validate().map(|_| update))
        .map_err(|e| engine_failure(correlation_id, "update_employee", e))?;

    let employee = state
        .write(|store| store.update_employee(&employee_id, &update))
        .map_err(|e| engine_failure(correlation_id, "update_employee", e))?;

    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Employee updated");
    Ok(Json(employee))
}

/// Handler for DELETE /employees/:id. Deactivates; records are kept.
async fn deactivate_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let update = EmployeeUpdate {
        active: Some(false),
        ..Default::default()
    };

    let employee = state
        .write(|store| store.update_employee(&employee_id, &update))
        .map_err(|e| engine_failure(correlation_id, "deactivate_employee", e))?;

    info!(correlation_id = %correlation_id, employee_id = %employee.id, "Employee deactivated");
    Ok(Json(employee))
}

/// Handler for POST /attendance/clock-in.
async fn clock_in(
    State(state): State<AppState>,
    payload: Result<Json<ClockInRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ShiftCreated>)> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let id = state
        .write(|store| {
            AttendanceLedger::new(store).clock_in(&request.employee_id, request.date, &request.time_in)
        })
        .map_err(|e| engine_failure(correlation_id, "clock_in", e))?;

    info!(correlation_id = %correlation_id, shift_id = id, "Clock-in accepted");
    Ok((StatusCode::CREATED, Json(ShiftCreated { id })))
}

/// Handler for POST /attendance/clock-out.
async fn clock_out(
    State(state): State<AppState>,
    payload: Result<Json<ClockOutRequest>, JsonRejection>,
) -> ApiResult<Json<ShiftRecord>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let shift = state
        .write(|store| {
            AttendanceLedger::new(store).clock_out(
                &request.employee_id,
                request.date,
                &request.time_out,
            )
        })
        .map_err(|e| engine_failure(correlation_id, "clock_out", e))?;

    info!(correlation_id = %correlation_id, shift_id = shift.id, "Clock-out accepted");
    Ok(Json(shift))
}

/// Handler for POST /attendance/shifts.
async fn add_full_shift(
    State(state): State<AppState>,
    payload: Result<Json<FullShiftRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ShiftCreated>)> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let id = state
        .write(|store| {
            AttendanceLedger::new(store).add_full_shift(
                &request.employee_id,
                request.date,
                &request.time_in,
                &request.time_out,
            )
        })
        .map_err(|e| engine_failure(correlation_id, "add_full_shift", e))?;

    info!(correlation_id = %correlation_id, shift_id = id, "Correction shift accepted");
    Ok((StatusCode::CREATED, Json(ShiftCreated { id })))
}

/// Handler for GET /attendance/:employee_id.
async fn list_attendance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ShiftRecord>>> {
    let correlation_id = Uuid::new_v4();
    let Query(window) = query.map_err(|rejection| {
        ApiErrorResponse::bad_request(ApiError::validation_error(rejection.body_text()))
    })?;

    let shifts = AttendanceLedger::new(state.store())
        .list_between(&employee_id, window.start, window.end)
        .map_err(|e| engine_failure(correlation_id, "list_attendance", e))?;
    Ok(Json(shifts))
}

/// Handler for GET /attendance/:employee_id/daily/:date.
async fn daily_hours(
    State(state): State<AppState>,
    params: Result<Path<(String, NaiveDate)>, PathRejection>,
) -> ApiResult<Json<DailyHoursResponse>> {
    let correlation_id = Uuid::new_v4();
    let (employee_id, date) = path_params(correlation_id, params)?;

    let total_hours = AttendanceLedger::new(state.store())
        .daily_hours(&employee_id, date)
        .map_err(|e| engine_failure(correlation_id, "daily_hours", e))?;

    Ok(Json(DailyHoursResponse {
        employee_id,
        date,
        total_hours,
    }))
}

/// Handler for POST /adjustments.
async fn create_adjustment(
    State(state): State<AppState>,
    payload: Result<Json<AdjustmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AdjustmentCreated>)> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let id = state
        .write(|store| {
            let adjustment = request.into_new_adjustment()?;
            if store.read_employee(&adjustment.employee_id)?.is_none() {
                return Err(EngineError::EmployeeNotFound {
                    employee_id: adjustment.employee_id,
                });
            }
            store.insert_adjustment(adjustment)
        })
        .map_err(|e| engine_failure(correlation_id, "create_adjustment", e))?;

    info!(correlation_id = %correlation_id, adjustment_id = id, "Adjustment recorded");
    Ok((StatusCode::CREATED, Json(AdjustmentCreated { id })))
}

/// Handler for POST /payroll/compute.
///
/// Computes without persisting. Uses the employee's current rate unless the
/// request names one.
async fn compute_payroll(
    State(state): State<AppState>,
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> ApiResult<Json<PayrollCalculation>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll computation");
    let request = json_body(correlation_id, payload)?;

    let start_time = Instant::now();
    let calculator = PayrollCalculator::new(state.store(), state.policy(), state.clock());
    let result = PayMonth::new(request.year, request.month)
        .and_then(|month| match request.hourly_rate {
            Some(rate) => calculator.compute_with_trace(&request.employee_id, month, rate),
            None => calculator.compute_for_employee(&request.employee_id, month),
        })
        .map_err(|e| engine_failure(correlation_id, "compute_payroll", e))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        gross_pay = %result.line.gross_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll computation completed"
    );
    Ok(Json(result))
}

/// Handler for POST /payroll/runs.
///
/// The run holds the write gate throughout, so it executes on a blocking
/// thread.
async fn run_payroll(
    State(state): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> ApiResult<Json<RunResponse>> {
    let correlation_id = Uuid::new_v4();
    let request = json_body(correlation_id, payload)?;

    let start_time = Instant::now();
    let report = tokio::task::spawn_blocking(move || {
        state.write(|store| {
            PayrollRun::new(store, state.policy(), state.clock())
                .run(request.year, request.month)
        })
    })
    .await
    .unwrap_or_else(|e| {
        Err(EngineError::StorageFailure {
            message: format!("payroll run task failed: {}", e),
        })
    })
    .map_err(|e| engine_failure(correlation_id, "run_payroll", e))?;

    info!(
        correlation_id = %correlation_id,
        month = %report.month,
        generated = report.generated.len(),
        failed = report.failures.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll run request completed"
    );
    Ok(Json(report.into()))
}

/// Handler for GET /payroll/:year/:month/export.
async fn export_payroll(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> ApiResult<Json<Vec<PayrollExportRow>>> {
    let correlation_id = Uuid::new_v4();
    let (year, month) = path_params(correlation_id, params)?;

    let rows = PayMonth::new(year, month)
        .and_then(|month| export_rows(state.store(), month))
        .map_err(|e| engine_failure(correlation_id, "export_payroll", e))?;
    Ok(Json(rows))
}

/// Handler for GET /reports/:year/:month.
async fn report_month(
    State(state): State<AppState>,
    params: Result<Path<(i32, u32)>, PathRejection>,
) -> ApiResult<Json<MonthlyReport>> {
    let correlation_id = Uuid::new_v4();
    let (year, month) = path_params(correlation_id, params)?;

    let report = PayMonth::new(year, month)
        .and_then(|month| monthly_report(state.store(), month))
        .map_err(|e| engine_failure(correlation_id, "report_month", e))?;
    Ok(Json(report))
}
