//! HTTP request handlers for the Attendance Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    ResolutionOptions, build_data_sheet, data_sheet_columns, parse_punch_rows,
    resolve_attendance, resolve_end_date, summarize_records,
};
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceReport, EmployeeDirectory, PunchDataSheet, ReportPeriod, ScheduleBook,
    parse_iso_date,
};

use super::request::{DataSheetRequest, ReportRequest, schedule_entries};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(index_handler))
        .route("/attendance/report", post(report_handler))
        .route("/attendance/data-sheet", post(data_sheet_handler))
        .with_state(state)
}

/// Handler for GET /api.
async fn index_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/attendance/report", "/attendance/data-sheet"],
    }))
}

/// Handler for POST /attendance/report.
///
/// Resolves the supplied punches into an attendance report.
async fn report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_report(&request, state.config()) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                start_date = %report.period.start_date,
                end_date = %report.period.end_date,
                records = report.records.len(),
                employees = report.summaries.len(),
                skipped_punch_rows = report.skipped_punch_rows,
                duration_us = start_time.elapsed().as_micros(),
                "Attendance report completed successfully"
            );
            json_response(StatusCode::OK, &report)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/data-sheet.
///
/// Lists the raw punches per employee and day.
async fn data_sheet_handler(
    State(state): State<AppState>,
    payload: Result<Json<DataSheetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing data sheet request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_data_sheet(&request, state.config()) {
        Ok(sheet) => {
            info!(
                correlation_id = %correlation_id,
                rows = sheet.rows.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Data sheet completed successfully"
            );
            json_response(StatusCode::OK, &sheet)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
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
    json_response(StatusCode::BAD_REQUEST, &error)
}

fn parse_optional_date(field: &str, value: Option<&str>) -> EngineResult<Option<NaiveDate>> {
    value.map(|value| parse_iso_date(field, value)).transpose()
}

/// Validates the request, then resolves every (employee, date) group.
fn perform_report(request: &ReportRequest, config: &ConfigLoader) -> EngineResult<AttendanceReport> {
    let engine_config = config.config();

    // Dates are validated before any punch is touched
    let start_date = parse_iso_date("start_date", &request.start_date)?;
    let end_date = parse_optional_date("end_date", request.end_date.as_deref())?;
    let public_holidays = match &request.public_holidays {
        Some(dates) => dates
            .iter()
            .map(|date| parse_iso_date("public_holidays", date))
            .collect::<EngineResult<Vec<_>>>()?,
        None => config.default_public_holidays().to_vec(),
    };

    let parsed = parse_punch_rows(&request.punches);
    let schedule = ScheduleBook::from_entries(schedule_entries(&request.schedules));
    let end_date = resolve_end_date(
        start_date,
        end_date,
        request
            .end_date_default
            .unwrap_or(engine_config.collation.end_date_default),
        &parsed.punches,
        &schedule,
    );
    let period = ReportPeriod::new(start_date, end_date, public_holidays)?;
    let directory = EmployeeDirectory::new(request.employees.iter().cloned());

    let options = ResolutionOptions {
        strategy: request.deduplication.unwrap_or(engine_config.deduplication),
        slot_capacity: engine_config.slots.capacity,
        policy: request
            .collation_policy
            .unwrap_or(engine_config.collation.policy),
        metrics: &engine_config.metrics,
        shift_rules: &engine_config.shift_rules,
    };

    let outcome = resolve_attendance(&parsed.punches, &period, &directory, &schedule, &options)?;
    let summaries = summarize_records(&outcome.records);

    Ok(AttendanceReport {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        company_name: engine_config.company.name.clone(),
        period,
        records: outcome.records,
        summaries,
        skipped_punch_rows: parsed.skipped_rows + outcome.unknown_employee_punches,
    })
}

/// Validates the request, then builds the raw punch sheet.
fn perform_data_sheet(
    request: &DataSheetRequest,
    config: &ConfigLoader,
) -> EngineResult<PunchDataSheet> {
    let engine_config = config.config();

    let start_date = parse_iso_date("start_date", &request.start_date)?;
    let end_date = parse_optional_date("end_date", request.end_date.as_deref())?;

    let parsed = parse_punch_rows(&request.punches);
    let end_date = resolve_end_date(
        start_date,
        end_date,
        request
            .end_date_default
            .unwrap_or(engine_config.collation.end_date_default),
        &parsed.punches,
        &ScheduleBook::default(),
    );
    let period = ReportPeriod::new(start_date, end_date, config.default_public_holidays().to_vec())?;
    let directory = EmployeeDirectory::new(request.employees.iter().cloned());

    let rows = build_data_sheet(&parsed.punches, &period, &directory, &engine_config.data_sheet);
    if rows.is_empty() {
        return Err(EngineError::NoAttendanceData {
            start: period.start_date,
            end: period.end_date,
        });
    }

    let unknown = parsed
        .punches
        .iter()
        .filter(|punch| !directory.contains(&punch.employee_id))
        .count();

    Ok(PunchDataSheet {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        company_name: engine_config.company.name.clone(),
        period,
        columns: data_sheet_columns(engine_config.data_sheet.columns),
        rows,
        skipped_punch_rows: parsed.skipped_rows + unknown,
    })
}
