//! HTTP request handlers for the margin engine API.
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
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_record_financials, recalculate_records};
use crate::config::Settings;
use crate::summary::{summarize_company, summarize_period};

use super::request::{
    CompanySummaryRequest, FinancialsRequest, PeriodSummaryRequest, RecalculationRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/financials", post(financials_handler))
        .route("/summary/period", post(period_summary_handler))
        .route("/summary/company", post(company_summary_handler))
        .route("/recalculate", post(recalculate_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .with_state(state)
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Unwraps a JSON body or turns the rejection into a 400 response.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
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
                ApiError::new("VALIDATION_ERROR", body_text)
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

    Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
}

/// Handler for POST /financials.
///
/// Derives every financial figure for one record.
async fn financials_handler(
    State(state): State<AppState>,
    payload: Result<Json<FinancialsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing financials request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let settings = state.settings().await;

    let start_time = Instant::now();
    match compute_record_financials(&request.record, &request.employee, &settings) {
        Ok(derived) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %derived.employee_id,
                period = %derived.period,
                gross_profit = %derived.gross_profit,
                duration_us = start_time.elapsed().as_micros(),
                "Financials derived"
            );
            json_ok(derived)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Derivation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /summary/period.
///
/// Returns 404 when the period has no derivable records.
async fn period_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing period summary request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let settings = state.settings().await;

    let start_time = Instant::now();
    match summarize_period(&request.records, &request.employees, &request.period, &settings) {
        Some(summary) => {
            info!(
                correlation_id = %correlation_id,
                period = %summary.period,
                records = summary.record_count,
                excluded = summary.excluded_records.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Period summary completed"
            );
            json_ok(summary)
        }
        None => {
            info!(
                correlation_id = %correlation_id,
                period = %request.period,
                "No records for period"
            );
            ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::no_records_for_period(&request.period),
            )
            .into_response()
        }
    }
}

/// Handler for POST /summary/company.
async fn company_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompanySummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing company summary request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let settings = state.settings().await;

    let start_time = Instant::now();
    let summary = summarize_company(&request.records, &request.employees, &request.company, &settings);
    info!(
        correlation_id = %correlation_id,
        company = %summary.company,
        employees = summary.employee_count,
        records = summary.record_count,
        duration_us = start_time.elapsed().as_micros(),
        "Company summary completed"
    );
    json_ok(summary)
}

/// Handler for POST /recalculate.
async fn recalculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing recalculation request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };
    let settings = state.settings().await;

    let report = recalculate_records(&request.records, &request.employees, &settings);
    info!(
        correlation_id = %correlation_id,
        updated = report.updated,
        "Recalculation completed"
    );
    json_ok(report)
}

/// Handler for GET /settings.
async fn get_settings_handler(State(state): State<AppState>) -> Response {
    json_ok(state.settings().await)
}

/// Handler for PUT /settings.
///
/// Absent keys take their defaults. Invalid settings are rejected and the
/// current settings are left in place.
async fn put_settings_handler(
    State(state): State<AppState>,
    payload: Result<Json<Settings>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let settings = match parse_body(correlation_id, payload) {
        Ok(settings) => settings,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = settings.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Rejected settings update"
        );
        return ApiErrorResponse::from(err).into_response();
    }

    info!(
        correlation_id = %correlation_id,
        target_margin = %settings.target_margin,
        employment_insurance_rate = %settings.employment_insurance_rate,
        workers_comp_rate = %settings.workers_comp_rate,
        "Settings updated"
    );
    state.replace_settings(settings.clone()).await;
    json_ok(settings)
}
