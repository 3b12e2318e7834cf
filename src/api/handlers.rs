//! HTTP request handlers for the Absence Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::PersonId;
use crate::service::AbsenceService;

use super::request::{AbsencesQuery, OverviewQuery};
use super::response::{AbsenceDto, AbsencesResponse, ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/persons/:person_id/absences", get(absences_handler))
        .route("/web/absences", get(overview_handler))
        .with_state(state)
}

/// Handler for `GET /api/persons/{personId}/absences`.
///
/// Lists the absences of one person in a date range, optionally filtered
/// by type and extended by non-workday entries.
async fn absences_handler(
    State(state): State<AppState>,
    person_id: Result<Path<u64>, PathRejection>,
    query: Result<Query<AbsencesQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing absence listing request");

    let person_id = match person_id {
        Ok(Path(id)) => PersonId(id),
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid person id"
            );
            return error_response(ApiErrorResponse::bad_request(ApiError::invalid_path(
                rejection.body_text(),
            )));
        }
    };

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid query string"
            );
            return error_response(ApiErrorResponse::bad_request(ApiError::invalid_query(
                rejection.body_text(),
            )));
        }
    };

    let start_time = Instant::now();
    let service = AbsenceService::new(state.config());
    match service.list_absences(
        person_id,
        query.from,
        query.to,
        query.absence_type.as_deref(),
        query.no_workdays_inclusive,
    ) {
        Ok(entries) => {
            info!(
                correlation_id = %correlation_id,
                person_id = %person_id,
                entries = entries.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Absence listing completed successfully"
            );
            let body = AbsencesResponse {
                absences: entries.into_iter().map(AbsenceDto::from).collect(),
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                person_id = %person_id,
                error = %err,
                validation = err.is_validation(),
                "Absence listing failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for `GET /web/absences`.
///
/// Returns the month by person calendar grid as seen by `viewer`.
async fn overview_handler(
    State(state): State<AppState>,
    query: Result<Query<OverviewQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing overview request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid query string"
            );
            return error_response(ApiErrorResponse::bad_request(ApiError::invalid_query(
                rejection.body_text(),
            )));
        }
    };

    let today = Utc::now().date_naive();
    let service = AbsenceService::new(state.config());
    match service.overview(
        PersonId(query.viewer),
        query.year,
        query.month.as_deref(),
        today,
    ) {
        Ok(overview) => {
            info!(
                correlation_id = %correlation_id,
                viewer_id = query.viewer,
                months = overview.months.len(),
                "Overview completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(overview),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                viewer_id = query.viewer,
                error = %err,
                validation = err.is_validation(),
                "Overview failed"
            );
            error_response(err.into())
        }
    }
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}
