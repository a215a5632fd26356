//! Self-test endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{error_response, json_rejection_response};
use crate::services::selftest::export_results;
use crate::state::AppState;
use crate::types::{ErrorCode, GenerateProofRequest};

/// Create self-test routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/selftest",
            get(last_results).post(run_selftest).delete(clear_results),
        )
        .route("/selftest/export", get(export))
}

/// Run the end-to-end proof flow and cache the results
/// POST /api/v1/selftest
#[instrument(skip(state, request))]
async fn run_selftest(
    State(state): State<AppState>,
    request: Result<Json<GenerateProofRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return json_rejection_response(rejection),
    };

    let results = state
        .selftest()
        .run(&request.principal, &request.token)
        .await;

    if let Err(e) = state.selftest().save_results(&results).await {
        warn!(error = %e, "Failed to cache self-test results");
    }

    (StatusCode::OK, Json(results)).into_response()
}

/// GET /api/v1/selftest
async fn last_results(State(state): State<AppState>) -> Response {
    match state.selftest().load_results().await {
        Ok(Some(results)) => (StatusCode::OK, Json(results)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "No saved self-test results"),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, e.to_string()),
    }
}

/// Pretty-printed results for download
/// GET /api/v1/selftest/export
async fn export(State(state): State<AppState>) -> Response {
    match state.selftest().load_results().await {
        Ok(Some(results)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"zkproof-test-results.json\""),
            ],
            export_results(&results),
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "No saved self-test results"),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, e.to_string()),
    }
}

/// DELETE /api/v1/selftest
async fn clear_results(State(state): State<AppState>) -> Response {
    match state.selftest().clear_results().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, e.to_string()),
    }
}
