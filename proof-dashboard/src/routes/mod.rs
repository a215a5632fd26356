//! HTTP Routes for the dashboard
//!
//! REST endpoints the browser UI calls for addresses, balances and proofs.

pub mod account;
pub mod health;
pub mod proof;
pub mod selftest;

use axum::{
    extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, response::Response,
    Json, Router,
};

use crate::state::AppState;
use crate::types::{ErrorCode, ErrorResponse};

/// Create all routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .nest(
            "/api/v1",
            account::routes()
                .merge(proof::routes())
                .merge(selftest::routes()),
        )
        .with_state(state)
}

pub(crate) fn error_response(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

/// Malformed request bodies answer with the same JSON error shape
pub(crate) fn json_rejection_response(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), ErrorCode::InvalidInput, rejection.body_text())
}
