//! Health, status and notification endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::state::AppState;
use crate::types::{HealthResponse, StatusResponse};

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
        .route("/api/v1/notifications", get(notifications))
}

/// Health check endpoint
/// GET /health
async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Detailed status endpoint
/// GET /status
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let response = StatusResponse {
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ledger_canister_id: state.ledger_canister_id().to_string(),
        proof_canister_id: state.proof_canister_id().to_string(),
        total_proofs: state.total_proofs_generated(),
        total_verifications: state.total_verifications(),
        uptime_secs: state.uptime_secs(),
    };

    (StatusCode::OK, Json(response))
}

/// Recent user-facing notifications, oldest first
/// GET /api/v1/notifications
async fn notifications(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.notifier().recent()))
}
