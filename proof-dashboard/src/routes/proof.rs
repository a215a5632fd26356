//! Proof generation and verification endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::{error_response, json_rejection_response};
use crate::remote::Caller;
use crate::services::RelayError;
use crate::state::AppState;
use crate::types::{ErrorCode, GenerateProofRequest, VerifyProofQuery, VerifyProofResponse};

/// Create proof routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/proof/generate", post(generate_proof))
        .route("/proof/verify", get(verify_proof))
        .route("/proof/:proof_id", delete(forget_proof))
}

fn relay_error_response(e: &RelayError) -> Response {
    match e {
        RelayError::AnonymousOwner(_) => {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, e.to_string())
        }
        RelayError::Remote(_) => error_response(
            StatusCode::BAD_GATEWAY,
            ErrorCode::ProofGenerationFailed,
            e.to_string(),
        ),
        RelayError::ProofNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, e.to_string())
        }
        RelayError::Store(_) | RelayError::CorruptProof(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            e.to_string(),
        ),
    }
}

/// Generate a proof of balance for the authenticated principal.
/// Without `balance_e8s` the ledger balance of the default account is attested.
/// POST /api/v1/proof/generate
#[instrument(skip(state, request))]
async fn generate_proof(
    State(state): State<AppState>,
    request: Result<Json<GenerateProofRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return json_rejection_response(rejection),
    };
    info!(principal = %request.principal, token = %request.token, "Received proof generation request");

    if request.principal.is_anonymous() {
        return relay_error_response(&RelayError::AnonymousOwner(request.principal));
    }

    let balance_e8s = match request.balance_e8s {
        Some(e8s) => e8s,
        None => match state.balances().query_e8s(&request.principal).await {
            Ok(e8s) => e8s,
            Err(e) => return relay_error_response(&RelayError::Remote(e)),
        },
    };

    match state
        .relay()
        .generate(&request.principal, &request.token, balance_e8s)
        .await
    {
        Ok(response) => {
            state.increment_proofs();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => relay_error_response(&e),
    }
}

/// Verify a stored proof. Sharing links are opened without a login, so the
/// call is made anonymously. Always answers 200 with a definite result; a
/// missing or unreadable `proofId` is simply not valid.
/// GET /api/v1/proof/verify?proofId=<id>
#[instrument(skip(state, query))]
async fn verify_proof(
    State(state): State<AppState>,
    query: Result<Query<VerifyProofQuery>, QueryRejection>,
) -> Response {
    let proof_id = match query {
        Ok(Query(query)) => query.proof_id,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable verification query");
            None
        }
    };

    let valid = match proof_id.as_deref() {
        Some(proof_id) if !proof_id.is_empty() => state.relay().verify(&Caller::Anonymous, proof_id).await,
        _ => false,
    };
    state.increment_verifications();

    (
        StatusCode::OK,
        Json(VerifyProofResponse {
            proof_id: proof_id.unwrap_or_default(),
            valid,
        }),
    )
        .into_response()
}

/// Drop a stored proof
/// DELETE /api/v1/proof/:proof_id
#[instrument(skip(state))]
async fn forget_proof(State(state): State<AppState>, Path(proof_id): Path<String>) -> Response {
    match state.relay().forget(&proof_id).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "proof_id": proof_id, "removed": true }))).into_response(),
        Ok(false) => relay_error_response(&RelayError::ProofNotFound(proof_id)),
        Err(e) => relay_error_response(&e),
    }
}
