//! Account identifier and balance endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::error_response;
use crate::ledger::{derive_account_identifier, Principal};
use crate::state::AppState;
use crate::types::{AccountQuery, AccountResponse, BalanceResponse, ErrorCode};

/// Create account routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/account/:principal", get(account_identifier))
        .route("/balance/:principal", get(balance))
}

fn parse_principal(text: &str) -> Result<Principal, Response> {
    Principal::from_text(text).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            format!("Invalid principal: {e}"),
        )
    })
}

/// Ledger address for a principal and optional sub-account
/// GET /api/v1/account/:principal?subaccount=<hex>
#[instrument(skip(query))]
async fn account_identifier(
    Path(principal): Path<String>,
    Query(query): Query<AccountQuery>,
) -> Response {
    let principal = match parse_principal(&principal) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let subaccount = match query.subaccount.as_deref().map(hex::decode).transpose() {
        Ok(sub) => sub,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidInput,
                format!("Sub-account is not hex: {e}"),
            )
        }
    };

    match derive_account_identifier(&principal, subaccount.as_deref()) {
        Ok(account) => {
            info!(%account, "Derived account identifier");
            (
                StatusCode::OK,
                Json(AccountResponse {
                    principal,
                    account_identifier: account.to_hex(),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, e.to_string()),
    }
}

/// Token balances for a principal. Ledger failures render as zero.
/// GET /api/v1/balance/:principal
#[instrument(skip(state))]
async fn balance(State(state): State<AppState>, Path(principal): Path<String>) -> Response {
    let principal = match parse_principal(&principal) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let tokens = state.balances().fetch_tokens(&principal).await;
    (StatusCode::OK, Json(BalanceResponse { principal, tokens })).into_response()
}
