//! # Proof Dashboard
//!
//! Backend for the proof-of-balance dashboard: derives ICP ledger account
//! identifiers, fetches balances and relays proof generation/verification to
//! the proof canister.
//!
//! ## Usage
//!
//! ```bash
//! # Local gateway, in-memory proof store
//! cargo run
//!
//! # Persist proofs and point sharing links at the deployed UI
//! DASHBOARD_STORE_PATH=proofs.json DASHBOARD_PUBLIC_ORIGIN=https://proofs.example cargo run
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Detailed server status
//! - `GET /api/v1/account/:principal` - Ledger account identifier
//! - `GET /api/v1/balance/:principal` - Token balances
//! - `POST /api/v1/proof/generate` - Generate a proof of balance
//! - `GET /api/v1/proof/verify?proofId=` - Verify a stored proof
//! - `DELETE /api/v1/proof/:proof_id` - Forget a stored proof
//! - `POST|GET|DELETE /api/v1/selftest` - End-to-end self-test
//! - `GET /api/v1/notifications` - Recent notifications

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use proof_dashboard::config::Config;
use proof_dashboard::notify::MemoryNotifier;
use proof_dashboard::remote::HttpGateway;
use proof_dashboard::routes::create_routes;
use proof_dashboard::state::{AppState, StateParts};
use proof_dashboard::store::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        gateway = %config.gateway_url,
        ledger = %config.ledger_canister_id,
        proof_canister = %config.proof_canister_id,
        "Starting proof dashboard"
    );

    let gateway = Arc::new(HttpGateway::new(config.gateway_config())?);

    let store: Arc<dyn KeyValueStore> = match &config.store_path {
        Some(path) => {
            info!(path = %path.display(), "Using file-backed proof store");
            Arc::new(FileStore::open(path).await?)
        }
        None => {
            info!("Using in-memory proof store");
            Arc::new(MemoryStore::new())
        }
    };

    // Create application state
    let state = AppState::new(StateParts {
        ledger: gateway.clone(),
        prover: gateway,
        store,
        notifier: Arc::new(MemoryNotifier::new(config.notification_capacity)),
        public_origin: config.public_origin.clone(),
        ledger_canister_id: config.ledger_canister_id.clone(),
        proof_canister_id: config.proof_canister_id.clone(),
    });

    // Build router
    let app = create_routes(state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.socket_addr()?;
    info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(origins)
}

/// Initialize logging based on configuration
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    }
}
