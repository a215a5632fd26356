//! Server Configuration
//!
//! Layered: built-in defaults, then an optional `proof-dashboard.toml`, then
//! `DASHBOARD_*` environment variables (a `.env` file is loaded first).

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::ledger::{LEDGER_CANISTER_ID, PROOF_CANISTER_ID};
use crate::remote::GatewayConfig;

/// Config file looked up in the working directory (extension inferred)
const CONFIG_FILE: &str = "proof-dashboard";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid socket address {0}")]
    InvalidAddress(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Canister gateway base URL
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    #[serde(default = "default_ledger_canister_id")]
    pub ledger_canister_id: String,

    #[serde(default = "default_proof_canister_id")]
    pub proof_canister_id: String,

    /// Origin embedded in shareable verification links
    #[serde(default = "default_public_origin")]
    pub public_origin: String,

    /// JSON file for stored proofs; in-memory when unset
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Gateway call timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Notifications kept for the UI to poll
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:4943".to_string()
}

fn default_ledger_canister_id() -> String {
    LEDGER_CANISTER_ID.to_string()
}

fn default_proof_canister_id() -> String {
    PROOF_CANISTER_ID.to_string()
}

fn default_public_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_notification_capacity() -> usize {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            json_logs: false,
            cors_origins: default_cors_origins(),
            gateway_url: default_gateway_url(),
            ledger_canister_id: default_ledger_canister_id(),
            proof_canister_id: default_proof_canister_id(),
            public_origin: default_public_origin(),
            store_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

impl Config {
    /// Load from `.env`, `proof-dashboard.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load using `file` (optional) plus environment overrides
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            url: self.gateway_url.clone(),
            ledger_canister_id: self.ledger_canister_id.clone(),
            proof_canister_id: self.proof_canister_id.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
