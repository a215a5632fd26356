//! Type definitions for the dashboard
//!
//! Proof canister argument types, dashboard API request/response types and
//! error codes.

use serde::{Deserialize, Serialize};

use crate::ledger::{format_e8s, Principal};

/// Helper for serializing byte vectors as hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        hex::encode(data).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Same as [`hex_bytes`], for lists of byte strings
mod hex_bytes_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(data: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        data.iter()
            .map(hex::encode)
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        data.as_ref().map(hex::encode).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ==================== Proof Canister Types ====================

/// Token standards understood by the proof canister
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStandard {
    ERC20,
    ERC721,
    ERC1155,
    ICRC1,
    ICRC2,
    ICP,
}

impl TokenStandard {
    /// `ICP` is the native ledger; every other symbol is treated as ICRC-1
    pub fn for_symbol(symbol: &str) -> Self {
        if symbol.eq_ignore_ascii_case("ICP") {
            Self::ICP
        } else {
            Self::ICRC1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Ledger canister holding the token
    pub canister_id: String,
    pub token_standard: TokenStandard,
    pub decimals: Option<u8>,
}

/// `prove_ownership` argument. The layout is owned by the proof canister;
/// fields are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipInput {
    pub token_metadata: TokenMetadata,
    #[serde(with = "hex_bytes")]
    pub token_id: Vec<u8>,
    /// Balance in smallest units, 8 bytes big-endian
    #[serde(with = "hex_bytes")]
    pub balance: Vec<u8>,
    /// UTF-8 of the owner's principal text
    #[serde(with = "hex_bytes")]
    pub owner_hash: Vec<u8>,
    #[serde(with = "hex_bytes_vec")]
    pub merkle_path: Vec<Vec<u8>>,
    #[serde(with = "hex_bytes")]
    pub path_indices: Vec<u8>,
    #[serde(with = "hex_bytes_opt")]
    pub token_specific_data: Option<Vec<u8>>,
}

impl OwnershipInput {
    pub fn new(token: &str, owner: &Principal, ledger_canister_id: &str) -> Self {
        Self {
            token_metadata: TokenMetadata {
                canister_id: ledger_canister_id.to_string(),
                token_standard: TokenStandard::for_symbol(token),
                decimals: Some(8),
            },
            token_id: Vec::new(),
            balance: 0u64.to_be_bytes().to_vec(),
            owner_hash: owner.to_text().into_bytes(),
            merkle_path: Vec::new(),
            path_indices: Vec::new(),
            token_specific_data: None,
        }
    }

    pub fn with_balance(mut self, e8s: u64) -> Self {
        self.balance = e8s.to_be_bytes().to_vec();
        self
    }
}

// ==================== Dashboard Types ====================

/// Token row rendered by the balances panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    /// Display amount, 8 fractional digits
    pub amount: String,
    pub decimals: u8,
    pub logo: Option<String>,
}

impl Token {
    pub const ICP_LOGO: &'static str =
        "https://cryptologos.cc/logos/internet-computer-icp-logo.png";

    pub fn icp(amount: String) -> Self {
        Self {
            name: "Internet Computer".to_string(),
            symbol: "ICP".to_string(),
            amount,
            decimals: 8,
            logo: Some(Self::ICP_LOGO.to_string()),
        }
    }

    pub fn icp_from_e8s(e8s: u64) -> Self {
        Self::icp(format_e8s(e8s))
    }
}

/// Result of a successful proof generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofResponse {
    /// Hex of the first 8 proof bytes
    pub proof_id: String,
    /// Shareable verification URL
    pub proof_link: String,
    pub token: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// One step of a self-test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuiteResults {
    pub all_passed: bool,
    pub results: Vec<TestResult>,
    pub start_time: i64,
    pub end_time: i64,
    /// Milliseconds
    pub duration: i64,
}

// ==================== Request Types ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateProofRequest {
    /// Authenticated owner
    pub principal: Principal,
    /// Token symbol, e.g. `ICP`
    pub token: String,
    /// Balance to attest, in e8s; the ledger is queried when absent
    #[serde(default)]
    pub balance_e8s: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProofQuery {
    #[serde(rename = "proofId", default)]
    pub proof_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountQuery {
    /// Hex-encoded 32-byte sub-account
    pub subaccount: Option<String>,
}

// ==================== Response Types ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub principal: Principal,
    pub account_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub principal: Principal,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyProofResponse {
    pub proof_id: String,
    pub valid: bool,
}

/// Error codes returned by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed principal, sub-account or proof id
    InvalidInput,
    /// Proof canister rejected or could not be reached
    ProofGenerationFailed,
    /// Nothing stored for the requested key
    NotFound,
    /// Local store failure
    InternalError,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }
}

/// Server health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server status with more details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub ledger_canister_id: String,
    pub proof_canister_id: String,
    /// Proofs generated since start
    pub total_proofs: u64,
    pub total_verifications: u64,
    pub uptime_secs: u64,
}
