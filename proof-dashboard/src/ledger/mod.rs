//! Ledger Addressing
//!
//! Principals, sub-accounts and the checksummed account identifiers the ICP
//! ledger indexes balances by, plus e8s amount formatting.

pub mod account;
pub mod principal;
pub mod tokens;

pub use account::{derive_account_identifier, AccountIdentifier, SubAccount};
pub use principal::Principal;
pub use tokens::{format_e8s, parse_display_amount, E8S_PER_TOKEN, ZERO_DISPLAY_AMOUNT};

use thiserror::Error;

/// ICP ledger canister on mainnet
pub const LEDGER_CANISTER_ID: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";

/// Proof-of-balance canister on mainnet
pub const PROOF_CANISTER_ID: &str = "hi7bu-myaaa-aaaad-aaloa-cai";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid input length: expected {expected} bytes, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },
    #[error("Principal too long: {0} bytes (max 29)")]
    PrincipalTooLong(usize),
    #[error("Invalid principal text: {0}")]
    InvalidText(String),
    #[error("Checksum mismatch: expected {expected:08x}, found {found:08x}")]
    InvalidChecksum { expected: u32, found: u32 },
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Big-endian CRC-32 (IEEE) of `data`, the checksum both principal text and
/// account identifiers carry.
pub(crate) fn crc32_be(data: &[u8]) -> [u8; 4] {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize().to_be_bytes()
}
