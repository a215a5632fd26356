//! Remote Canister Interfaces
//!
//! The ledger and the proof canister are external; callers supply an
//! implementation of these traits (the HTTP gateway in production, in-process
//! fakes in tests).

pub mod gateway;

pub use gateway::{GatewayConfig, HttpGateway};

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::{AccountIdentifier, Principal};
use crate::types::OwnershipInput;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
    #[error("Remote rejected call: {0}")]
    Rejected(String),
    #[error("Malformed remote reply: {0}")]
    Malformed(String),
}

/// Who a remote call is made on behalf of.
///
/// Picked by the orchestration layer. Anonymous callers issue uncertified
/// queries, which is what the sharing-link verification flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Authenticated { principal: Principal },
    Anonymous,
}

impl Caller {
    pub fn authenticated(principal: Principal) -> Self {
        Self::Authenticated { principal }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated { principal } => Some(principal),
            Self::Anonymous => None,
        }
    }

    /// Whether query replies should be certified
    pub fn certified(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Balance lookups against the ledger canister
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Balance of `account` in e8s
    async fn account_balance(&self, account: &AccountIdentifier) -> Result<u64, RemoteError>;
}

/// The proof canister's `prove_ownership` / `verify_proof` pair
#[async_trait]
pub trait ProofService: Send + Sync {
    async fn prove_ownership(
        &self,
        caller: &Caller,
        token: &str,
        input: &OwnershipInput,
    ) -> Result<Vec<u8>, RemoteError>;

    async fn verify_proof(&self, caller: &Caller, proof: &[u8]) -> Result<bool, RemoteError>;
}
