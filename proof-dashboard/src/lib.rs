// Library entry point for proof-dashboard
// Exposes core modules for testing and embedding

pub mod config;
pub mod ledger;
pub mod notify;
pub mod remote;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use ledger::{derive_account_identifier, format_e8s, AccountIdentifier, Principal, SubAccount};
pub use services::{BalanceClient, ProofRelay, SelfTest};
