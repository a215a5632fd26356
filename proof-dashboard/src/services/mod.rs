//! Services for the dashboard
//!
//! Balance lookups, the proof relay and the end-to-end self-test.

pub mod balance;
pub mod relay;
pub mod selftest;

pub use balance::BalanceClient;
pub use relay::{ProofRelay, RelayError};
pub use selftest::SelfTest;
