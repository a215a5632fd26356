//! Balance Client
//!
//! Derives the caller's ledger address, queries the ledger and formats the
//! result. A failed query is reported to the user and renders as a zero
//! balance; the caller never sees an error.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::ledger::{format_e8s, AccountIdentifier, Principal, SubAccount, ZERO_DISPLAY_AMOUNT};
use crate::notify::{Notification, Notifier};
use crate::remote::{LedgerQuery, RemoteError};
use crate::types::Token;

#[derive(Clone)]
pub struct BalanceClient {
    ledger: Arc<dyn LedgerQuery>,
    notifier: Arc<dyn Notifier>,
}

impl BalanceClient {
    pub fn new(ledger: Arc<dyn LedgerQuery>, notifier: Arc<dyn Notifier>) -> Self {
        Self { ledger, notifier }
    }

    /// Raw e8s on `owner`'s default account, errors propagated
    pub async fn query_e8s(&self, owner: &Principal) -> Result<u64, RemoteError> {
        let account = AccountIdentifier::new(owner, &SubAccount::default());
        self.ledger.account_balance(&account).await
    }

    /// Display balance of `owner`'s default account.
    ///
    /// No retries are made here; a failure resolves to `"0.00000000"`.
    #[instrument(skip(self, owner), fields(principal = %owner))]
    pub async fn fetch_balance(&self, owner: &Principal) -> String {
        let account = AccountIdentifier::new(owner, &SubAccount::default());

        match self.ledger.account_balance(&account).await {
            Ok(e8s) => {
                let amount = format_e8s(e8s);
                info!(%account, e8s, %amount, "Fetched balance");
                amount
            }
            Err(e) => {
                warn!(%account, error = %e, "Balance query failed, showing zero balance");
                self.notifier.notify(Notification::destructive(
                    "Failed to fetch ICP balance",
                    "Could not retrieve your token balance from the ledger canister",
                ));
                ZERO_DISPLAY_AMOUNT.to_string()
            }
        }
    }

    /// Token rows for the balances panel
    pub async fn fetch_tokens(&self, owner: &Principal) -> Vec<Token> {
        vec![Token::icp(self.fetch_balance(owner).await)]
    }
}
