//! HTTP Canister Gateway
//!
//! Forwards canister calls as JSON envelopes to a gateway that speaks to the
//! Internet Computer on our behalf.
//!
//! Request: `POST {url}/call` with `{canister_id, method, certified, sender, args}`.
//! Ledger replies with `{"e8s": n}`; the proof canister replies with
//! `{"Ok": ...}` or `{"Err": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use super::{Caller, LedgerQuery, ProofService, RemoteError};
use crate::ledger::AccountIdentifier;
use crate::types::OwnershipInput;

/// Gateway connection settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://127.0.0.1:4943`
    pub url: String,
    pub ledger_canister_id: String,
    pub proof_canister_id: String,
    /// Transport timeout for a single call
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct CallEnvelope<'a> {
    canister_id: &'a str,
    method: &'a str,
    certified: bool,
    sender: Option<String>,
    args: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TokensReply {
    e8s: u64,
}

#[derive(Debug, Deserialize)]
enum CanisterResult<T> {
    Ok(T),
    Err(String),
}

impl<T> CanisterResult<T> {
    fn into_result(self) -> Result<T, RemoteError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(message) => Err(RemoteError::Rejected(message)),
        }
    }
}

/// [`LedgerQuery`] and [`ProofService`] over the HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Unavailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn call<T: DeserializeOwned>(
        &self,
        canister_id: &str,
        method: &str,
        caller: &Caller,
        args: serde_json::Value,
    ) -> Result<T, RemoteError> {
        let envelope = CallEnvelope {
            canister_id,
            method,
            certified: caller.certified(),
            sender: caller.principal().map(|p| p.to_text()),
            args,
        };

        let url = format!("{}/call", self.config.url.trim_end_matches('/'));
        debug!(%url, canister_id, method, certified = envelope.certified, "Calling canister");

        let response = self
            .client
            .post(&url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Unavailable(format!("gateway returned {status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl LedgerQuery for HttpGateway {
    #[instrument(skip(self, account), fields(account = %account))]
    async fn account_balance(&self, account: &AccountIdentifier) -> Result<u64, RemoteError> {
        let reply: TokensReply = self
            .call(
                &self.config.ledger_canister_id,
                "account_balance",
                &Caller::Anonymous,
                json!({ "account": account.to_hex() }),
            )
            .await?;
        Ok(reply.e8s)
    }
}

#[async_trait]
impl ProofService for HttpGateway {
    #[instrument(skip(self, caller, input), fields(certified = caller.certified()))]
    async fn prove_ownership(
        &self,
        caller: &Caller,
        token: &str,
        input: &OwnershipInput,
    ) -> Result<Vec<u8>, RemoteError> {
        let args = serde_json::to_value(input).map_err(|e| RemoteError::Malformed(e.to_string()))?;
        let reply: CanisterResult<String> = self
            .call(
                &self.config.proof_canister_id,
                "prove_ownership",
                caller,
                json!([token, args]),
            )
            .await?;

        let proof_hex = reply.into_result()?;
        hex::decode(proof_hex).map_err(|e| RemoteError::Malformed(format!("proof is not hex: {e}")))
    }

    #[instrument(skip(self, caller, proof), fields(certified = caller.certified(), proof_len = proof.len()))]
    async fn verify_proof(&self, caller: &Caller, proof: &[u8]) -> Result<bool, RemoteError> {
        let reply: CanisterResult<bool> = self
            .call(
                &self.config.proof_canister_id,
                "verify_proof",
                caller,
                json!([hex::encode(proof)]),
            )
            .await?;
        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{derive_account_identifier, Principal};
    use axum::{routing::post, Json, Router};
    use serde_json::Value;

    /// Fake gateway that answers from the call envelope
    async fn fake_gateway(Json(envelope): Json<Value>) -> Json<Value> {
        let method = envelope["method"].as_str().unwrap_or_default();
        let reply = match method {
            "account_balance" => json!({ "e8s": 123_456_789u64 }),
            "prove_ownership" => {
                if envelope["args"][0] == "FAIL" {
                    json!({ "Err": "unsupported token" })
                } else {
                    json!({ "Ok": "0102030405060708090a" })
                }
            }
            "verify_proof" => {
                // accepts only the expected proof, sent anonymously
                let anonymous_uncertified =
                    envelope["certified"] == false && envelope["sender"].is_null();
                json!({ "Ok": envelope["args"][0] == "0102030405060708090a" && anonymous_uncertified })
            }
            _ => json!("garbage"),
        };
        Json(reply)
    }

    async fn spawn_gateway() -> HttpGateway {
        let app = Router::new().route("/call", post(fake_gateway));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpGateway::new(GatewayConfig {
            url: format!("http://{addr}/"),
            ledger_canister_id: "ledger".to_string(),
            proof_canister_id: "proof".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_account_balance() {
        let gateway = spawn_gateway().await;
        let account = derive_account_identifier(&Principal::anonymous(), None).unwrap();
        assert_eq!(gateway.account_balance(&account).await.unwrap(), 123_456_789);
    }

    #[tokio::test]
    async fn test_prove_and_verify() {
        let gateway = spawn_gateway().await;
        let owner = Principal::from_slice(&[1, 2, 3]).unwrap();
        let input = OwnershipInput::new("ICP", &owner, "ledger");

        let proof = gateway
            .prove_ownership(&Caller::authenticated(owner), "ICP", &input)
            .await
            .unwrap();
        assert_eq!(proof, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        assert!(gateway.verify_proof(&Caller::Anonymous, &proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_canister_err_is_rejection() {
        let gateway = spawn_gateway().await;
        let owner = Principal::from_slice(&[1, 2, 3]).unwrap();
        let input = OwnershipInput::new("FAIL", &owner, "ledger");

        let err = gateway
            .prove_ownership(&Caller::authenticated(owner), "FAIL", &input)
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::Rejected("unsupported token".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let gateway = HttpGateway::new(GatewayConfig {
            url: "http://127.0.0.1:1".to_string(),
            ledger_canister_id: "ledger".to_string(),
            proof_canister_id: "proof".to_string(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let account = derive_account_identifier(&Principal::anonymous(), None).unwrap();
        assert!(matches!(
            gateway.account_balance(&account).await,
            Err(RemoteError::Unavailable(_))
        ));
    }
}
