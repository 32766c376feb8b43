use crate::error::{CouponError, Result};
use crate::transaction::SignedTransaction;
use crate::types::{ObjectInfo, TransactionEffects};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const POLL_INTERVAL_MS: u64 = 500;
const MAX_POLL_ATTEMPTS: u32 = 60;

/// Read side of the node API needed by the coupon flows.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Poll until the transaction's effects are available.
    async fn wait_for_transaction(&self, digest: &str) -> Result<TransactionEffects>;

    /// Fetch type metadata for an object.
    async fn get_object(&self, object_id: &str) -> Result<ObjectInfo>;
}

/// HTTP client for a fullnode.
#[derive(Clone)]
pub struct ChainClient {
    base_url: String,
    client: Client,
}

impl ChainClient {
    /// Create a new client
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            base_url: node_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with custom reqwest client
    pub fn with_client(node_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: node_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Submit a signed transaction for execution, returning its digest.
    pub async fn execute_transaction(&self, tx: &SignedTransaction) -> Result<String> {
        let url = format!("{}/transactions", self.base_url);
        let response: ExecuteResponse = self
            .client
            .post(&url)
            .json(tx)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(CouponError::Submission(
                response
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        match response.digest {
            Some(digest) if !digest.is_empty() => Ok(digest),
            _ => Err(CouponError::Submission(
                "node returned no transaction digest".to_string(),
            )),
        }
    }

    /// Poll the node until the transaction is confirmed and its effects
    /// are available. Bounded; gives up with `Confirmation` after
    /// `MAX_POLL_ATTEMPTS`.
    pub async fn wait_for_transaction(&self, digest: &str) -> Result<TransactionEffects> {
        let url = format!("{}/transactions/{}", self.base_url, digest);

        for _ in 0..MAX_POLL_ATTEMPTS {
            let response: TxStatusResponse =
                self.client.get(&url).send().await?.json().await?;

            match response.status.as_str() {
                "confirmed" => return Ok(response.effects.unwrap_or_default()),
                "failed" => {
                    return Err(CouponError::Confirmation(
                        response
                            .message
                            .unwrap_or_else(|| "transaction failed on-chain".to_string()),
                    ))
                }
                _ => {
                    debug!("transaction {} still pending", digest);
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }

        warn!("gave up waiting for transaction {}", digest);
        Err(CouponError::Confirmation(format!(
            "transaction {} not confirmed after {} attempts",
            digest, MAX_POLL_ATTEMPTS
        )))
    }

    /// Fetch an object's type metadata.
    pub async fn get_object(&self, object_id: &str) -> Result<ObjectInfo> {
        let url = format!("{}/objects/{}", self.base_url, object_id);
        let info: ObjectInfo = self.client.get(&url).send().await?.json().await?;
        Ok(info)
    }

    /// Check node health
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl ChainQuery for ChainClient {
    async fn wait_for_transaction(&self, digest: &str) -> Result<TransactionEffects> {
        ChainClient::wait_for_transaction(self, digest).await
    }

    async fn get_object(&self, object_id: &str) -> Result<ObjectInfo> {
        ChainClient::get_object(self, object_id).await
    }
}

// Internal response types
#[derive(Deserialize)]
struct ExecuteResponse {
    success: bool,
    digest: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct TxStatusResponse {
    status: String,
    effects: Option<TransactionEffects>,
    message: Option<String>,
}
