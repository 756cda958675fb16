// Responsible for all JSON-RPC communication with the Ethereum node.

use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use super::{NodeRpc, TransactionReceipt, TransactionRequest};

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected response for {method}: {reason}")]
    Decode { method: String, reason: String },
}

#[derive(Deserialize, Debug)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
struct RpcEnvelope {
    #[serde(default)]
    result: JsonValue,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// A JSON-RPC 2.0 client over HTTP. Cheap to share; the underlying connection pool is
/// reused across calls.
pub struct EthClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl EthClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            http: builder.build()?,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: JsonValue,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let envelope: RpcEnvelope = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = envelope.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        serde_json::from_value(envelope.result).map_err(|e| RpcError::Decode {
            method: method.to_string(),
            reason: e.to_string(),
        })
    }

    /// `eth_chainId`, decoded from its hex quantity.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U64 = self.call("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    /// Deployed bytecode at `address` (empty when nothing is deployed).
    pub async fn code_at(&self, address: &Address) -> Result<Bytes, RpcError> {
        self.call("eth_getCode", json!([address, "latest"])).await
    }
}

#[async_trait]
impl NodeRpc for EthClient {
    async fn is_listening(&self) -> Result<bool, RpcError> {
        self.call("net_listening", json!([])).await
    }

    async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
        self.call("eth_accounts", json!([])).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        self.call("eth_sendTransaction", json!([tx])).await
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &B256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.call("eth_getTransactionReceipt", json!([tx_hash])).await
    }
}
