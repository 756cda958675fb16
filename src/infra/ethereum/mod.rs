//! Everything that talks to the Ethereum node or describes on-chain objects.

pub mod client;
pub mod contract;

use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub use client::{EthClient, RpcError};
pub use contract::{ContractError, ContractHandle, Token};

/// Parameters of `eth_sendTransaction`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
}

/// Result of `eth_getTransactionReceipt`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_hash: Option<B256>,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub gas_used: Option<U64>,
    /// `0x1` on success, `0x0` when the transaction reverted.
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub logs: Vec<JsonValue>,
}

impl TransactionReceipt {
    pub fn reverted(&self) -> bool {
        self.status == Some(U64::ZERO)
    }
}

/// The node operations the relay depends on.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn is_listening(&self) -> Result<bool, RpcError>;
    async fn accounts(&self) -> Result<Vec<Address>, RpcError>;
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError>;
    async fn transaction_receipt(&self, tx_hash: &B256)
        -> Result<Option<TransactionReceipt>, RpcError>;
}
