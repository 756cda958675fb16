use alloy_primitives::B256;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::infra::ethereum::{ContractError, RpcError};

/// Closed set of failure classes exposed to HTTP callers.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    /// The node could not be reached or did not answer in time.
    UpstreamUnavailable,
    /// The node answered and refused the request (JSON-RPC error object or revert).
    NodeRejected,
    Internal,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid node address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("node rpc failed: {0}")]
    Rpc(#[from] RpcError),
    #[error("contract call encoding failed: {0}")]
    Contract(#[from] ContractError),
    #[error("node has no accounts to send from")]
    NoAccounts,
    #[error("transaction {0} reverted")]
    Reverted(B256),
    #[error("no receipt for transaction {tx_hash} after {attempts} polls")]
    ReceiptTimeout { tx_hash: B256, attempts: u32 },
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::InvalidAddress { .. } | RelayError::InvalidBody(_) => ErrorKind::Validation,
            RelayError::Rpc(RpcError::Decode { .. }) => ErrorKind::Internal,
            RelayError::Rpc(RpcError::Rpc { .. }) | RelayError::Reverted(_) => {
                ErrorKind::NodeRejected
            }
            RelayError::Rpc(RpcError::Transport(_)) | RelayError::ReceiptTimeout { .. } => {
                ErrorKind::UpstreamUnavailable
            }
            RelayError::Contract(_) | RelayError::NoAccounts => ErrorKind::Internal,
        }
    }

    /// Message safe to return to callers. Internal detail stays in the server log.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::InvalidAddress { reason, .. } => format!("Invalid node address: {}", reason),
            RelayError::InvalidBody(_) => {
                "Invalid request body (expected JSON or form field 'address')".to_string()
            }
            RelayError::Reverted(tx_hash) => format!("Transaction {:?} reverted", tx_hash),
            RelayError::ReceiptTimeout { tx_hash, .. } => {
                format!("Transaction {:?} was not mined in time", tx_hash)
            }
            other => match other.kind() {
                ErrorKind::UpstreamUnavailable => "Blockchain node unavailable".to_string(),
                ErrorKind::NodeRejected => "Node rejected the request".to_string(),
                _ => "Internal error".to_string(),
            },
        }
    }
}
