//! The add-authority-node operation.
//!
//! Two modes share one entry point:
//! 1.  `Diagnostic` lists the node's accounts and never touches the contract.
//! 2.  `Commit` sends `addAuthorityNode(address)` from the node's first account and waits
//!     for the receipt.

use alloy_primitives::{Bytes, B256, U64};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::crypto::hashing::{parse_address, to_checksum_address};
use crate::domain::error::RelayError;
use crate::infra::ethereum::{ContractHandle, NodeRpc, Token, TransactionReceipt, TransactionRequest};

pub const ADD_AUTHORITY_NODE: &str = "addAuthorityNode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayMode {
    #[default]
    Diagnostic,
    Commit,
}

impl FromStr for RelayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diagnostic" => Ok(RelayMode::Diagnostic),
            "commit" => Ok(RelayMode::Commit),
            other => Err(format!("unknown relay mode '{}'", other)),
        }
    }
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayMode::Diagnostic => write!(f, "diagnostic"),
            RelayMode::Commit => write!(f, "commit"),
        }
    }
}

/// How long to wait for a submitted transaction to be mined.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AuthorityOutcome {
    /// Diagnostic mode: the node's accounts, EIP-55 checksummed.
    Accounts(Vec<String>),
    /// Commit mode: the mined transaction.
    Committed(TransactionReceipt),
}

pub struct AuthorityService {
    node: Arc<dyn NodeRpc>,
    contract: Arc<ContractHandle>,
    mode: RelayMode,
    receipts: ReceiptPolicy,
    gas: Option<u64>,
}

impl AuthorityService {
    pub fn new(node: Arc<dyn NodeRpc>, contract: Arc<ContractHandle>, mode: RelayMode) -> Self {
        Self {
            node,
            contract,
            mode,
            receipts: ReceiptPolicy::default(),
            gas: None,
        }
    }

    pub fn with_receipt_policy(mut self, receipts: ReceiptPolicy) -> Self {
        self.receipts = receipts;
        self
    }

    pub fn with_gas(mut self, gas: Option<u64>) -> Self {
        self.gas = gas;
        self
    }

    pub fn mode(&self) -> RelayMode {
        self.mode
    }

    pub async fn add_authority_node(
        &self,
        address: Option<&str>,
    ) -> Result<AuthorityOutcome, RelayError> {
        match self.mode {
            RelayMode::Diagnostic => {
                let accounts: Vec<String> = self
                    .node
                    .accounts()
                    .await?
                    .iter()
                    .map(to_checksum_address)
                    .collect();
                println!("> Node accounts: {:?}", accounts);
                Ok(AuthorityOutcome::Accounts(accounts))
            }
            RelayMode::Commit => {
                let receipt = self.commit(address).await?;
                Ok(AuthorityOutcome::Committed(receipt))
            }
        }
    }

    async fn commit(&self, address: Option<&str>) -> Result<TransactionReceipt, RelayError> {
        let input = address.unwrap_or_default();
        let node_address = parse_address(input).map_err(|reason| RelayError::InvalidAddress {
            input: input.to_string(),
            reason,
        })?;

        let data = self
            .contract
            .encode_call(ADD_AUTHORITY_NODE, &[Token::Address(node_address)])?;

        let accounts = self.node.accounts().await?;
        let from = accounts.into_iter().next().ok_or(RelayError::NoAccounts)?;

        let tx = TransactionRequest {
            from,
            to: self.contract.address(),
            data: Bytes::from(data),
            gas: self.gas.map(U64::from),
        };
        let tx_hash = self.node.send_transaction(&tx).await?;
        println!("> Submitted {}({}) as {:?}", ADD_AUTHORITY_NODE, input, tx_hash);

        let receipt = self.wait_for_receipt(&tx_hash).await?;
        if receipt.reverted() {
            return Err(RelayError::Reverted(tx_hash));
        }
        match receipt.block_number {
            Some(block) => println!("> Transaction {:?} mined in block {}", tx_hash, block),
            None => println!("> Transaction {:?} mined", tx_hash),
        }
        Ok(receipt)
    }

    async fn wait_for_receipt(&self, tx_hash: &B256) -> Result<TransactionReceipt, RelayError> {
        for attempt in 0..self.receipts.attempts {
            if let Some(receipt) = self.node.transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            if attempt + 1 < self.receipts.attempts {
                tokio::time::sleep(self.receipts.interval).await;
            }
        }
        Err(RelayError::ReceiptTimeout {
            tx_hash: *tx_hash,
            attempts: self.receipts.attempts,
        })
    }
}
