//! Contract handle: a fixed on-chain address bound to the ABI of a compiled artifact.
//!
//! Only static argument types are encoded (`address`, `bool`, `uintN`, `bytes32`), which
//! covers the authority-management methods this service calls.

use alloy_primitives::{Address, B256, U256};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::crypto::hashing::{keccak256, parse_address, to_checksum_address};

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("function '{0}' is not in the contract ABI")]
    UnknownFunction(String),
    #[error("function '{name}' takes {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("argument {index} of '{name}' must be {expected}")]
    TypeMismatch {
        name: String,
        index: usize,
        expected: String,
    },
    #[error("ABI type '{0}' is not supported")]
    UnsupportedType(String),
}

/// A Truffle-style build artifact (`build/contracts/<Name>.json`).
#[derive(Deserialize, Debug, Clone)]
pub struct ContractArtifact {
    #[serde(rename = "contractName", default)]
    pub contract_name: Option<String>,
    pub abi: Vec<AbiEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

impl AbiEntry {
    /// Canonical signature, e.g. `addAuthorityNode(address)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.param_type.as_str()).collect();
        format!("{}({})", self.name.as_deref().unwrap_or_default(), types.join(","))
    }

    /// `view` and `pure` functions cannot change contract state.
    pub fn is_read_only(&self) -> bool {
        matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }

    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        let mut out = [0u8; 4];
        out.copy_from_slice(&hash.as_bytes()[..4]);
        out
    }
}

/// A single ABI-encodable argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Bool(bool),
    FixedBytes32(B256),
}

impl Token {
    fn matches(&self, abi_type: &str) -> Result<bool, ContractError> {
        Ok(match abi_type {
            "address" => matches!(self, Token::Address(_)),
            "bool" => matches!(self, Token::Bool(_)),
            "bytes32" => matches!(self, Token::FixedBytes32(_)),
            t if is_uint_type(t) => matches!(self, Token::Uint(_)),
            other => return Err(ContractError::UnsupportedType(other.to_string())),
        })
    }

    fn encode_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        match self {
            Token::Address(a) => word[12..].copy_from_slice(a.as_slice()),
            Token::Uint(v) => word = v.to_be_bytes::<32>(),
            Token::Bool(b) => word[31] = u8::from(*b),
            Token::FixedBytes32(h) => word.copy_from_slice(h.as_slice()),
        }
        word
    }
}

fn is_uint_type(t: &str) -> bool {
    match t.strip_prefix("uint") {
        Some("") => true,
        Some(bits) => bits
            .parse::<u16>()
            .map(|n| n > 0 && n <= 256 && n % 8 == 0)
            .unwrap_or(false),
        None => false,
    }
}

/// An immutable binding of contract address and ABI, shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    address: Address,
    name: String,
    functions: Vec<AbiEntry>,
}

impl ContractHandle {
    pub fn new(address: Address, artifact: ContractArtifact) -> Self {
        let functions = artifact
            .abi
            .into_iter()
            .filter(|e| e.entry_type == "function" && e.name.is_some())
            .collect();
        Self {
            address,
            name: artifact.contract_name.unwrap_or_else(|| "contract".to_string()),
            functions,
        }
    }

    /// Reads the artifact at `path` and binds it to `address`.
    pub fn load(path: impl AsRef<Path>, address: &str) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read contract artifact {}: {}", path.display(), e)
        })?;
        let artifact: ContractArtifact = serde_json::from_str(&raw).map_err(|e| {
            anyhow::anyhow!("Invalid contract artifact {}: {}", path.display(), e)
        })?;
        let address = parse_address(address)
            .map_err(|e| anyhow::anyhow!("Invalid contract address {}: {}", address, e))?;
        Ok(Self::new(address, artifact))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 rendering of the contract address.
    pub fn address_hex(&self) -> String {
        to_checksum_address(&self.address)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self, name: &str) -> Result<&AbiEntry, ContractError> {
        self.functions
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
    }

    /// ABI-encodes a call: 4-byte selector followed by one 32-byte word per argument.
    pub fn encode_call(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, ContractError> {
        let function = self.function(name)?;
        if function.inputs.len() != args.len() {
            return Err(ContractError::ArityMismatch {
                name: name.to_string(),
                expected: function.inputs.len(),
                got: args.len(),
            });
        }

        let mut data = Vec::with_capacity(4 + 32 * args.len());
        data.extend_from_slice(&function.selector());
        for (index, (param, token)) in function.inputs.iter().zip(args).enumerate() {
            if !token.matches(&param.param_type)? {
                return Err(ContractError::TypeMismatch {
                    name: name.to_string(),
                    index,
                    expected: param.param_type.clone(),
                });
            }
            data.extend_from_slice(&token.encode_word());
        }
        Ok(data)
    }
}
