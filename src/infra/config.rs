//! Centralized configuration (environment variables + defaults).
//!
//! Defaults match a local Ganache development chain.

use std::time::Duration;

use crate::domain::authority::RelayMode;

pub const SIGNER_PRIVATE_KEY_VAR: &str = "SIGNER_PRIVATE_KEY";

const DEFAULT_RPC_URL: &str = "http://localhost:7545";
const DEFAULT_CONTRACT_ADDRESS: &str = "0x56f8195D5d8F271D3e9ED045E99A7d734608893D";
const DEFAULT_CONTRACT_ARTIFACT: &str = "contracts/Reputation.json";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SIGN_MESSAGE: &str = "Hello World";

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, v)),
        Err(_) => Ok(None),
    }
}

/// Ethereum JSON-RPC endpoint.
pub fn rpc_url() -> String {
    var_or("ETH_RPC_URL", DEFAULT_RPC_URL)
}

/// Address of the deployed authority contract.
pub fn contract_address() -> String {
    var_or("CONTRACT_ADDRESS", DEFAULT_CONTRACT_ADDRESS)
}

/// Path of the compiled contract artifact (`~` expanded).
pub fn contract_artifact_path() -> String {
    shellexpand::tilde(&var_or("CONTRACT_ARTIFACT", DEFAULT_CONTRACT_ARTIFACT)).to_string()
}

pub fn listen_addr() -> String {
    var_or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
}

/// `diagnostic` (default) or `commit`.
pub fn relay_mode() -> anyhow::Result<RelayMode> {
    Ok(parse_var::<RelayMode>("RELAY_MODE")?.unwrap_or_default())
}

/// Optional gas limit attached to submitted transactions.
pub fn tx_gas() -> anyhow::Result<Option<u64>> {
    parse_var("TX_GAS")
}

/// Per-call RPC timeout. Unset means requests wait for the node indefinitely.
pub fn rpc_timeout() -> anyhow::Result<Option<Duration>> {
    Ok(parse_var::<u64>("RPC_TIMEOUT_SECS")?.map(Duration::from_secs))
}

pub fn receipt_poll_attempts() -> anyhow::Result<u32> {
    Ok(parse_var::<u32>("RECEIPT_POLL_ATTEMPTS")?.unwrap_or(20).max(1))
}

pub fn receipt_poll_interval() -> anyhow::Result<Duration> {
    Ok(Duration::from_millis(
        parse_var::<u64>("RECEIPT_POLL_INTERVAL_MS")?.unwrap_or(500),
    ))
}

/// Path of a file holding the signer key, if configured.
pub fn signer_key_file() -> Option<String> {
    std::env::var("SIGNER_KEY_FILE").ok().filter(|p| !p.trim().is_empty())
}

/// Message signed by `sign_message` when none is given on the command line.
pub fn message_to_sign() -> String {
    var_or("SIGN_MESSAGE", DEFAULT_SIGN_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns the variables it touches; tests run in parallel within one process.

    #[test]
    fn parse_var_handles_valid_invalid_and_unset() {
        std::env::set_var("RELAY_TEST_PARSE_VALID", " 42 ");
        assert_eq!(parse_var::<u32>("RELAY_TEST_PARSE_VALID").unwrap(), Some(42));

        std::env::set_var("RELAY_TEST_PARSE_INVALID", "forty-two");
        let err = parse_var::<u32>("RELAY_TEST_PARSE_INVALID").unwrap_err();
        assert!(err.to_string().contains("RELAY_TEST_PARSE_INVALID"));
        assert!(err.to_string().contains("forty-two"));

        std::env::remove_var("RELAY_TEST_PARSE_UNSET");
        assert_eq!(parse_var::<u32>("RELAY_TEST_PARSE_UNSET").unwrap(), None);
    }

    #[test]
    fn relay_mode_rejects_unknown_values() {
        std::env::set_var("RELAY_MODE", "bogus");
        let err = relay_mode().unwrap_err();
        assert!(err.to_string().contains("RELAY_MODE"));

        std::env::set_var("RELAY_MODE", "commit");
        assert_eq!(relay_mode().unwrap(), RelayMode::Commit);

        std::env::remove_var("RELAY_MODE");
        assert_eq!(relay_mode().unwrap(), RelayMode::Diagnostic);
    }

    #[test]
    fn receipt_poll_attempts_is_at_least_one() {
        std::env::set_var("RECEIPT_POLL_ATTEMPTS", "0");
        assert_eq!(receipt_poll_attempts().unwrap(), 1);

        std::env::set_var("RECEIPT_POLL_ATTEMPTS", "7");
        assert_eq!(receipt_poll_attempts().unwrap(), 7);

        std::env::set_var("RECEIPT_POLL_ATTEMPTS", "-1");
        assert!(receipt_poll_attempts().is_err());

        std::env::remove_var("RECEIPT_POLL_ATTEMPTS");
        assert_eq!(receipt_poll_attempts().unwrap(), 20);
    }

    #[test]
    fn rpc_timeout_is_opt_in() {
        std::env::remove_var("RPC_TIMEOUT_SECS");
        assert_eq!(rpc_timeout().unwrap(), None);

        std::env::set_var("RPC_TIMEOUT_SECS", "15");
        assert_eq!(rpc_timeout().unwrap(), Some(Duration::from_secs(15)));

        std::env::set_var("RPC_TIMEOUT_SECS", "soon");
        assert!(rpc_timeout().is_err());

        std::env::remove_var("RPC_TIMEOUT_SECS");
    }

    #[test]
    fn poll_interval_and_gas_defaults() {
        std::env::remove_var("RECEIPT_POLL_INTERVAL_MS");
        assert_eq!(receipt_poll_interval().unwrap(), Duration::from_millis(500));

        std::env::set_var("TX_GAS", "300000");
        assert_eq!(tx_gas().unwrap(), Some(300_000));
        std::env::remove_var("TX_GAS");
        assert_eq!(tx_gas().unwrap(), None);
    }
}
