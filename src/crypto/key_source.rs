//! Where the signer's private key comes from.
//!
//! The key is never a source literal. Deployments pick an environment variable or a key
//! file. Callers that already hold the secret (tests, embedding services) inject it
//! directly.

use std::path::PathBuf;

use crate::crypto::signing::PrivateKey;
use crate::infra::config;

pub trait KeySource {
    /// Loads and parses the key.
    fn load(&self) -> anyhow::Result<PrivateKey>;

    /// Human readable origin, safe to log.
    fn describe(&self) -> String;
}

/// Reads the hex key from an environment variable.
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl KeySource for EnvKeySource {
    fn load(&self) -> anyhow::Result<PrivateKey> {
        let raw = std::env::var(&self.var)
            .map_err(|_| anyhow::anyhow!("{} must be set", self.var))?;
        Ok(PrivateKey::from_hex(&raw)?)
    }

    fn describe(&self) -> String {
        format!("env:{}", self.var)
    }
}

/// Reads the hex key from a file (surrounding whitespace ignored, `~` expanded).
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    pub fn new(path: &str) -> Self {
        Self {
            path: PathBuf::from(shellexpand::tilde(path).as_ref()),
        }
    }
}

impl KeySource for FileKeySource {
    fn load(&self) -> anyhow::Result<PrivateKey> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            anyhow::anyhow!("Failed to read key file {}: {}", self.path.display(), e)
        })?;
        Ok(PrivateKey::from_hex(raw.trim())?)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// A key handed in by the caller.
pub struct StaticKeySource {
    hex: String,
}

impl StaticKeySource {
    pub fn new(hex: impl Into<String>) -> Self {
        Self { hex: hex.into() }
    }
}

impl KeySource for StaticKeySource {
    fn load(&self) -> anyhow::Result<PrivateKey> {
        Ok(PrivateKey::from_hex(&self.hex)?)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Picks the key source from configuration: `SIGNER_KEY_FILE` wins over
/// `SIGNER_PRIVATE_KEY`.
pub fn from_config() -> Box<dyn KeySource> {
    match config::signer_key_file() {
        Some(path) => Box::new(FileKeySource::new(&path)),
        None => Box::new(EnvKeySource::new(config::SIGNER_PRIVATE_KEY_VAR)),
    }
}
