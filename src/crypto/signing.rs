//! secp256k1 message signing.
//!
//! Produces Ethereum-style recoverable signatures: RFC 6979 deterministic nonces, low-s
//! normalized, with `v = 27 + recovery_id`.

use alloy_primitives::Address;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use primitive_types::H256;
use std::fmt;
use thiserror::Error;

use crate::crypto::hashing::{message_digest, strip_hex_prefix};

/// Offset added to the recovery id to form `v`.
const V_OFFSET: u8 = 27;

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("private key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("private key must be 32 bytes, got {0}")]
    InvalidLength(usize),
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// A secp256k1 private key.
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Parses a hex-encoded 32-byte scalar. A leading `0x` or `0X` is optional.
    pub fn from_hex(s: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(strip_hex_prefix(s.trim()))?;
        if bytes.len() != 32 {
            return Err(SigningError::InvalidLength(bytes.len()));
        }
        // Rejects zero and values >= the curve order.
        let inner = SigningKey::from_slice(&bytes).map_err(|_| SigningError::InvalidScalar)?;
        Ok(Self { inner })
    }

    /// The Ethereum address controlled by this key.
    pub fn address(&self) -> Address {
        Address::from_public_key(self.inner.verifying_key())
    }

    pub fn sign_digest(&self, digest: &H256) -> Result<RecoverableSignature, SigningError> {
        let (signature, recovery_id) = self
            .inner
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| SigningError::Signing(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(RecoverableSignature {
            r,
            s,
            v: V_OFFSET + recovery_id.to_byte(),
        })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &hex::encode(self.address().as_slice()))
            .finish_non_exhaustive()
    }
}

/// The `(r, s, v)` triple of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

/// A digest together with its signature, as printed by the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedMessage {
    pub digest: H256,
    pub signature: RecoverableSignature,
}

impl fmt::Display for SignedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{}{:x}{}{}",
            hex::encode(self.digest.as_bytes()),
            self.signature.v,
            hex::encode(self.signature.r),
            hex::encode(self.signature.s)
        )
    }
}

/// Hashes `message` (see [`message_digest`]) and signs the digest.
pub fn sign_message(message: &str, key: &PrivateKey) -> Result<SignedMessage, SigningError> {
    let digest = message_digest(message);
    let signature = key.sign_digest(&digest)?;
    Ok(SignedMessage { digest, signature })
}

/// Recovers the signer address from a digest and its signature.
pub fn recover_address(
    digest: &H256,
    signature: &RecoverableSignature,
) -> Result<Address, SigningError> {
    let recovery_id = signature
        .v
        .checked_sub(V_OFFSET)
        .and_then(RecoveryId::from_byte)
        .ok_or_else(|| SigningError::InvalidSignature(format!("bad v value {}", signature.v)))?;

    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&signature.r);
    rs[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&rs).map_err(|e| SigningError::InvalidSignature(e.to_string()))?;

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id)
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
    Ok(Address::from_public_key(&key))
}
