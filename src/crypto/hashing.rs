// Keccak-256 helpers shared by the signer and the contract encoder.

use alloy_primitives::Address;
use primitive_types::H256;

/// Hashes arbitrary bytes into a H256 digest.
pub fn keccak256(data: &[u8]) -> H256 {
    H256::from(alloy_primitives::keccak256(data).0)
}

/// Digest signed by the message signer.
///
/// The message is hashed as the ASCII text of its lowercase hex encoding, not as its raw
/// bytes. Existing verifiers depend on this exact wire format.
pub fn message_digest(message: &str) -> H256 {
    let hex_text = hex::encode(message.as_bytes());
    keccak256(hex_text.as_bytes())
}

/// Renders an address in EIP-55 mixed-case checksum form.
pub fn to_checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Parses a 20-byte hex address. A `0x` or `0X` prefix is optional.
///
/// All-lowercase and all-uppercase input is accepted as is. Mixed-case input must carry a
/// valid EIP-55 checksum.
pub fn parse_address(s: &str) -> Result<Address, String> {
    let body = strip_hex_prefix(s.trim());
    let bytes = hex::decode(body).map_err(|_| "invalid hex".to_string())?;
    if bytes.len() != 20 {
        return Err("expected 20-byte hex address".to_string());
    }
    let address = Address::from_slice(&bytes);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && &to_checksum_address(&address)[2..] != body {
        return Err("address checksum mismatch".to_string());
    }
    Ok(address)
}

/// Drops a leading `0x` or `0X`.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
