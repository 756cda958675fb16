pub mod crypto;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use crypto::hashing::{keccak256, message_digest, to_checksum_address};
pub use crypto::signing::{recover_address, sign_message, PrivateKey, SignedMessage};
pub use domain::{AuthorityService, RelayMode};
pub use infra::ethereum::{self as ethereum, ContractHandle, EthClient};
