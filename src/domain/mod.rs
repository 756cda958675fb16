pub mod authority;
pub mod error;

pub use authority::{AuthorityOutcome, AuthorityService, ReceiptPolicy, RelayMode};
pub use error::{ErrorKind, RelayError};
