pub mod hashing;
pub mod key_source;
pub mod signing;
