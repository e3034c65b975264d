//! Service layer for contract-vault
//!
//! The session ties the store to its encrypted file.

pub mod session;

pub use session::{decode_contracts, encode_contracts, SessionState, VaultSession};
