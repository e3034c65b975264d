//! Storage layer for contract-vault
//!
//! The in-memory contract store plus byte-level file helpers with atomic
//! writes. Encryption happens one layer up, in the session.

pub mod contracts;
pub mod file_io;

pub use contracts::{smallest_unused_id, ContractStore};
pub use file_io::{read_bytes, write_bytes_atomic};
