//! contract-vault - encrypted storage for personal contracts
//!
//! This library keeps a list of contracts (insurance, utilities,
//! subscriptions, ...) in a single password-protected file. The file is
//! encrypted with AES-256-GCM under a key derived from the password with
//! PBKDF2-HMAC-SHA256.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Key derivation and the encrypted file envelope
//! - `models`: The contract record and its identifier
//! - `storage`: In-memory contract store and atomic file writes
//! - `services`: Vault sessions (load, save, shutdown)
//! - `cli`: Command handlers for the `contracts` binary
//! - `display`: Terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use contract_vault::models::ContractDraft;
//! use contract_vault::services::VaultSession;
//!
//! let session = VaultSession::new();
//! session.store().create(ContractDraft::new("insurance", "Health", 100.0, 12))?;
//! session.save("contracts.vault", "correct horse battery")?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
