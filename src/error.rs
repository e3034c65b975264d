//! Custom error types for contract-vault
//!
//! Every failure the vault can report is a distinct variant so callers can
//! branch on the kind instead of matching on messages.

use thiserror::Error;

/// The main error type for contract-vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// The vault file is missing or unreadable
    #[error("File unavailable: {path}: {reason}")]
    FileUnavailable { path: String, reason: String },

    /// The envelope bytes do not have a valid layout
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Wrong password or tampered data; the two are indistinguishable
    #[error("Could not unlock the vault: wrong password or corrupted data")]
    AuthenticationFailure,

    /// Decrypted bytes are not a valid list of contracts
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Update referenced a field that contracts do not have
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// The key derivation primitive failed; never recovered from
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Key derivation did not finish within the configured bound
    #[error("Key derivation timed out after {0} seconds")]
    KeyDerivationTimeout(u64),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store refused a new contract
    #[error("Store is full ({0} contracts)")]
    CapacityExceeded(usize),

    /// No password has been supplied to the session yet
    #[error("Vault is locked: {0}")]
    Locked(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl VaultError {
    /// Create a "not found" error for contracts
    pub fn contract_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Contract",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "file unavailable" error for a path
    pub fn file_unavailable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::FileUnavailable {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True when the vault bytes could not be opened with the given password
    pub fn is_unlock_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailure | Self::MalformedEnvelope(_)
        )
    }

    /// Errors that must abort the operation instead of being retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::KeyDerivation(_))
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for contract-vault operations
pub type VaultResult<T> = Result<T, VaultError>;
