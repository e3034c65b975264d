//! Cryptographic functions for contract-vault
//!
//! Provides AES-256-GCM envelopes with PBKDF2-HMAC-SHA256 key derivation
//! for the encrypted vault file.

pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{decrypt, encrypt, Envelope, EnvelopeCipher};
pub use key_derivation::{derive_key, derive_key_bounded, DerivedKey};
pub use secure_memory::SecureString;
