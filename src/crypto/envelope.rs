//! AES-256-GCM envelope encryption/decryption
//!
//! An envelope is the complete byte image of a vault file:
//!
//! ```text
//! [u32 BE nonce length = 12][nonce (12)][ciphertext][tag (16)]
//! ```
//!
//! The nonce also serves as the PBKDF2 salt, so everything needed for
//! decryption except the password travels inside the envelope.

use std::time::Duration;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{VaultError, VaultResult};

use super::key_derivation::derive_key_bounded;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the big-endian nonce length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest byte count a well-formed envelope can have (empty plaintext)
pub const MIN_ENVELOPE_SIZE: usize = LENGTH_PREFIX_SIZE + NONCE_SIZE + TAG_SIZE;

/// A parsed envelope; lives only for the duration of one encrypt or decrypt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: [u8; NONCE_SIZE],
    /// Ciphertext followed by the authentication tag
    sealed: Vec<u8>,
}

impl Envelope {
    /// Split raw envelope bytes into nonce and sealed payload
    ///
    /// The length prefix is attacker-controlled, so it is checked against the
    /// single valid nonce length before being used as a slice bound.
    pub fn parse(bytes: &[u8]) -> VaultResult<Self> {
        let prefix: [u8; LENGTH_PREFIX_SIZE] = bytes
            .get(..LENGTH_PREFIX_SIZE)
            .and_then(|p| p.try_into().ok())
            .ok_or_else(|| {
                VaultError::MalformedEnvelope(format!(
                    "envelope is {} bytes, too short for the length prefix",
                    bytes.len()
                ))
            })?;

        let declared = u32::from_be_bytes(prefix);
        if declared as usize != NONCE_SIZE {
            return Err(VaultError::MalformedEnvelope(format!(
                "invalid nonce length: expected {}, got {}",
                NONCE_SIZE, declared
            )));
        }

        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(VaultError::MalformedEnvelope(format!(
                "envelope is {} bytes, need at least {}",
                bytes.len(),
                MIN_ENVELOPE_SIZE
            )));
        }

        let body = &bytes[LENGTH_PREFIX_SIZE..];
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&body[..NONCE_SIZE]);

        Ok(Self {
            nonce,
            sealed: body[NONCE_SIZE..].to_vec(),
        })
    }

    /// Serialize back to the on-disk layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + NONCE_SIZE + self.sealed.len());
        out.extend_from_slice(&(NONCE_SIZE as u32).to_be_bytes());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.sealed);
        out
    }

    /// The nonce, which doubles as the KDF salt
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext without the trailing tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.sealed[..self.sealed.len() - TAG_SIZE]
    }

    /// The trailing authentication tag
    pub fn tag(&self) -> &[u8] {
        &self.sealed[self.sealed.len() - TAG_SIZE..]
    }
}

/// Password-based envelope cipher
///
/// Carries the optional bound on key derivation; the cipher itself holds no
/// key material between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCipher {
    kdf_timeout: Option<Duration>,
}

impl EnvelopeCipher {
    /// Create a cipher with an unbounded KDF
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cipher whose key derivation gives up after `timeout`
    pub fn with_kdf_timeout(timeout: Option<Duration>) -> Self {
        Self {
            kdf_timeout: timeout,
        }
    }

    /// The configured KDF bound
    pub fn kdf_timeout(&self) -> Option<Duration> {
        self.kdf_timeout
    }

    /// Encrypt `plaintext` under `password` into a fresh envelope
    ///
    /// A new random nonce is drawn on every call, so encrypting the same
    /// input twice never yields the same bytes.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> VaultResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let key = derive_key_bounded(password, &nonce, self.kdf_timeout)?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            envelope_len = LENGTH_PREFIX_SIZE + NONCE_SIZE + sealed.len(),
            "sealed envelope"
        );

        Ok(Envelope { nonce, sealed }.to_bytes())
    }

    /// Open an envelope with `password`
    ///
    /// A wrong password and a modified envelope both surface as
    /// [`VaultError::AuthenticationFailure`].
    pub fn decrypt(&self, envelope: &[u8], password: &str) -> VaultResult<Vec<u8>> {
        let envelope = Envelope::parse(envelope)?;

        let key = derive_key_bounded(password, envelope.nonce(), self.kdf_timeout)?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

        cipher
            .decrypt(Nonce::from_slice(envelope.nonce()), envelope.sealed.as_slice())
            .map_err(|_| VaultError::AuthenticationFailure)
    }
}

/// Encrypt with an unbounded KDF
pub fn encrypt(plaintext: &[u8], password: &str) -> VaultResult<Vec<u8>> {
    EnvelopeCipher::new().encrypt(plaintext, password)
}

/// Decrypt with an unbounded KDF
pub fn decrypt(envelope: &[u8], password: &str) -> VaultResult<Vec<u8>> {
    EnvelopeCipher::new().decrypt(envelope, password)
}
