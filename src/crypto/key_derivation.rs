//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives the AES-256 key from a user password. The iteration count is
//! fixed because the vault file does not record it.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use hmac::Hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 65_536;

/// Length of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a password and salt
///
/// Same inputs always give the same key. The salt is owned by the caller.
pub fn derive_key(password: &str, salt: &[u8]) -> VaultResult<DerivedKey> {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key)
        .map_err(|e| VaultError::KeyDerivation(format!("PBKDF2 failed: {}", e)))?;

    Ok(DerivedKey { key })
}

/// Derive a key on a worker thread, giving up after `timeout`
///
/// `None` runs the derivation inline. On timeout the worker finishes in the
/// background and its result is dropped.
pub fn derive_key_bounded(
    password: &str,
    salt: &[u8],
    timeout: Option<Duration>,
) -> VaultResult<DerivedKey> {
    let Some(timeout) = timeout else {
        return derive_key(password, salt);
    };

    let (tx, rx) = mpsc::channel();
    let password = zeroize::Zeroizing::new(password.to_owned());
    let salt = salt.to_vec();

    thread::Builder::new()
        .name("vault-kdf".into())
        .spawn(move || {
            let _ = tx.send(derive_key(&password, &salt));
        })
        .map_err(|e| VaultError::KeyDerivation(format!("Failed to spawn KDF worker: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "key derivation timed out");
            Err(VaultError::KeyDerivationTimeout(timeout.as_secs()))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(VaultError::KeyDerivation(
            "KDF worker exited without a result".to_string(),
        )),
    }
}
