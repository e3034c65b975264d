//! Vault session
//!
//! Ties the contract store to one encrypted file. Loading decrypts and
//! decodes the whole file before touching the store; saving encrypts a
//! snapshot under a fresh nonce and replaces the file atomically. A mutex
//! serializes load, save and shutdown against each other and guards the
//! remembered path and password.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::crypto::{EnvelopeCipher, SecureString};
use crate::error::{VaultError, VaultResult};
use crate::models::Contract;
use crate::storage::{read_bytes, write_bytes_atomic, ContractStore};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been loaded or saved yet
    Unloaded,
    /// The store mirrors a vault file
    Loaded,
}

#[derive(Debug)]
struct Credentials {
    state: SessionState,
    path: Option<PathBuf>,
    password: Option<SecureString>,
}

/// An open vault: the contract store plus the file it belongs to
#[derive(Debug)]
pub struct VaultSession {
    store: ContractStore,
    cipher: EnvelopeCipher,
    credentials: Mutex<Credentials>,
}

impl Default for VaultSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultSession {
    /// Create a session with an empty store and an unbounded KDF
    pub fn new() -> Self {
        Self::with_cipher(EnvelopeCipher::new())
    }

    /// Create a session that encrypts with `cipher`
    pub fn with_cipher(cipher: EnvelopeCipher) -> Self {
        Self::with_store(ContractStore::new(), cipher)
    }

    /// Create a session around an existing store
    pub fn with_store(store: ContractStore, cipher: EnvelopeCipher) -> Self {
        Self {
            store,
            cipher,
            credentials: Mutex::new(Credentials {
                state: SessionState::Unloaded,
                path: None,
                password: None,
            }),
        }
    }

    /// The contracts of this session
    pub fn store(&self) -> &ContractStore {
        &self.store
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, Credentials>> {
        self.credentials
            .lock()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire session lock: {}", e)))
    }

    /// Current lifecycle state
    pub fn state(&self) -> VaultResult<SessionState> {
        Ok(self.lock()?.state)
    }

    /// The path of the last successful load or save
    pub fn remembered_path(&self) -> VaultResult<Option<PathBuf>> {
        Ok(self.lock()?.path.clone())
    }

    /// Decrypt `path` with `password` and put its contracts into the store
    ///
    /// With `overwrite` the store is replaced, otherwise the file's contracts
    /// are merged in. Nothing changes unless the whole file decodes.
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        password: &str,
        overwrite: bool,
    ) -> VaultResult<Vec<Contract>> {
        let path = path.as_ref();
        let mut credentials = self.lock()?;

        tracing::info!(path = %path.display(), overwrite, "unlocking vault");

        let result = read_bytes(path)
            .and_then(|bytes| self.cipher.decrypt(&bytes, password))
            .and_then(|plaintext| decode_contracts(&plaintext));

        let incoming = match result {
            Ok(incoming) => incoming,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "vault load failed");
                return Err(e);
            }
        };

        let count = incoming.len();
        let contracts = self.store.absorb(incoming, overwrite)?;

        credentials.state = SessionState::Loaded;
        credentials.path = Some(path.to_path_buf());
        credentials.password = Some(SecureString::new(password));

        tracing::info!(loaded = count, total = contracts.len(), "vault unlocked");
        Ok(contracts)
    }

    /// Encrypt the store with `password` and write it to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P, password: &str) -> VaultResult<()> {
        let path = path.as_ref();
        let mut credentials = self.lock()?;

        self.write_locked(path, password)?;

        credentials.state = SessionState::Loaded;
        credentials.path = Some(path.to_path_buf());
        credentials.password = Some(SecureString::new(password));
        Ok(())
    }

    /// Persist with the remembered credentials before the process exits
    ///
    /// Writes to the remembered path, or to `fallback_path` when nothing was
    /// loaded or saved yet. Fails with [`VaultError::Locked`] when no
    /// password is known.
    pub fn prepare_shutdown<P: AsRef<Path>>(&self, fallback_path: P) -> VaultResult<()> {
        let mut credentials = self.lock()?;

        let password = credentials
            .password
            .clone()
            .ok_or_else(|| VaultError::Locked("no password has been supplied".to_string()))?;
        let path = credentials
            .path
            .clone()
            .unwrap_or_else(|| fallback_path.as_ref().to_path_buf());

        tracing::info!(path = %path.display(), "saving vault before shutdown");
        self.write_locked(&path, &password)?;

        credentials.state = SessionState::Loaded;
        credentials.path = Some(path);
        Ok(())
    }

    /// Encode, encrypt and write; the caller holds the session lock
    fn write_locked(&self, path: &Path, password: &str) -> VaultResult<()> {
        let snapshot = self.store.all()?;
        let plaintext = zeroize::Zeroizing::new(encode_contracts(&snapshot)?);
        let envelope = self.cipher.encrypt(&plaintext, password)?;

        write_bytes_atomic(path, &envelope).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "vault save failed");
            e
        })?;

        tracing::info!(
            path = %path.display(),
            contracts = snapshot.len(),
            bytes = envelope.len(),
            "vault saved"
        );
        Ok(())
    }
}

/// Parse decrypted bytes as a JSON array of contracts
pub fn decode_contracts(plaintext: &[u8]) -> VaultResult<Vec<Contract>> {
    let contracts: Vec<Contract> = serde_json::from_slice(plaintext)
        .map_err(|e| VaultError::Deserialization(e.to_string()))?;

    for contract in &contracts {
        contract.validate().map_err(|e| {
            VaultError::Deserialization(format!("contract {}: {}", contract.id, e))
        })?;
    }

    Ok(contracts)
}

/// Serialize contracts as the plaintext of a vault file
pub fn encode_contracts(contracts: &[Contract]) -> VaultResult<Vec<u8>> {
    Ok(serde_json::to_vec(contracts)?)
}
