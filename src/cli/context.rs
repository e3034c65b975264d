//! State shared by all commands of one invocation

use std::path::{Path, PathBuf};

use crate::config::{Settings, VaultPaths};
use crate::crypto::{EnvelopeCipher, SecureString};
use crate::error::VaultResult;
use crate::services::VaultSession;

use super::password::password_or_prompt;

/// Paths, settings and credentials for the current command
pub struct VaultContext {
    pub paths: VaultPaths,
    pub settings: Settings,
    /// Vault file the command operates on
    pub vault_path: PathBuf,
    password: Option<SecureString>,
}

impl VaultContext {
    /// Resolve the vault file from `explicit` or the settings
    pub fn new(
        paths: VaultPaths,
        settings: Settings,
        explicit: Option<&Path>,
        password: Option<SecureString>,
    ) -> VaultResult<Self> {
        let vault_path = settings.resolve_vault_path(explicit)?;
        Ok(Self {
            paths,
            settings,
            vault_path,
            password,
        })
    }

    /// The password given up front, if any
    pub fn supplied_password(&self) -> Option<&SecureString> {
        self.password.as_ref()
    }

    /// An empty session using the configured KDF bound
    pub fn new_session(&self) -> VaultSession {
        VaultSession::with_cipher(EnvelopeCipher::with_kdf_timeout(self.settings.kdf_timeout()))
    }

    /// Unlock the vault file into a fresh session
    ///
    /// Prompts for the password when none was supplied. On success the file
    /// becomes the default vault for later invocations.
    pub fn open_session(&mut self) -> VaultResult<VaultSession> {
        let password = password_or_prompt(self.password.as_ref(), "Vault password: ")?;
        let session = self.new_session();
        session.load(&self.vault_path, &password, true)?;

        self.password = Some(password);
        self.remember_vault_path()?;
        Ok(session)
    }

    /// Record the vault file under `Filepath` in the settings
    pub fn remember_vault_path(&mut self) -> VaultResult<()> {
        if self.settings.remember_vault_path(&self.vault_path) {
            tracing::debug!(path = %self.vault_path.display(), "remembering vault path");
            self.settings.save(&self.paths)?;
        }
        Ok(())
    }
}
