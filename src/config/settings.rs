//! User settings for contract-vault
//!
//! Remembers which vault file was used last (under the `Filepath` key) and
//! the limits applied to key derivation and passwords.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::{default_vault_file, VaultPaths};
use crate::error::VaultError;

/// User settings for contract-vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Vault file opened when none is given on the command line
    #[serde(
        rename = "Filepath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub filepath: Option<PathBuf>,

    /// Upper bound on one key derivation, in seconds (0 = unbounded)
    #[serde(default = "default_kdf_timeout_secs")]
    pub kdf_timeout_secs: u64,

    /// Shortest password accepted for new vaults
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_kdf_timeout_secs() -> u64 {
    30
}

fn default_min_password_length() -> usize {
    8
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            filepath: None,
            kdf_timeout_secs: default_kdf_timeout_secs(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                VaultError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                VaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            VaultError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| VaultError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The vault file to use: an explicit override, the remembered
    /// `Filepath`, or `contracts.vault` in the working directory
    pub fn resolve_vault_path(&self, explicit: Option<&Path>) -> Result<PathBuf, VaultError> {
        match explicit.or(self.filepath.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => default_vault_file(),
        }
    }

    /// Record `path` as the default vault file; returns whether it changed
    pub fn remember_vault_path(&mut self, path: &Path) -> bool {
        if self.filepath.as_deref() == Some(path) {
            return false;
        }
        self.filepath = Some(path.to_path_buf());
        true
    }

    /// The KDF bound as a duration, `None` when disabled
    pub fn kdf_timeout(&self) -> Option<Duration> {
        (self.kdf_timeout_secs > 0).then(|| Duration::from_secs(self.kdf_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.filepath.is_none());
        assert_eq!(settings.kdf_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.min_password_length, 8);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.remember_vault_path(Path::new("/data/contracts.vault"));
        settings.kdf_timeout_secs = 0;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.kdf_timeout(), None);
    }

    #[test]
    fn test_filepath_key() {
        let mut settings = Settings::default();
        settings.filepath = Some(PathBuf::from("/data/contracts.vault"));

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["Filepath"], "/data/contracts.vault");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_resolve_vault_path() {
        let mut settings = Settings::default();
        let explicit = Path::new("/tmp/explicit.vault");

        assert_eq!(
            settings.resolve_vault_path(Some(explicit)).unwrap(),
            explicit
        );
        assert_eq!(
            settings.resolve_vault_path(None).unwrap(),
            default_vault_file().unwrap()
        );

        settings.remember_vault_path(Path::new("/tmp/remembered.vault"));
        assert_eq!(
            settings.resolve_vault_path(None).unwrap(),
            PathBuf::from("/tmp/remembered.vault")
        );
    }

    #[test]
    fn test_remember_reports_change() {
        let mut settings = Settings::default();
        assert!(settings.remember_vault_path(Path::new("/a.vault")));
        assert!(!settings.remember_vault_path(Path::new("/a.vault")));
        assert!(settings.remember_vault_path(Path::new("/b.vault")));
    }
}
