//! Path management for contract-vault
//!
//! ## Path Resolution Order
//!
//! 1. `CONTRACT_VAULT_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/contract-vault` or `~/.config/contract-vault`
//! 3. Windows: `%APPDATA%\contract-vault`

use std::path::PathBuf;

use crate::error::VaultError;

/// Environment variable that overrides the configuration directory
pub const DIR_ENV_VAR: &str = "CONTRACT_VAULT_DIR";

/// File name used when no vault path has been configured
pub const DEFAULT_VAULT_FILE: &str = "contracts.vault";

/// Manages all paths used by contract-vault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for configuration
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Create a new VaultPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var(DIR_ENV_VAR) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/contract-vault/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))
    }
}

/// Vault file used when the settings name none: `contracts.vault` in the
/// current working directory
pub fn default_vault_file() -> Result<PathBuf, VaultError> {
    let cwd = std::env::current_dir().map_err(|e| {
        VaultError::Config(format!("Could not determine working directory: {}", e))
    })?;
    Ok(cwd.join(DEFAULT_VAULT_FILE))
}

/// Resolve the default configuration directory based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var("HOME")
                .map_err(|_| VaultError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("contract-vault"))
}

/// Resolve the default configuration directory based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, VaultError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| VaultError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("contract-vault"))
}
