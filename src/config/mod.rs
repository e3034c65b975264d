//! Configuration module for contract-vault
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (default vault file, KDF bound)

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::Settings;
