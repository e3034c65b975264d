//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the vault session.

pub mod context;
pub mod contract;
pub mod password;
pub mod vault;

pub use context::VaultContext;
pub use contract::{handle_contract_command, ContractCommands};
pub use password::PASSWORD_ENV_VAR;
pub use vault::{handle_vault_command, VaultCommands};
