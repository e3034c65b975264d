//! Vault file CLI commands
//!
//! Creating, importing into and exporting whole vault files.

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{VaultError, VaultResult};

use super::context::VaultContext;
use super::password::{
    new_password_or_prompt, password_from_env, password_or_prompt, NEW_PASSWORD_ENV_VAR,
    SOURCE_PASSWORD_ENV_VAR,
};

/// Vault file subcommands
#[derive(Subcommand)]
pub enum VaultCommands {
    /// Create a new, empty vault file
    Init {
        /// Replace an existing vault file
        #[arg(long)]
        force: bool,
    },
    /// Load the contracts of another vault file into this one
    Import {
        /// Vault file to read from
        source: PathBuf,
        /// Replace the current contracts instead of merging
        #[arg(long)]
        overwrite: bool,
    },
    /// Write the contracts to another vault file
    Export {
        /// Vault file to create
        dest: PathBuf,
        /// Encrypt the copy with the current password
        #[arg(long)]
        same_password: bool,
    },
    /// Show current configuration and paths
    Config,
}

/// Handle a vault file command
pub fn handle_vault_command(ctx: &mut VaultContext, cmd: VaultCommands) -> VaultResult<()> {
    match cmd {
        VaultCommands::Init { force } => init_vault(ctx, force),
        VaultCommands::Import { source, overwrite } => import_vault(ctx, source, overwrite),
        VaultCommands::Export {
            dest,
            same_password,
        } => export_vault(ctx, dest, same_password),
        VaultCommands::Config => {
            show_config(ctx);
            Ok(())
        }
    }
}

fn init_vault(ctx: &mut VaultContext, force: bool) -> VaultResult<()> {
    if ctx.vault_path.exists() && !force {
        return Err(VaultError::Validation(format!(
            "{} already exists. Use --force to replace it.",
            ctx.vault_path.display()
        )));
    }

    let password = new_password_or_prompt(
        ctx.supplied_password(),
        ctx.settings.min_password_length,
    )?;

    println!("Creating vault at: {}", ctx.vault_path.display());
    ctx.new_session().save(&ctx.vault_path, &password)?;
    ctx.remember_vault_path()?;

    println!("Vault created.");
    println!("Remember your password - there is no recovery mechanism!");
    Ok(())
}

fn import_vault(ctx: &mut VaultContext, source: PathBuf, overwrite: bool) -> VaultResult<()> {
    let session = ctx.open_session()?;
    let password = password_or_prompt(ctx.supplied_password(), "Vault password: ")?;

    let source_password = password_or_prompt(
        password_from_env(SOURCE_PASSWORD_ENV_VAR).as_ref(),
        &format!("Password for {}: ", source.display()),
    )?;

    let before = session.store().len()?;
    let contracts = session.load(&source, &source_password, overwrite)?;

    // The session now points at the source; write back to our own file
    session.save(&ctx.vault_path, &password)?;

    if overwrite {
        println!(
            "Replaced {} contracts with {} from {}",
            before,
            contracts.len(),
            source.display()
        );
    } else {
        println!(
            "Imported {} contracts from {} ({} total)",
            contracts.len() - before,
            source.display(),
            contracts.len()
        );
    }
    Ok(())
}

fn export_vault(ctx: &mut VaultContext, dest: PathBuf, same_password: bool) -> VaultResult<()> {
    let session = ctx.open_session()?;

    let password = if same_password {
        password_or_prompt(ctx.supplied_password(), "Vault password: ")?
    } else {
        new_password_or_prompt(
            password_from_env(NEW_PASSWORD_ENV_VAR).as_ref(),
            ctx.settings.min_password_length,
        )?
    };

    session.save(&dest, &password)?;
    println!(
        "Exported {} contracts to {}",
        session.store().len()?,
        dest.display()
    );
    Ok(())
}

fn show_config(ctx: &VaultContext) {
    println!("Contract Vault Configuration");
    println!("============================");
    println!("Config directory: {}", ctx.paths.base_dir().display());
    println!("Settings file:    {}", ctx.paths.settings_file().display());
    println!("Vault file:       {}", ctx.vault_path.display());
    println!();
    println!("Settings:");
    match ctx.settings.kdf_timeout() {
        Some(timeout) => println!("  Key derivation timeout: {}s", timeout.as_secs()),
        None => println!("  Key derivation timeout: none"),
    }
    println!(
        "  Minimum password length: {}",
        ctx.settings.min_password_length
    );
}
