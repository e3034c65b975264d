use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contract_vault::cli::{
    handle_contract_command, handle_vault_command, ContractCommands, VaultCommands, VaultContext,
    PASSWORD_ENV_VAR,
};
use contract_vault::config::{Settings, VaultPaths};
use contract_vault::crypto::SecureString;

#[derive(Parser)]
#[command(
    name = "contracts",
    version,
    about = "Keep track of your contracts in an encrypted file",
    long_about = "contracts stores insurance policies, subscriptions and other recurring \
                  contracts in a single file encrypted with AES-256-GCM. The key is \
                  derived from your password; there is no way to recover a lost one."
)]
struct Cli {
    /// Vault file to use (defaults to the last one opened)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Vault password (prompted for when not set)
    #[arg(
        long,
        global = true,
        env = PASSWORD_ENV_VAR,
        hide_env_values = true,
        hide = true
    )]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Contract(ContractCommands),

    #[command(flatten)]
    Vault(VaultCommands),
}

fn main() -> Result<()> {
    // RUST_LOG=contract_vault=debug for verbose output; secrets are never logged
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("contract_vault=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = VaultPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let password = cli
        .password
        .filter(|p| !p.is_empty())
        .map(SecureString::from);
    let mut ctx = VaultContext::new(paths, settings, cli.file.as_deref(), password)?;

    match cli.command {
        Some(Commands::Contract(cmd)) => handle_contract_command(&mut ctx, cmd)?,
        Some(Commands::Vault(cmd)) => handle_vault_command(&mut ctx, cmd)?,
        None => {
            println!("contracts - encrypted contract manager");
            println!();
            println!("Run 'contracts --help' for usage information.");
            println!("Run 'contracts init' to create a new vault.");
        }
    }

    Ok(())
}
