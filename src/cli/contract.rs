//! Contract CLI commands
//!
//! Implements listing, viewing and editing the contracts of a vault.

use clap::Subcommand;

use crate::display::{format_contract_details, format_contract_list};
use crate::error::{VaultError, VaultResult};
use crate::models::{ContractDraft, ContractField, ContractId};
use crate::services::VaultSession;

use super::context::VaultContext;

/// Contract subcommands
#[derive(Subcommand)]
pub enum ContractCommands {
    /// List all contracts
    List,
    /// Show contract details
    Show {
        /// Contract ID
        id: ContractId,
    },
    /// Add a new contract
    Add {
        /// Contract name
        #[arg(short, long)]
        name: String,
        /// Category (e.g., "insurance", "utilities")
        #[arg(short, long)]
        category: String,
        /// Amount due per payment
        #[arg(short, long)]
        expenses: f64,
        /// Payments per year
        #[arg(long, default_value = "12")]
        cycle: u32,
        /// Customer number
        #[arg(long, default_value = "")]
        customer_nr: String,
        /// Contract number
        #[arg(long, default_value = "")]
        contract_nr: String,
        /// Start date (free text)
        #[arg(long, default_value = "")]
        start_date: String,
        /// Minimum contract period
        #[arg(long, default_value = "0")]
        contract_period: u32,
        /// Period of notice
        #[arg(long, default_value = "0")]
        period_of_notice: u32,
        /// Notes
        #[arg(short, long, default_value = "")]
        description: String,
        /// Path to the contract document
        #[arg(long, default_value = "")]
        document_path: String,
    },
    /// Change one field of a contract
    Update {
        /// Contract ID
        id: ContractId,
        /// Field name (category, name, expenses, cycle, customerNr, contractNr,
        /// startDate, contractPeriod, periodOfNotice, description, documentPath)
        field: String,
        /// New value
        value: String,
    },
    /// Remove a contract
    #[command(alias = "rm")]
    Remove {
        /// Contract ID
        id: ContractId,
    },
}

impl ContractCommands {
    fn is_mutating(&self) -> bool {
        !matches!(self, Self::List | Self::Show { .. })
    }
}

/// Handle a contract command
pub fn handle_contract_command(ctx: &mut VaultContext, cmd: ContractCommands) -> VaultResult<()> {
    let session = ctx.open_session()?;
    let mutating = cmd.is_mutating();

    run_contract_command(&session, cmd)?;

    if mutating {
        session.prepare_shutdown(&ctx.vault_path)?;
    }
    Ok(())
}

fn run_contract_command(session: &VaultSession, cmd: ContractCommands) -> VaultResult<()> {
    let store = session.store();

    match cmd {
        ContractCommands::List => {
            let contracts = store.all()?;
            print!("{}", format_contract_list(&contracts));
            if contracts.is_empty() {
                println!();
            }
        }
        ContractCommands::Show { id } => {
            let contract = store
                .get(id)?
                .ok_or_else(|| VaultError::contract_not_found(id))?;
            print!("{}", format_contract_details(&contract));
        }
        ContractCommands::Add {
            name,
            category,
            expenses,
            cycle,
            customer_nr,
            contract_nr,
            start_date,
            contract_period,
            period_of_notice,
            description,
            document_path,
        } => {
            let draft = ContractDraft {
                customer_nr,
                contract_nr,
                start_date,
                contract_period,
                period_of_notice,
                description,
                document_path,
                ..ContractDraft::new(category, name, expenses, cycle)
            };

            let contract = store.create(draft)?;
            println!("Added contract: {}", contract);
        }
        ContractCommands::Update { id, field, value } => {
            let contract = store.update(id, &field, &value).map_err(|e| match e {
                VaultError::InvalidField(name) => VaultError::InvalidField(format!(
                    "{} (expected one of: {})",
                    name,
                    field_names()
                )),
                other => other,
            })?;
            println!("Updated contract: {}", contract);
        }
        ContractCommands::Remove { id } => {
            let contract = store
                .get(id)?
                .ok_or_else(|| VaultError::contract_not_found(id))?;
            store.remove(id)?;
            println!("Removed contract: {}", contract);
        }
    }

    Ok(())
}

/// The field names `update` accepts, comma separated
pub fn field_names() -> String {
    ContractField::ALL
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::EnvelopeCipher;

    fn session() -> VaultSession {
        VaultSession::with_cipher(EnvelopeCipher::new())
    }

    fn add(name: &str) -> ContractCommands {
        add_with_cycle(name, 12)
    }

    fn add_with_cycle(name: &str, cycle: u32) -> ContractCommands {
        ContractCommands::Add {
            name: name.into(),
            category: "insurance".into(),
            expenses: 10.0,
            cycle,
            customer_nr: String::new(),
            contract_nr: String::new(),
            start_date: String::new(),
            contract_period: 0,
            period_of_notice: 0,
            description: String::new(),
            document_path: String::new(),
        }
    }

    #[test]
    fn test_add_update_remove() {
        let session = session();

        run_contract_command(&session, add("Health")).unwrap();
        run_contract_command(&session, add("Liability")).unwrap();
        assert_eq!(session.store().len().unwrap(), 2);

        run_contract_command(
            &session,
            ContractCommands::Update {
                id: ContractId::new(2),
                field: "expenses".into(),
                value: "7.5".into(),
            },
        )
        .unwrap();
        let updated = session.store().get(ContractId::new(2)).unwrap().unwrap();
        assert_eq!(updated.expenses, 7.5);

        run_contract_command(&session, ContractCommands::Remove { id: ContractId::new(1) })
            .unwrap();
        assert_eq!(session.store().len().unwrap(), 1);

        // The freed id is reused
        run_contract_command(&session, add("Phone")).unwrap();
        let phone = session.store().get(ContractId::new(1)).unwrap().unwrap();
        assert_eq!(phone.name, "Phone");
    }

    #[test]
    fn test_missing_contract() {
        let session = session();
        let err = run_contract_command(&session, ContractCommands::Show { id: ContractId::new(9) })
            .unwrap_err();
        assert!(err.is_not_found());

        let err = run_contract_command(&session, ContractCommands::Remove { id: ContractId::new(9) })
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_rejects_zero_cycle() {
        let session = session();
        let cmd = add_with_cycle("Broken", 0);

        let err = run_contract_command(&session, cmd).unwrap_err();
        assert!(err.is_validation());
        assert!(session.store().is_empty().unwrap());
    }

    #[test]
    fn test_unknown_field_lists_valid_names() {
        let session = session();
        run_contract_command(&session, add("Health")).unwrap();

        let err = run_contract_command(
            &session,
            ContractCommands::Update {
                id: ContractId::new(1),
                field: "price".into(),
                value: "1".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, VaultError::InvalidField(_)));
        assert!(err.to_string().contains("documentPath"));
    }

    #[test]
    fn test_mutating_commands() {
        assert!(!ContractCommands::List.is_mutating());
        assert!(!ContractCommands::Show { id: ContractId::new(1) }.is_mutating());
        assert!(ContractCommands::Remove { id: ContractId::new(1) }.is_mutating());
        assert!(add("x").is_mutating());
    }

    #[test]
    fn test_field_names() {
        let names = field_names();
        assert!(names.starts_with("category, name, expenses"));
        assert!(names.contains("periodOfNotice"));
    }
}
