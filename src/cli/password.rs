//! Password input
//!
//! Passwords come from the environment when set, otherwise from a hidden
//! terminal prompt.

use crate::crypto::SecureString;
use crate::error::{VaultError, VaultResult};

/// Environment variable holding the vault password
pub const PASSWORD_ENV_VAR: &str = "CONTRACT_VAULT_PASSWORD";

/// Environment variable holding the password of an imported vault
pub const SOURCE_PASSWORD_ENV_VAR: &str = "CONTRACT_VAULT_SOURCE_PASSWORD";

/// Environment variable holding the password for an exported vault
pub const NEW_PASSWORD_ENV_VAR: &str = "CONTRACT_VAULT_NEW_PASSWORD";

/// Use `supplied` if present, otherwise ask once
pub fn password_or_prompt(supplied: Option<&SecureString>, prompt: &str) -> VaultResult<SecureString> {
    match supplied {
        Some(password) => Ok(password.clone()),
        None => prompt_password(prompt),
    }
}

/// Read a password from the environment variable `var`, if set and non-empty
pub fn password_from_env(var: &str) -> Option<SecureString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecureString::from)
}

/// Check a password chosen for a new vault
pub fn check_new_password(password: &str, min_length: usize) -> VaultResult<()> {
    if password.chars().count() < min_length {
        return Err(VaultError::Validation(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }
    Ok(())
}

/// Use `supplied` for a new vault if present, otherwise ask twice
pub fn new_password_or_prompt(
    supplied: Option<&SecureString>,
    min_length: usize,
) -> VaultResult<SecureString> {
    match supplied {
        Some(password) => {
            check_new_password(password, min_length)?;
            Ok(password.clone())
        }
        None => prompt_new_password(min_length),
    }
}

/// Prompt until a long enough password is entered identically twice
pub fn prompt_new_password(min_length: usize) -> VaultResult<SecureString> {
    loop {
        let first = prompt_password("Enter new password: ")?;

        if let Err(e) = check_new_password(&first, min_length) {
            println!("{}. Please try again.", e);
            continue;
        }

        let second = prompt_password("Confirm password: ")?;

        if first != second {
            println!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

/// Prompt for a password (hidden input)
fn prompt_password(prompt: &str) -> VaultResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}
