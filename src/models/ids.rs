//! Contract identifier
//!
//! Contracts are numbered with small positive integers that users type on
//! the command line. `0` means "not assigned yet" and never names a stored
//! contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a contract within one store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContractId(u32);

impl ContractId {
    /// The placeholder for contracts that have not been stored yet
    pub const UNASSIGNED: ContractId = ContractId(0);

    /// Wrap a raw identifier
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw integer value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Whether this is a real (positive) identifier
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ContractId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ContractId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        Ok(Self(s.parse()?))
    }
}
