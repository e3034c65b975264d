//! Core data models for contract-vault

pub mod contract;
pub mod ids;

pub use contract::{Contract, ContractDraft, ContractField, ContractValidationError};
pub use ids::ContractId;
