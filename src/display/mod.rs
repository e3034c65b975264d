//! Display formatting for terminal output
//!
//! Provides utilities for formatting contracts for terminal display.

pub mod contract;

pub use contract::{format_contract_details, format_contract_list};
