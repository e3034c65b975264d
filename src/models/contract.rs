//! Contract model
//!
//! A contract is one entry of the vault: an insurance policy, a phone plan,
//! a subscription. Only `id` carries meaning for the store; the remaining
//! fields are user data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::ContractId;

/// A stored contract
///
/// Serialized field names are camelCase (`customerNr`, `startDate`, ...)
/// and form the plaintext format of the vault file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Identifier, unique within a store. Missing in imported data means unassigned.
    #[serde(default)]
    pub id: ContractId,

    /// Category label, e.g. "insurance"
    pub category: String,

    /// Display name
    pub name: String,

    /// Amount paid per payment
    pub expenses: f64,

    /// Payments per year (1, 2, 4, 12, ...)
    pub cycle: u32,

    pub customer_nr: String,

    pub contract_nr: String,

    /// Start of the contract, "YYYY-MM-DD"
    pub start_date: String,

    /// Length of one contractual period in months
    pub contract_period: u32,

    /// Period of notice in weeks
    pub period_of_notice: u32,

    #[serde(default)]
    pub description: String,

    /// Where the signed document is filed
    #[serde(default)]
    pub document_path: String,
}

/// The user-supplied part of a contract, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContractDraft {
    pub category: String,
    pub name: String,
    pub expenses: f64,
    pub cycle: u32,
    pub customer_nr: String,
    pub contract_nr: String,
    pub start_date: String,
    pub contract_period: u32,
    pub period_of_notice: u32,
    pub description: String,
    pub document_path: String,
}

impl ContractDraft {
    /// Start a draft with the fields every contract needs
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        expenses: f64,
        cycle: u32,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            expenses,
            cycle,
            ..Default::default()
        }
    }

    /// Turn the draft into a contract with the given id
    pub fn into_contract(self, id: ContractId) -> Contract {
        Contract {
            id,
            category: self.category,
            name: self.name,
            expenses: self.expenses,
            cycle: self.cycle,
            customer_nr: self.customer_nr,
            contract_nr: self.contract_nr,
            start_date: self.start_date,
            contract_period: self.contract_period,
            period_of_notice: self.period_of_notice,
            description: self.description,
            document_path: self.document_path,
        }
    }
}

impl Contract {
    /// Annual cost, expenses times payments per year
    pub fn yearly_cost(&self) -> f64 {
        self.expenses * f64::from(self.cycle)
    }

    /// Validate the contract
    pub fn validate(&self) -> Result<(), ContractValidationError> {
        if self.cycle < 1 {
            return Err(ContractValidationError::ZeroCycle);
        }

        if !self.expenses.is_finite() {
            return Err(ContractValidationError::NonFiniteExpenses);
        }

        Ok(())
    }

    /// Set one field from its textual value
    ///
    /// Leaves `self` untouched when the value does not parse.
    pub fn set_field(
        &mut self,
        field: ContractField,
        value: &str,
    ) -> Result<(), ContractValidationError> {
        match field {
            ContractField::Category => self.category = value.to_string(),
            ContractField::Name => self.name = value.to_string(),
            ContractField::Expenses => self.expenses = parse_number(field, value)?,
            ContractField::Cycle => self.cycle = parse_number(field, value)?,
            ContractField::CustomerNr => self.customer_nr = value.to_string(),
            ContractField::ContractNr => self.contract_nr = value.to_string(),
            ContractField::StartDate => self.start_date = value.to_string(),
            ContractField::ContractPeriod => self.contract_period = parse_number(field, value)?,
            ContractField::PeriodOfNotice => self.period_of_notice = parse_number(field, value)?,
            ContractField::Description => self.description = value.to_string(),
            ContractField::DocumentPath => self.document_path = value.to_string(),
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(field: ContractField, value: &str) -> Result<T, ContractValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ContractValidationError::BadValue {
            field,
            value: value.to_string(),
        })
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.name, self.category)
    }
}

/// The updatable fields of a contract, by serialized name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractField {
    Category,
    Name,
    Expenses,
    Cycle,
    CustomerNr,
    ContractNr,
    StartDate,
    ContractPeriod,
    PeriodOfNotice,
    Description,
    DocumentPath,
}

impl ContractField {
    /// Every field, in serialization order
    pub const ALL: [ContractField; 11] = [
        Self::Category,
        Self::Name,
        Self::Expenses,
        Self::Cycle,
        Self::CustomerNr,
        Self::ContractNr,
        Self::StartDate,
        Self::ContractPeriod,
        Self::PeriodOfNotice,
        Self::Description,
        Self::DocumentPath,
    ];

    /// The name used in the vault file and in update requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Name => "name",
            Self::Expenses => "expenses",
            Self::Cycle => "cycle",
            Self::CustomerNr => "customerNr",
            Self::ContractNr => "contractNr",
            Self::StartDate => "startDate",
            Self::ContractPeriod => "contractPeriod",
            Self::PeriodOfNotice => "periodOfNotice",
            Self::Description => "description",
            Self::DocumentPath => "documentPath",
        }
    }
}

impl fmt::Display for ContractField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractField {
    type Err = ContractValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ContractValidationError::UnknownField(s.to_string()))
    }
}

/// Validation errors for contracts
#[derive(Debug, Clone, PartialEq)]
pub enum ContractValidationError {
    ZeroCycle,
    NonFiniteExpenses,
    UnknownField(String),
    BadValue { field: ContractField, value: String },
}

impl fmt::Display for ContractValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCycle => write!(f, "Payment cycle must be at least 1 per year"),
            Self::NonFiniteExpenses => write!(f, "Expenses must be a finite number"),
            Self::UnknownField(name) => write!(f, "Unknown contract field '{}'", name),
            Self::BadValue { field, value } => {
                write!(f, "Invalid value '{}' for field '{}'", value, field)
            }
        }
    }
}

impl std::error::Error for ContractValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn health_insurance() -> Contract {
        let mut draft = ContractDraft::new("insurance", "health", 100.0, 12);
        draft.customer_nr = "C-1".into();
        draft.contract_nr = "K-9".into();
        draft.start_date = "2024-01-01".into();
        draft.contract_period = 12;
        draft.period_of_notice = 4;
        draft.into_contract(ContractId::new(1))
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(health_insurance()).unwrap();
        let object = json.as_object().unwrap();

        for field in ContractField::ALL {
            assert!(object.contains_key(field.as_str()), "missing {}", field);
        }
        assert!(object.contains_key("id"));
        assert_eq!(object.len(), ContractField::ALL.len() + 1);
    }

    #[test]
    fn test_missing_id_deserializes_unassigned() {
        let json = r#"{"category":"phone","name":"mobile","expenses":9.99,"cycle":12,
            "customerNr":"","contractNr":"","startDate":"2023-05-01",
            "contractPeriod":24,"periodOfNotice":12}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();

        assert!(!contract.id.is_assigned());
        assert_eq!(contract.description, "");
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ContractField::ALL {
            assert_eq!(field.as_str().parse::<ContractField>().unwrap(), field);
        }
        assert!(matches!(
            "colour".parse::<ContractField>(),
            Err(ContractValidationError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_field() {
        let mut contract = health_insurance();

        contract.set_field(ContractField::Category, "x").unwrap();
        contract.set_field(ContractField::Expenses, "12.5").unwrap();
        contract.set_field(ContractField::PeriodOfNotice, " 6 ").unwrap();

        assert_eq!(contract.category, "x");
        assert_eq!(contract.expenses, 12.5);
        assert_eq!(contract.period_of_notice, 6);
    }

    #[test]
    fn test_set_field_bad_value_leaves_contract() {
        let mut contract = health_insurance();
        let before = contract.clone();

        let err = contract.set_field(ContractField::Cycle, "monthly").unwrap_err();

        assert!(matches!(err, ContractValidationError::BadValue { .. }));
        assert_eq!(contract, before);
    }

    #[test]
    fn test_validation() {
        let mut contract = health_insurance();
        assert!(contract.validate().is_ok());

        contract.cycle = 0;
        assert_eq!(contract.validate(), Err(ContractValidationError::ZeroCycle));

        contract.cycle = 1;
        contract.expenses = f64::NAN;
        assert_eq!(
            contract.validate(),
            Err(ContractValidationError::NonFiniteExpenses)
        );
    }

    #[test]
    fn test_yearly_cost() {
        assert_eq!(health_insurance().yearly_cost(), 1200.0);
    }
}
