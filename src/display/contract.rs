//! Contract display formatting
//!
//! Formats contracts for terminal output in table and detail views.

use crate::models::Contract;

/// Format a list of contracts as a table
pub fn format_contract_list(contracts: &[Contract]) -> String {
    if contracts.is_empty() {
        return "No contracts found.".to_string();
    }

    // Calculate column widths
    let name_width = contracts
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let category_width = contracts
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    // Build header
    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<name_width$}  {:<category_width$}  {:>10}  {:>5}  {:>12}\n",
        "ID",
        "Name",
        "Category",
        "Amount",
        "Cycle",
        "Per Year",
        name_width = name_width,
        category_width = category_width,
    ));

    // Separator line
    output.push_str(&format!(
        "{:->4}  {:-<name_width$}  {:-<category_width$}  {:->10}  {:->5}  {:->12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for contract in contracts {
        output.push_str(&format!(
            "{:>4}  {:<name_width$}  {:<category_width$}  {:>10.2}  {:>5}  {:>12.2}\n",
            contract.id.to_string(),
            contract.name,
            contract.category,
            contract.expenses,
            contract.cycle,
            contract.yearly_cost(),
            name_width = name_width,
            category_width = category_width,
        ));
    }

    let total: f64 = contracts.iter().map(Contract::yearly_cost).sum();
    output.push_str(&format!(
        "\n{} contracts, {:.2} per year\n",
        contracts.len(),
        total
    ));

    output
}

/// Format a single contract's details
pub fn format_contract_details(contract: &Contract) -> String {
    let mut output = String::new();

    output.push_str(&format!("Contract: {}\n", contract.name));
    output.push_str(&format!("  ID:              {}\n", contract.id));
    output.push_str(&format!("  Category:        {}\n", contract.category));
    output.push_str(&format!("  Amount:          {:.2}\n", contract.expenses));
    output.push_str(&format!("  Payments/Year:   {}\n", contract.cycle));
    output.push_str(&format!("  Per Year:        {:.2}\n", contract.yearly_cost()));
    output.push('\n');
    output.push_str(&format!("  Customer No.:    {}\n", contract.customer_nr));
    output.push_str(&format!("  Contract No.:    {}\n", contract.contract_nr));
    output.push_str(&format!("  Start Date:      {}\n", contract.start_date));
    output.push_str(&format!(
        "  Period:          {} months\n",
        contract.contract_period
    ));
    output.push_str(&format!(
        "  Notice:          {} weeks\n",
        contract.period_of_notice
    ));

    if !contract.document_path.is_empty() {
        output.push_str(&format!("  Document:        {}\n", contract.document_path));
    }

    if !contract.description.is_empty() {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", contract.description));
    }

    output
}
