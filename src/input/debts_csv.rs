use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::coerce::parse_amount;
use crate::models::{DebtAccount, FinancialAmount};

#[derive(Debug, Deserialize)]
struct DebtRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, alias = "balance", alias = "principal")]
    amount: String,
    #[serde(default)]
    paid: String,
    #[serde(default)]
    apr: String,
    #[serde(default, alias = "minPayment", alias = "min")]
    min_payment: String,
}

fn lenient(raw: &str) -> FinancialAmount {
    parse_amount(raw).unwrap_or(FinancialAmount::ZERO)
}

/// Read debts from a CSV with a header row naming `name, amount, paid, apr,
/// min_payment` in any order. Blank rows are skipped; blank numbers are zero.
pub fn read_debts(path: &Path) -> Result<Vec<DebtAccount>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    parse_debts(file)
}

pub fn parse_debts<R: Read>(reader: R) -> Result<Vec<DebtAccount>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut debts = Vec::new();
    for (i, result) in rdr.deserialize::<DebtRow>().enumerate() {
        let row = result.with_context(|| format!("Row {}: failed to read debt", i + 1))?;
        if row.name.is_empty() && row.amount.is_empty() {
            continue;
        }
        let id = if row.id.is_empty() {
            format!("debt-{}", debts.len() + 1)
        } else {
            row.id
        };
        let name = if row.name.is_empty() { id.clone() } else { row.name };
        let debt = DebtAccount::new(
            id,
            name,
            lenient(&row.amount),
            lenient(&row.apr),
            lenient(&row.min_payment),
        )
        .with_paid(lenient(&row.paid));
        debts.push(debt);
    }
    Ok(debts)
}

#[cfg(test)]
#[path = "debts_csv_tests.rs"]
mod tests;
