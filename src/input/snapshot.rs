use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

use super::coerce::{amount_or_zero, amount_value, id_string, optional_amount, parse_date};
use crate::models::{
    Cadence, DebtAccount, EntryKind, HistoryEntry, Portfolio, RecurringRule, SavingsGoal,
};

// Raw shapes accept whatever the app has stored over the years; every numeric
// field is coerced rather than rejected. Keys the engine does not read land in
// `extra` and are written back untouched.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPortfolio {
    debts: Vec<RawDebt>,
    savings: Vec<RawSavings>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawDebt {
    id: Value,
    name: String,
    amount: Value,
    paid: Value,
    apr: Value,
    #[serde(alias = "min", alias = "min_payment")]
    min_payment: Value,
    recurring: Option<Value>,
    payments: Vec<RawEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSavings {
    id: Value,
    name: String,
    target: Value,
    #[serde(alias = "amount")]
    balance: Value,
    recurring: Option<Value>,
    history: Vec<RawEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRule {
    amount: Value,
    #[serde(alias = "cadence")]
    freq: Option<String>,
    start_date: Option<String>,
    enabled: Option<bool>,
    last_applied: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    amount: Value,
    date: Option<String>,
    note: Option<String>,
    kind: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawRule {
    fn into_rule(self) -> Option<RecurringRule> {
        let cadence = self.freq.as_deref().and_then(Cadence::parse)?;
        let start = self.start_date.as_deref().and_then(parse_date)?;
        let amount = amount_value(&self.amount)?;
        let mut rule = RecurringRule::new(amount, cadence, start)
            .with_cursor(self.last_applied.as_deref().and_then(parse_date))
            .with_extra(self.extra);
        rule.enabled = self.enabled.unwrap_or(false);
        Some(rule)
    }
}

/// Rules without a readable cadence, start date or amount never run. They
/// are parked in the account's `extra` under `recurring` so saving writes
/// them back as they were.
fn take_rule(
    raw: Option<Value>,
    owner: &str,
    extra: &mut Map<String, Value>,
) -> Option<RecurringRule> {
    let value = raw?;
    let typed = serde_json::from_value::<RawRule>(value.clone())
        .ok()
        .and_then(RawRule::into_rule);
    if typed.is_none() {
        warn!(account = owner, "keeping unreadable recurring rule as stored");
        extra.insert("recurring".into(), value);
    }
    typed
}

impl RawEntry {
    fn into_entry(self) -> Option<HistoryEntry> {
        let date = self.date.as_deref().and_then(parse_date)?;
        let note = self.note.unwrap_or_default();
        let kind = match self.kind.as_deref() {
            Some(kind) => EntryKind::parse(kind),
            None => EntryKind::parse(&note),
        };
        Some(HistoryEntry {
            amount: amount_or_zero(&self.amount),
            date,
            note,
            kind,
            extra: self.extra,
        })
    }
}

fn entries(raw: Vec<RawEntry>) -> Vec<HistoryEntry> {
    raw.into_iter().filter_map(RawEntry::into_entry).collect()
}

fn debt_from_raw(raw: RawDebt, index: usize) -> DebtAccount {
    let id = id_string(&raw.id).unwrap_or_else(|| format!("debt-{}", index + 1));
    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name.trim().to_string()
    };
    let mut extra = raw.extra;
    let recurring = take_rule(raw.recurring, &name, &mut extra);
    let debt = DebtAccount::new(
        id,
        name,
        amount_or_zero(&raw.amount),
        amount_or_zero(&raw.apr),
        amount_or_zero(&raw.min_payment),
    )
    .with_paid(amount_or_zero(&raw.paid))
    .with_payments(entries(raw.payments))
    .with_extra(extra);
    match recurring {
        Some(rule) => debt.with_recurring(rule),
        None => debt,
    }
}

fn savings_from_raw(raw: RawSavings, index: usize) -> SavingsGoal {
    let id = id_string(&raw.id).unwrap_or_else(|| format!("savings-{}", index + 1));
    let name = if raw.name.trim().is_empty() {
        id.clone()
    } else {
        raw.name.trim().to_string()
    };
    let mut extra = raw.extra;
    let recurring = take_rule(raw.recurring, &name, &mut extra);
    let goal = SavingsGoal::new(id, name, optional_amount(&raw.target))
        .with_balance(amount_or_zero(&raw.balance))
        .with_history(entries(raw.history))
        .with_extra(extra);
    match recurring {
        Some(rule) => goal.with_recurring(rule),
        None => goal,
    }
}

/// Build a typed portfolio from the app's JSON state.
pub fn from_json(json: &str) -> Result<Portfolio> {
    let raw: RawPortfolio = serde_json::from_str(json).context("Failed to parse state JSON")?;
    let debts = raw
        .debts
        .into_iter()
        .enumerate()
        .map(|(i, d)| debt_from_raw(d, i))
        .collect();
    let savings = raw
        .savings
        .into_iter()
        .enumerate()
        .map(|(i, s)| savings_from_raw(s, i))
        .collect();
    Ok(Portfolio::new(debts, savings).with_extra(raw.extra))
}

pub fn to_json(portfolio: &Portfolio) -> Result<String> {
    serde_json::to_string_pretty(portfolio).context("Failed to serialize state")
}

/// A missing state file is an empty portfolio.
pub fn load(path: &Path) -> Result<Portfolio> {
    if !path.exists() {
        info!(path = %path.display(), "no state file yet, starting empty");
        return Ok(Portfolio::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    from_json(&json).with_context(|| format!("Invalid state file: {}", path.display()))
}

pub fn save(path: &Path, portfolio: &Portfolio) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    }
    std::fs::write(path, to_json(portfolio)?)
        .with_context(|| format!("Failed to write state file: {}", path.display()))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
