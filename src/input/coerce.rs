use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::models::FinancialAmount;

fn separators() -> Option<&'static Regex> {
    static SEPARATORS: OnceLock<Option<Regex>> = OnceLock::new();
    SEPARATORS
        .get_or_init(|| Regex::new(r"[$, ]+").ok())
        .as_ref()
}

/// Parse a user-entered amount like `"$1,234.567"` into cents precision.
/// Returns `None` for anything that is not a non-negative number.
pub fn parse_amount(raw: &str) -> Option<FinancialAmount> {
    let trimmed = raw.trim();
    let cleaned = match separators() {
        Some(re) => re.replace_all(trimmed, ""),
        None => Cow::Borrowed(trimmed),
    };
    if cleaned.is_empty() {
        return None;
    }
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    FinancialAmount::new(rounded).ok()
}

/// A stored number or numeric string, zero included. `None` for anything
/// missing, non-numeric or negative.
pub fn amount_value(value: &Value) -> Option<FinancialAmount> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// Permissive amount coercion: missing, non-numeric and negative values all
/// become zero.
pub fn amount_or_zero(value: &Value) -> FinancialAmount {
    amount_value(value).unwrap_or(FinancialAmount::ZERO)
}

/// Like [`amount_or_zero`] but keeps "absent" distinct from zero.
pub fn optional_amount(value: &Value) -> Option<FinancialAmount> {
    amount_value(value).filter(|amount| !amount.is_zero())
}

/// Accepts `YYYY-MM-DD` or a full ISO timestamp, keeping only the date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Ids may arrive as strings or numbers.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "coerce_tests.rs"]
mod tests;
