use rust_decimal::{Decimal, RoundingStrategy};

/// Dollars with thousands separators, rounded half-up to cents.
/// `1234567.891` → `"$1,234,567.89"`, `-42.5` → `"-$42.50"`.
///
/// Takes a `FinancialAmount` or a signed `Decimal` such as a net worth.
pub(crate) fn format_amount(amount: impl Into<Decimal>) -> String {
    let value = amount
        .into()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", value.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{cents}")
}

/// Cut `s` to at most `max` characters, the last one becoming "…".
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    let Some(keep) = max.checked_sub(1) else {
        return String::new();
    };
    let cut = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
    format!("{}…", &s[..cut])
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
