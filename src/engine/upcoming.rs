use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{AccountKind, FinancialAmount, Portfolio, RecurringRule};

/// First occurrence on or after `from`. `None` for inactive rules.
pub fn next_due(rule: &RecurringRule, from: NaiveDate) -> Option<NaiveDate> {
    if !rule.is_active() {
        return None;
    }
    rule.cadence
        .occurrences(rule.start_date)
        .find(|date| *date >= from)
}

/// Every occurrence in `from..=to`.
pub fn due_between(rule: &RecurringRule, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    if !rule.is_active() {
        return Vec::new();
    }
    rule.cadence
        .occurrences(rule.start_date)
        .skip_while(|date| *date < from)
        .take_while(|date| *date <= to)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub kind: AccountKind,
    pub account_name: String,
    pub amount: FinancialAmount,
    pub date: NaiveDate,
}

/// The next scheduled posting of every active rule falling within
/// `horizon_days` of `today`, soonest first. Debts come before savings on
/// the same day. Occurrences already posted are not announced again.
pub fn upcoming(portfolio: &Portfolio, today: NaiveDate, horizon_days: u32) -> Vec<Reminder> {
    let until = today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    let debts = portfolio
        .debts
        .iter()
        .filter(|d| !d.is_paid_off())
        .filter_map(|d| Some((AccountKind::Debt, d.name.as_str(), d.recurring.as_ref()?)));
    let savings = portfolio
        .savings
        .iter()
        .filter_map(|s| Some((AccountKind::Savings, s.name.as_str(), s.recurring.as_ref()?)));

    let mut reminders: Vec<Reminder> = debts
        .chain(savings)
        .filter_map(|(kind, name, rule)| {
            let from = rule
                .last_applied()
                .and_then(|last| last.succ_opt())
                .map_or(today, |next| next.max(today));
            let date = next_due(rule, from).filter(|date| *date <= until)?;
            Some(Reminder {
                kind,
                account_name: name.to_string(),
                amount: rule.amount,
                date,
            })
        })
        .collect();
    reminders.sort_by_key(|r| r.date);
    reminders
}

#[cfg(test)]
#[path = "upcoming_tests.rs"]
mod tests;
