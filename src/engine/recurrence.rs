use chrono::NaiveDate;
use tracing::debug;

use crate::models::{DebtAccount, FinancialAmount, HistoryEntry, RecurringRule, SavingsGoal};

/// An account that owns a recurring rule and can absorb its postings.
pub trait Recurring: Clone {
    fn label(&self) -> &str;

    fn rule(&self) -> Option<&RecurringRule>;

    fn rule_mut(&mut self) -> Option<&mut RecurringRule>;

    /// `false` once nothing more can be posted (a paid-off debt).
    fn accepts_postings(&self) -> bool;

    /// Post one occurrence and return the amount actually applied.
    fn post_occurrence(&mut self, amount: FinancialAmount, date: NaiveDate) -> FinancialAmount;
}

impl Recurring for DebtAccount {
    fn label(&self) -> &str {
        &self.name
    }

    fn rule(&self) -> Option<&RecurringRule> {
        self.recurring.as_ref()
    }

    fn rule_mut(&mut self) -> Option<&mut RecurringRule> {
        self.recurring.as_mut()
    }

    fn accepts_postings(&self) -> bool {
        !self.is_paid_off()
    }

    fn post_occurrence(&mut self, amount: FinancialAmount, date: NaiveDate) -> FinancialAmount {
        self.post(HistoryEntry::recurring(amount, date))
    }
}

impl Recurring for SavingsGoal {
    fn label(&self) -> &str {
        &self.name
    }

    fn rule(&self) -> Option<&RecurringRule> {
        self.recurring.as_ref()
    }

    fn rule_mut(&mut self) -> Option<&mut RecurringRule> {
        self.recurring.as_mut()
    }

    fn accepts_postings(&self) -> bool {
        true
    }

    fn post_occurrence(&mut self, amount: FinancialAmount, date: NaiveDate) -> FinancialAmount {
        self.post(HistoryEntry::recurring(amount, date))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub amount: FinancialAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUp<T> {
    pub account: T,
    pub occurrences: Vec<Occurrence>,
}

/// Apply every occurrence of the account's rule that fell due on or before
/// `now` and has not been applied yet.
///
/// The input is left untouched; the returned account carries the new balance,
/// the appended history and the advanced `last_applied` cursor. Running it
/// again with the same `now` applies nothing.
pub fn apply_due<T: Recurring>(account: &T, now: NaiveDate) -> CatchUp<T> {
    let mut updated = account.clone();
    let mut occurrences = Vec::new();

    let Some(rule) = account.rule().filter(|r| r.is_active()) else {
        return CatchUp {
            account: updated,
            occurrences,
        };
    };

    let cursor = rule.last_applied();
    let pending = rule
        .cadence
        .occurrences(rule.start_date)
        .skip_while(|date| cursor.is_some_and(|last| *date <= last))
        .take_while(|date| *date <= now);

    for date in pending {
        if !updated.accepts_postings() {
            break;
        }
        let amount = updated.post_occurrence(rule.amount, date);
        if let Some(r) = updated.rule_mut() {
            r.set_last_applied(date);
        }
        debug!(account = account.label(), %date, %amount, "applied recurring occurrence");
        occurrences.push(Occurrence { date, amount });
    }

    CatchUp {
        account: updated,
        occurrences,
    }
}

#[cfg(test)]
#[path = "recurrence_tests.rs"]
mod tests;
