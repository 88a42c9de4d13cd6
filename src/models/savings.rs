use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{FinancialAmount, HistoryEntry, RecurringRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    #[serde(rename = "target")]
    pub target_amount: Option<FinancialAmount>,
    balance: FinancialAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringRule>,
    history: Vec<HistoryEntry>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SavingsGoal {
    pub fn new(id: String, name: String, target_amount: Option<FinancialAmount>) -> Self {
        Self {
            id,
            name,
            target_amount,
            balance: FinancialAmount::ZERO,
            recurring: None,
            history: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_recurring(mut self, rule: RecurringRule) -> Self {
        self.extra.remove("recurring");
        self.recurring = Some(rule);
        self
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn with_balance(mut self, balance: FinancialAmount) -> Self {
        self.balance = balance;
        self
    }

    pub(crate) fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn balance(&self) -> FinancialAmount {
        self.balance
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Contributions are not capped by the target.
    pub fn contribute(
        &mut self,
        amount: FinancialAmount,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> FinancialAmount {
        self.post(HistoryEntry::manual(amount, date, note))
    }

    pub(crate) fn post(&mut self, entry: HistoryEntry) -> FinancialAmount {
        let applied = entry.amount;
        self.balance = self.balance + applied;
        self.history.push(entry);
        applied
    }

    pub fn remaining_to_target(&self) -> Option<FinancialAmount> {
        self.target_amount
            .map(|target| target.saturating_sub(self.balance))
    }

    /// Fraction of the target reached, capped at 1. `None` without a target.
    pub fn progress(&self) -> Option<Decimal> {
        let target = self.target_amount.filter(|t| !t.is_zero())?;
        Some((self.balance.value() / target.value()).min(Decimal::ONE))
    }
}
