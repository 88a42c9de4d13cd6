use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{FinancialAmount, HistoryEntry, RecurringRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtAccount {
    pub id: String,
    pub name: String,
    #[serde(rename = "amount")]
    pub principal: FinancialAmount,
    #[serde(rename = "paid")]
    paid_to_date: FinancialAmount,
    /// Annual percentage rate, e.g. `19.99`.
    pub apr: FinancialAmount,
    pub min_payment: FinancialAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringRule>,
    payments: Vec<HistoryEntry>,
    /// Host app fields the engine does not interpret, written back as read.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl DebtAccount {
    pub fn new(
        id: String,
        name: String,
        principal: FinancialAmount,
        apr: FinancialAmount,
        min_payment: FinancialAmount,
    ) -> Self {
        Self {
            id,
            name,
            principal,
            paid_to_date: FinancialAmount::ZERO,
            apr,
            min_payment,
            recurring: None,
            payments: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Replaces any rule kept verbatim in `extra` as well.
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

    /// Seeds the amount already paid, capped at the principal.
    pub(crate) fn with_paid(mut self, paid: FinancialAmount) -> Self {
        self.paid_to_date = paid.min(self.principal);
        self
    }

    pub(crate) fn with_payments(mut self, payments: Vec<HistoryEntry>) -> Self {
        self.payments = payments;
        self
    }

    pub fn paid_to_date(&self) -> FinancialAmount {
        self.paid_to_date
    }

    pub fn payments(&self) -> &[HistoryEntry] {
        &self.payments
    }

    pub fn remaining_balance(&self) -> FinancialAmount {
        self.principal.saturating_sub(self.paid_to_date)
    }

    pub fn is_paid_off(&self) -> bool {
        self.remaining_balance().is_zero()
    }

    /// Record a manual payment. Returns the amount actually applied, which
    /// never exceeds the remaining balance.
    pub fn record_payment(
        &mut self,
        amount: FinancialAmount,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> FinancialAmount {
        self.post(HistoryEntry::manual(amount, date, note))
    }

    pub(crate) fn post(&mut self, mut entry: HistoryEntry) -> FinancialAmount {
        let applied = entry.amount.min(self.remaining_balance());
        if applied.is_zero() {
            return applied;
        }
        entry.amount = applied;
        self.paid_to_date = self.paid_to_date + applied;
        self.payments.push(entry);
        applied
    }
}
