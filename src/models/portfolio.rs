use serde::Serialize;
use serde_json::{Map, Value};

use super::{DebtAccount, FinancialAmount, SavingsGoal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccountKind {
    Debt,
    Savings,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debt => "Debt",
            Self::Savings => "Savings",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the engine reads: debts and savings goals in the user's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Portfolio {
    pub debts: Vec<DebtAccount>,
    pub savings: Vec<SavingsGoal>,
    /// Everything else in the state file (investments, settings, ...).
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Portfolio {
    pub fn new(debts: Vec<DebtAccount>, savings: Vec<SavingsGoal>) -> Self {
        Self {
            debts,
            savings,
            extra: Map::new(),
        }
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Same surrounding state, new accounts.
    pub(crate) fn with_accounts(&self, debts: Vec<DebtAccount>, savings: Vec<SavingsGoal>) -> Self {
        Self::new(debts, savings).with_extra(self.extra.clone())
    }

    /// Sum of remaining debt balances.
    pub fn liabilities(&self) -> FinancialAmount {
        self.debts.iter().map(DebtAccount::remaining_balance).sum()
    }

    pub fn savings_total(&self) -> FinancialAmount {
        self.savings.iter().map(SavingsGoal::balance).sum()
    }

    /// The outstanding debt with the highest APR. Earlier debts win ties.
    pub fn focus_suggestion(&self) -> Option<&DebtAccount> {
        self.debts
            .iter()
            .filter(|d| !d.is_paid_off())
            .fold(None, |best: Option<&DebtAccount>, d| match best {
                Some(b) if b.apr >= d.apr => Some(b),
                _ => Some(d),
            })
    }
}
