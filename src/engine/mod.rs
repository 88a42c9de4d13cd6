//! The projection engine: recurrence catch-up and debt payoff simulation.
//!
//! Everything here is pure. Callers pass in the state and "today" and get new
//! state or a report back.

mod cadence;
mod compare;
mod payoff;
mod recurrence;
mod upcoming;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AccountKind, FinancialAmount, Portfolio};

pub use cadence::Occurrences;
pub use compare::{compare, Comparison};
pub use payoff::{
    simulate, DebtPayoff, PayoffError, PayoffReport, PayoffSnapshot, Strategy, MAX_MONTHS,
};
pub use recurrence::{apply_due, CatchUp, Occurrence, Recurring};
pub use upcoming::{due_between, next_due, upcoming, Reminder};

/// One occurrence posted during a portfolio-wide catch-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posted {
    pub kind: AccountKind,
    pub account_id: String,
    pub account_name: String,
    pub date: NaiveDate,
    pub amount: FinancialAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioCatchUp {
    pub portfolio: Portfolio,
    pub posted: Vec<Posted>,
}

/// Run the scheduler over every account. Savings first, then debts, each in
/// the portfolio's order.
pub fn catch_up(portfolio: &Portfolio, now: NaiveDate) -> PortfolioCatchUp {
    let mut posted = Vec::new();

    let savings = portfolio
        .savings
        .iter()
        .map(|goal| {
            let result = apply_due(goal, now);
            posted.extend(result.occurrences.iter().map(|o| Posted {
                kind: AccountKind::Savings,
                account_id: goal.id.clone(),
                account_name: goal.name.clone(),
                date: o.date,
                amount: o.amount,
            }));
            result.account
        })
        .collect();

    let debts = portfolio
        .debts
        .iter()
        .map(|debt| {
            let result = apply_due(debt, now);
            posted.extend(result.occurrences.iter().map(|o| Posted {
                kind: AccountKind::Debt,
                account_id: debt.id.clone(),
                account_name: debt.name.clone(),
                date: o.date,
                amount: o.amount,
            }));
            result.account
        })
        .collect();

    if !posted.is_empty() {
        tracing::info!(count = posted.len(), %now, "caught up recurring postings");
    }

    PortfolioCatchUp {
        portfolio: portfolio.with_accounts(debts, savings),
        posted,
    }
}
