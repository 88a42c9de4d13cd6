use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{DebtAccount, FinancialAmount};

/// Hard bound on simulated months (100 years).
pub const MAX_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Smallest balance first.
    Snowball,
    /// Highest APR first.
    Avalanche,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snowball => "snowball",
            Self::Avalanche => "avalanche",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "snowball" | "snow" => Some(Self::Snowball),
            "avalanche" | "aval" => Some(Self::Avalanche),
            _ => None,
        }
    }

    pub fn all() -> &'static [Strategy] {
        &[Self::Snowball, Self::Avalanche]
    }

    /// Priority order for surplus allocation. Used with a stable sort, so
    /// ties keep the caller's input order.
    fn comparator(self) -> fn(&Line, &Line) -> Ordering {
        match self {
            Self::Snowball => smallest_balance_first,
            Self::Avalanche => highest_apr_first,
        }
    }
}

fn smallest_balance_first(a: &Line, b: &Line) -> Ordering {
    a.balance.cmp(&b.balance)
}

fn highest_apr_first(a: &Line, b: &Line) -> Ordering {
    b.apr.cmp(&a.apr)
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoffError {
    #[error("Monthly budget ({budget}) is below total minimums ({minimums}). Increase budget or adjust mins.")]
    BudgetBelowMinimums { budget: Decimal, minimums: Decimal },

    #[error("Monthly budget ({budget}) does not exceed monthly interest ({interest}); balances would never be paid off")]
    InterestExceedsBudget { budget: Decimal, interest: Decimal },

    #[error("Debts are not paid off after {months} months ({remaining} still owed)")]
    NonConvergent { months: u32, remaining: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoffSnapshot {
    pub month: u32,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtPayoff {
    pub debt_id: String,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoffReport {
    pub strategy: Strategy,
    pub months: u32,
    /// Rounded to cents once, after the last month.
    pub total_interest: Decimal,
    pub snapshots: Vec<PayoffSnapshot>,
    pub payoff_date: NaiveDate,
    /// Debt ids in the strategy's priority order at the start.
    pub order: Vec<String>,
    /// Debts in the order they cleared.
    pub payoffs: Vec<DebtPayoff>,
}

/// Working copy of one debt inside the simulation.
#[derive(Debug, Clone)]
struct Line {
    id: String,
    balance: Decimal,
    apr: Decimal,
    monthly_rate: Decimal,
    min_payment: Decimal,
    cleared_in: Option<u32>,
}

impl Line {
    fn from_debt(debt: &DebtAccount) -> Self {
        let apr = debt.apr.value();
        Self {
            id: debt.id.clone(),
            balance: debt.remaining_balance().value(),
            apr,
            monthly_rate: apr / Decimal::ONE_HUNDRED / Decimal::from(12),
            min_payment: debt.min_payment.value(),
            cleared_in: None,
        }
    }

    /// Anything at or under a cent counts as paid.
    fn is_outstanding(&self) -> bool {
        self.balance > cent()
    }

    fn interest(&self) -> Option<Decimal> {
        self.balance.checked_mul(self.monthly_rate)
    }

    fn pay(&mut self, cap: Decimal, budget: &mut Decimal) {
        let amount = cap.min(self.balance).min(*budget).max(Decimal::ZERO);
        self.balance -= amount;
        *budget -= amount;
    }
}

fn cent() -> Decimal {
    Decimal::new(1, 2)
}

/// Simulate paying `debts` down month by month with a fixed `monthly_budget`.
///
/// Each month interest accrues first, minimums are paid in input order, then
/// whatever budget remains goes to outstanding debts in strategy order. Debts
/// with nothing left to pay are ignored, including their minimums. `today`
/// anchors the projected payoff date.
pub fn simulate(
    debts: &[DebtAccount],
    monthly_budget: FinancialAmount,
    strategy: Strategy,
    today: NaiveDate,
) -> Result<PayoffReport, PayoffError> {
    let budget = monthly_budget.value();
    let mut lines: Vec<Line> = debts
        .iter()
        .filter(|d| !d.is_paid_off())
        .map(Line::from_debt)
        .collect();

    // Minimums past the decimal range exceed any budget.
    let minimums = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.min_payment))
        .unwrap_or(Decimal::MAX);
    if budget < minimums {
        warn!(%budget, %minimums, "payoff budget below total minimums");
        return Err(PayoffError::BudgetBelowMinimums { budget, minimums });
    }

    let comparator = strategy.comparator();
    let mut ranked: Vec<&Line> = lines.iter().filter(|l| l.is_outstanding()).collect();
    if ranked.is_empty() {
        return Ok(PayoffReport {
            strategy,
            months: 0,
            total_interest: Decimal::ZERO,
            snapshots: Vec::new(),
            payoff_date: today,
            order: Vec::new(),
            payoffs: Vec::new(),
        });
    }
    ranked.sort_by(|a, b| comparator(a, b));
    let order: Vec<String> = ranked.iter().map(|l| l.id.clone()).collect();

    let opening_interest = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.interest()?));
    let Some(opening_interest) = opening_interest else {
        return Err(non_convergent(0, &lines));
    };
    if budget <= opening_interest {
        warn!(%budget, interest = %opening_interest, "payoff budget does not cover interest");
        return Err(PayoffError::InterestExceedsBudget {
            budget,
            interest: opening_interest,
        });
    }

    let mut month = 0;
    let mut total_interest = Decimal::ZERO;
    let mut snapshots = Vec::new();
    let mut payoffs = Vec::new();

    while lines.iter().any(Line::is_outstanding) && month < MAX_MONTHS {
        month += 1;

        let mut overflowed = false;
        for line in lines.iter_mut().filter(|l| l.balance > Decimal::ZERO) {
            let accrued = line.interest().and_then(|interest| {
                Some((
                    line.balance.checked_add(interest)?,
                    total_interest.checked_add(interest)?,
                ))
            });
            let Some((balance, total)) = accrued else {
                overflowed = true;
                break;
            };
            line.balance = balance;
            total_interest = total;
        }
        if overflowed {
            return Err(non_convergent(month, &lines));
        }

        let mut remaining = budget;
        for line in lines.iter_mut() {
            let minimum = line.min_payment;
            line.pay(minimum, &mut remaining);
        }

        let mut targets: Vec<usize> = (0..lines.len())
            .filter(|&i| lines[i].is_outstanding())
            .collect();
        targets.sort_by(|&a, &b| comparator(&lines[a], &lines[b]));
        for i in targets {
            if remaining <= Decimal::ZERO {
                break;
            }
            let line = &mut lines[i];
            let balance = line.balance;
            line.pay(balance, &mut remaining);
        }

        for line in lines.iter_mut() {
            if line.cleared_in.is_none() && !line.is_outstanding() {
                line.cleared_in = Some(month);
                payoffs.push(DebtPayoff {
                    debt_id: line.id.clone(),
                    month,
                });
            }
        }

        snapshots.push(PayoffSnapshot {
            month,
            total_balance: total_balance(&lines),
        });
    }

    if lines.iter().any(Line::is_outstanding) {
        return Err(non_convergent(month, &lines));
    }

    let total_interest =
        total_interest.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let payoff_date = today
        .checked_add_months(Months::new(month))
        .unwrap_or(NaiveDate::MAX);
    debug!(%strategy, months = month, %total_interest, "payoff simulated");

    Ok(PayoffReport {
        strategy,
        months: month,
        total_interest,
        snapshots,
        payoff_date,
        order,
        payoffs,
    })
}

fn total_balance(lines: &[Line]) -> Decimal {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.balance))
        .unwrap_or(Decimal::MAX)
}

fn non_convergent(months: u32, lines: &[Line]) -> PayoffError {
    let remaining = total_balance(lines);
    warn!(months, %remaining, "payoff simulation did not converge");
    PayoffError::NonConvergent { months, remaining }
}

#[cfg(test)]
#[path = "payoff_tests.rs"]
mod tests;
