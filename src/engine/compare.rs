use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::payoff::{simulate, PayoffError, PayoffReport, Strategy};
use crate::models::{DebtAccount, FinancialAmount};

/// Both strategies run over the same debts and budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub snowball: Result<PayoffReport, PayoffError>,
    pub avalanche: Result<PayoffReport, PayoffError>,
}

impl Comparison {
    pub fn get(&self, strategy: Strategy) -> &Result<PayoffReport, PayoffError> {
        match strategy {
            Strategy::Snowball => &self.snowball,
            Strategy::Avalanche => &self.avalanche,
        }
    }

    /// Interest avalanche saves over snowball. `None` unless both finished.
    pub fn interest_saved(&self) -> Option<Decimal> {
        let snowball = self.snowball.as_ref().ok()?;
        let avalanche = self.avalanche.as_ref().ok()?;
        Some(snowball.total_interest - avalanche.total_interest)
    }

    /// Months avalanche saves over snowball (negative if it takes longer).
    pub fn months_saved(&self) -> Option<i64> {
        let snowball = self.snowball.as_ref().ok()?;
        let avalanche = self.avalanche.as_ref().ok()?;
        Some(i64::from(snowball.months) - i64::from(avalanche.months))
    }
}

/// Each run works on its own copy of the balances; `debts` is only read.
pub fn compare(
    debts: &[DebtAccount],
    monthly_budget: FinancialAmount,
    today: NaiveDate,
) -> Comparison {
    Comparison {
        snowball: simulate(debts, monthly_budget, Strategy::Snowball, today),
        avalanche: simulate(debts, monthly_budget, Strategy::Avalanche, today),
    }
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
