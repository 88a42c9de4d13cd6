mod amount;
mod debt;
mod history;
mod portfolio;
mod rule;
mod savings;

pub use amount::{AmountError, FinancialAmount};
pub use debt::DebtAccount;
pub use history::{EntryKind, HistoryEntry, RECURRING_NOTE};
pub use portfolio::{AccountKind, Portfolio};
pub use rule::{Cadence, RecurringRule};
pub use savings::SavingsGoal;
