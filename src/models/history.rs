use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::FinancialAmount;

pub const RECURRING_NOTE: &str = "Recurring";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Manual,
    Recurring,
}

impl EntryKind {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("recurring") {
            Self::Recurring
        } else {
            Self::Manual
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub amount: FinancialAmount,
    pub date: NaiveDate,
    pub note: String,
    pub kind: EntryKind,
    /// Fields the host app stores on the entry (its `id`, for one).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryEntry {
    pub fn manual(amount: FinancialAmount, date: NaiveDate, note: impl Into<String>) -> Self {
        Self {
            amount,
            date,
            note: note.into(),
            kind: EntryKind::Manual,
            extra: Map::new(),
        }
    }

    /// Dated at the occurrence, not at the moment the catch-up ran.
    pub fn recurring(amount: FinancialAmount, date: NaiveDate) -> Self {
        Self {
            amount,
            date,
            note: RECURRING_NOTE.into(),
            kind: EntryKind::Recurring,
            extra: Map::new(),
        }
    }
}
