use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};

use super::FinancialAmount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Biweekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Some(Self::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Some(Self::Biweekly),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn all() -> &'static [Cadence] {
        &[Self::Weekly, Self::Biweekly, Self::Monthly]
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An automatic payment or contribution attached to an account.
///
/// `last_applied` is the scheduler's cursor. It is only ever moved by the
/// engine, and once set it is always one of the rule's own occurrence dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRule {
    pub amount: FinancialAmount,
    #[serde(rename = "freq")]
    pub cadence: Cadence,
    pub start_date: NaiveDate,
    pub enabled: bool,
    last_applied: Option<NaiveDate>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RecurringRule {
    pub fn new(amount: FinancialAmount, cadence: Cadence, start_date: NaiveDate) -> Self {
        Self {
            amount,
            cadence,
            start_date,
            enabled: true,
            last_applied: None,
            extra: Map::new(),
        }
    }

    pub fn last_applied(&self) -> Option<NaiveDate> {
        self.last_applied
    }

    /// Disabled and zero-amount rules never post anything.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.amount.is_zero()
    }

    pub(crate) fn set_last_applied(&mut self, date: NaiveDate) {
        self.last_applied = Some(date);
    }

    pub(crate) fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Restores a persisted cursor, snapping it onto the schedule. A cursor
    /// before `start_date` is dropped.
    ///
    /// Weekly cursors snap down to the last occurrence on or before them.
    /// Monthly cursors written by chained stepping drift after a clamp
    /// (Jan 31, Feb 29, Mar 29), so they map to the occurrence in their own
    /// calendar month: that month has been paid.
    pub(crate) fn with_cursor(mut self, cursor: Option<NaiveDate>) -> Self {
        let start = self.start_date;
        self.last_applied = cursor
            .filter(|date| *date >= start)
            .and_then(|date| {
                let schedule = self.cadence.occurrences(start);
                match self.cadence {
                    Cadence::Monthly => schedule
                        .take_while(|d| (d.year(), d.month()) <= (date.year(), date.month()))
                        .last(),
                    Cadence::Weekly | Cadence::Biweekly => {
                        schedule.take_while(|d| *d <= date).last()
                    }
                }
            });
        self
    }
}
