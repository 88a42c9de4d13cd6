use chrono::{Days, Months, NaiveDate};

use crate::models::Cadence;

impl Cadence {
    /// One period after `date`. Monthly steps keep the day of month and clamp
    /// to the last day of shorter months (Jan 31 -> Feb 28/29).
    ///
    /// Chaining `advance` drifts after a clamp (Feb 28 -> Mar 28); schedules
    /// use [`Cadence::nth`] anchored at their start date instead.
    pub fn advance(self, date: NaiveDate) -> NaiveDate {
        self.nth(date, 1)
    }

    /// The `n`-th occurrence of a schedule starting at `start`, with
    /// `nth(start, 0) == start`. Saturates at `NaiveDate::MAX`.
    pub fn nth(self, start: NaiveDate, n: u32) -> NaiveDate {
        self.checked_nth(start, n).unwrap_or(NaiveDate::MAX)
    }

    fn checked_nth(self, start: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Self::Weekly => start.checked_add_days(Days::new(7 * u64::from(n))),
            Self::Biweekly => start.checked_add_days(Days::new(14 * u64::from(n))),
            Self::Monthly => start.checked_add_months(Months::new(n)),
        }
    }

    /// Every occurrence from `start` onward, in order.
    pub fn occurrences(self, start: NaiveDate) -> Occurrences {
        Occurrences {
            cadence: self,
            start,
            index: 0,
        }
    }
}

/// Iterator over a schedule's dates. Ends only when the calendar runs out.
#[derive(Debug, Clone)]
pub struct Occurrences {
    cadence: Cadence,
    start: NaiveDate,
    index: u32,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.cadence.checked_nth(self.start, self.index)?;
        self.index = self.index.checked_add(1)?;
        Some(date)
    }
}

#[cfg(test)]
#[path = "cadence_tests.rs"]
mod tests;
