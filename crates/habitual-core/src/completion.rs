//! Completion log and the string-to-date boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::InvalidDateError;
use crate::period::{next_period_start, period_start, PeriodKind};

/// Wire format for completion dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a date.
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| InvalidDateError {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Format a date the way it is persisted.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The dates on which a habit was completed.
///
/// Always ascending and free of duplicates; recording a date twice is a
/// no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    dates: BTreeSet<NaiveDate>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of date strings, sorting and deduplicating them.
    pub fn parse<S: AsRef<str>>(dates: &[S]) -> Result<Self, InvalidDateError> {
        dates
            .iter()
            .map(|s| parse_date(s.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(|dates| Self { dates })
    }

    /// Record a completion. Returns `false` if the date was already present.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Forget every completion.
    pub fn clear(&mut self) {
        self.dates.clear();
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of completions in the period of `kind` containing `date`.
    pub fn count_in_period(&self, date: NaiveDate, kind: PeriodKind) -> usize {
        let start = period_start(date, kind);
        match next_period_start(date, kind) {
            Some(end) => self.dates.range(start..end).count(),
            None => self.dates.range(start..).count(),
        }
    }

    /// Dates formatted as `YYYY-MM-DD`, ascending.
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(format_date).collect()
    }
}

impl FromIterator<NaiveDate> for CompletionLog {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
