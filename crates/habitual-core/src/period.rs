//! Period resolution.
//!
//! Maps a calendar date to the first day of the period containing it. Two
//! dates belong to the same period exactly when their period starts are
//! equal. Weeks follow ISO 8601 and start on Monday.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidRuleError;

/// Length of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 4] = [
        PeriodKind::Daily,
        PeriodKind::Weekly,
        PeriodKind::Monthly,
        PeriodKind::Yearly,
    ];

    /// Upper bound for the required completions per period.
    pub fn max_per_period(&self) -> u32 {
        match self {
            PeriodKind::Daily => 1,
            PeriodKind::Weekly => 7,
            PeriodKind::Monthly => 31,
            PeriodKind::Yearly => 365,
        }
    }

    /// Lowercase identifier used in files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Yearly => "yearly",
        }
    }

    /// Singular unit name ("day", "week", ...).
    pub fn unit(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "day",
            PeriodKind::Weekly => "week",
            PeriodKind::Monthly => "month",
            PeriodKind::Yearly => "year",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodKind::Daily => "Daily",
            PeriodKind::Weekly => "Weekly",
            PeriodKind::Monthly => "Monthly",
            PeriodKind::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for PeriodKind {
    type Err = InvalidRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(PeriodKind::Daily),
            "weekly" | "week" => Ok(PeriodKind::Weekly),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            "yearly" | "year" => Ok(PeriodKind::Yearly),
            _ => Err(InvalidRuleError::UnknownKind(s.to_string())),
        }
    }
}

/// First day of the period of `kind` that contains `date`.
pub fn period_start(date: NaiveDate, kind: PeriodKind) -> NaiveDate {
    let offset = match kind {
        PeriodKind::Daily => 0,
        PeriodKind::Weekly => date.weekday().num_days_from_monday(),
        PeriodKind::Monthly => date.day0(),
        PeriodKind::Yearly => date.ordinal0(),
    };
    // Only the first week of the representable range can underflow.
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
}

/// Start of the period that follows the one containing `date`.
///
/// Returns `None` past the end of the representable calendar.
pub fn next_period_start(date: NaiveDate, kind: PeriodKind) -> Option<NaiveDate> {
    let start = period_start(date, kind);
    match kind {
        PeriodKind::Daily => start.checked_add_days(Days::new(1)),
        PeriodKind::Weekly => start.checked_add_days(Days::new(7)),
        PeriodKind::Monthly => start.checked_add_months(Months::new(1)),
        PeriodKind::Yearly => start.checked_add_months(Months::new(12)),
    }
}

/// Whether `a` and `b` fall in the same period.
pub fn same_period(a: NaiveDate, b: NaiveDate, kind: PeriodKind) -> bool {
    period_start(a, kind) == period_start(b, kind)
}

/// Whether the period containing `later` directly follows the one containing
/// `earlier`.
pub fn is_adjacent(earlier: NaiveDate, later: NaiveDate, kind: PeriodKind) -> bool {
    next_period_start(earlier, kind) == Some(period_start(later, kind))
}
