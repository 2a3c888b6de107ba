//! Streak accounting.
//!
//! A streak counts consecutive periods whose completion count met the rule.
//! [`StreakEvaluator`] recomputes the state from the full completion history
//! and is the reference implementation. [`IncrementalStreak`] maintains the
//! same state one completion at a time.

mod evaluator;
mod incremental;

pub use evaluator::{evaluate, StreakEvaluator};
pub use incremental::IncrementalStreak;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Current and all-time longest streak, in periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
}

impl StreakState {
    pub fn new(current: u32, longest: u32) -> Self {
        Self { current, longest }
    }
}

/// How periods without any completion affect the streak.
///
/// The scan only ever sees periods that contain at least one completion.
/// `Lenient` leaves it at that, so a skipped period goes unnoticed. `Strict`
/// treats a jump over one or more empty periods as a break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    #[default]
    Lenient,
    Strict,
}

impl GapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapPolicy::Lenient => "lenient",
            GapPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(GapPolicy::Lenient),
            "strict" => Ok(GapPolicy::Strict),
            other => Err(ConfigError::InvalidValue {
                key: "streak.gap_policy".into(),
                message: format!("expected 'lenient' or 'strict', got '{other}'"),
            }),
        }
    }
}

/// Running totals over closed periods.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    current: u32,
    longest: u32,
}

impl Tally {
    pub(crate) fn with_longest(longest: u32) -> Self {
        Self { current: 0, longest }
    }

    /// Close one period.
    pub(crate) fn close(&mut self, met: bool) {
        if met {
            self.current += 1;
            self.longest = self.longest.max(self.current);
        } else {
            self.current = 0;
        }
    }

    pub(crate) fn break_streak(&mut self) {
        self.current = 0;
    }

    pub(crate) fn state(&self) -> StreakState {
        StreakState::new(self.current, self.longest)
    }
}
