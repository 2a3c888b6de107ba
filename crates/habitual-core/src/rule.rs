//! Periodicity rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidRuleError;
use crate::period::PeriodKind;

/// How often a habit must be completed: at least `required_per_period`
/// completions in every period of `kind`.
///
/// Construction validates the bound, so every rule in circulation is valid.
/// A habit's rule is replaced as a whole, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct PeriodicityRule {
    kind: PeriodKind,
    required_per_period: u32,
}

#[derive(Serialize, Deserialize)]
struct RawRule {
    kind: PeriodKind,
    required_per_period: u32,
}

impl PeriodicityRule {
    /// Build a rule, rejecting counts outside `[1, kind.max_per_period()]`.
    pub fn new(kind: PeriodKind, required_per_period: u32) -> Result<Self, InvalidRuleError> {
        let max = kind.max_per_period();
        if !(1..=max).contains(&required_per_period) {
            return Err(InvalidRuleError::RequiredOutOfRange {
                kind,
                got: required_per_period,
                max,
            });
        }
        Ok(Self {
            kind,
            required_per_period,
        })
    }

    /// Build a rule from a kind name such as `"weekly"`.
    pub fn parse(kind: &str, required_per_period: u32) -> Result<Self, InvalidRuleError> {
        Self::new(kind.parse()?, required_per_period)
    }

    /// Once a day.
    pub fn daily() -> Self {
        Self {
            kind: PeriodKind::Daily,
            required_per_period: 1,
        }
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn required_per_period(&self) -> u32 {
        self.required_per_period
    }
}

impl Default for PeriodicityRule {
    fn default() -> Self {
        Self::daily()
    }
}

impl fmt::Display for PeriodicityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PeriodKind::Daily => write!(f, "Daily"),
            kind => write!(f, "{} ({} times)", kind, self.required_per_period),
        }
    }
}

impl TryFrom<RawRule> for PeriodicityRule {
    type Error = InvalidRuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.required_per_period)
    }
}

impl From<PeriodicityRule> for RawRule {
    fn from(rule: PeriodicityRule) -> Self {
        Self {
            kind: rule.kind,
            required_per_period: rule.required_per_period,
        }
    }
}
