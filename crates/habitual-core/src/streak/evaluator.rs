use chrono::NaiveDate;

use super::{GapPolicy, StreakState, Tally};
use crate::period::{is_adjacent, period_start};
use crate::rule::PeriodicityRule;

/// Full-history streak evaluation.
///
/// Dates must be ascending and unique. [`CompletionLog`](crate::CompletionLog)
/// guarantees both; the evaluator does not re-check them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakEvaluator {
    policy: GapPolicy,
}

impl StreakEvaluator {
    pub fn new(policy: GapPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> GapPolicy {
        self.policy
    }

    /// Evaluate from scratch.
    pub fn evaluate<I>(&self, dates: I, rule: &PeriodicityRule) -> StreakState
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.evaluate_from(dates, rule, 0)
    }

    /// Evaluate with `longest` starting at `previous_longest`, so a
    /// recomputation after a new completion never lowers the all-time best.
    ///
    /// Every period is closed at the end of the scan, including the one the
    /// last completion falls in: a period that has not yet reached the
    /// required count ends the current streak until it does.
    pub fn evaluate_from<I>(
        &self,
        dates: I,
        rule: &PeriodicityRule,
        previous_longest: u32,
    ) -> StreakState
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let kind = rule.kind();
        let required = rule.required_per_period();
        let mut dates = dates.into_iter();

        let Some(first) = dates.next() else {
            return StreakState::default();
        };

        let mut tally = Tally::with_longest(previous_longest);
        let mut open_start = period_start(first, kind);
        let mut count_in_period: u32 = 1;

        for date in dates {
            let start = period_start(date, kind);
            if start == open_start {
                count_in_period += 1;
                continue;
            }

            tally.close(count_in_period >= required);
            if self.policy == GapPolicy::Strict && !is_adjacent(open_start, start, kind) {
                tally.break_streak();
            }
            open_start = start;
            count_in_period = 1;
        }

        tally.close(count_in_period >= required);
        tally.state()
    }
}

/// Evaluate with the default (lenient) gap policy.
pub fn evaluate<I>(dates: I, rule: &PeriodicityRule) -> StreakState
where
    I: IntoIterator<Item = NaiveDate>,
{
    StreakEvaluator::default().evaluate(dates, rule)
}
