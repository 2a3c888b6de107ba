use chrono::NaiveDate;

use super::{GapPolicy, StreakState, Tally};
use crate::completion::CompletionLog;
use crate::error::ValidationError;
use crate::period::{is_adjacent, period_start};
use crate::rule::PeriodicityRule;

#[derive(Debug, Clone, Copy)]
struct OpenPeriod {
    start: NaiveDate,
    count: u32,
    last: NaiveDate,
}

/// Streak state maintained one completion at a time.
///
/// Only the open period's count and the totals over closed periods are kept,
/// so each [`push`](Self::push) is O(1). The result always matches
/// [`StreakEvaluator::evaluate`](super::StreakEvaluator::evaluate) over the
/// same dates. Changing the rule regroups every period: call
/// [`rebuild`](Self::rebuild) instead of adjusting an existing tracker.
#[derive(Debug, Clone)]
pub struct IncrementalStreak {
    rule: PeriodicityRule,
    policy: GapPolicy,
    closed: Tally,
    open: Option<OpenPeriod>,
}

impl IncrementalStreak {
    pub fn new(rule: PeriodicityRule, policy: GapPolicy) -> Self {
        Self {
            rule,
            policy,
            closed: Tally::default(),
            open: None,
        }
    }

    /// Replay a whole log under `rule`.
    pub fn rebuild(log: &CompletionLog, rule: PeriodicityRule, policy: GapPolicy) -> Self {
        let mut tracker = Self::new(rule, policy);
        for date in log.iter() {
            tracker.advance(date);
        }
        tracker
    }

    pub fn rule(&self) -> &PeriodicityRule {
        &self.rule
    }

    /// Record a completion strictly after every date seen so far.
    pub fn push(&mut self, date: NaiveDate) -> Result<StreakState, ValidationError> {
        if let Some(open) = self.open {
            if date <= open.last {
                return Err(ValidationError::OutOfOrder {
                    date,
                    last: open.last,
                });
            }
        }
        self.advance(date);
        Ok(self.state())
    }

    /// State as if the open period were closed now.
    pub fn state(&self) -> StreakState {
        match self.open {
            None => self.closed.state(),
            Some(open) => {
                let mut tally = self.closed;
                tally.close(self.met(open.count));
                tally.state()
            }
        }
    }

    fn met(&self, count: u32) -> bool {
        count >= self.rule.required_per_period()
    }

    fn advance(&mut self, date: NaiveDate) {
        let kind = self.rule.kind();
        let start = period_start(date, kind);

        let next = match self.open {
            Some(open) if open.start == start => OpenPeriod {
                count: open.count + 1,
                last: date,
                ..open
            },
            Some(open) => {
                let met = self.met(open.count);
                self.closed.close(met);
                if self.policy == GapPolicy::Strict && !is_adjacent(open.start, start, kind) {
                    self.closed.break_streak();
                }
                OpenPeriod {
                    start,
                    count: 1,
                    last: date,
                }
            }
            None => OpenPeriod {
                start,
                count: 1,
                last: date,
            },
        };
        self.open = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::parse_date;
    use crate::period::PeriodKind;
    use crate::streak::StreakEvaluator;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn empty_tracker_reports_zero() {
        let tracker = IncrementalStreak::new(PeriodicityRule::daily(), GapPolicy::Lenient);
        assert_eq!(tracker.state(), StreakState::default());
    }

    #[test]
    fn push_follows_weekly_progression() {
        let rule = PeriodicityRule::new(PeriodKind::Weekly, 2).unwrap();
        let mut tracker = IncrementalStreak::new(rule, GapPolicy::Lenient);

        assert_eq!(tracker.push(d("2024-01-01")).unwrap(), StreakState::new(0, 0));
        assert_eq!(tracker.push(d("2024-01-03")).unwrap(), StreakState::new(1, 1));
        assert_eq!(tracker.push(d("2024-01-08")).unwrap(), StreakState::new(0, 1));
        assert_eq!(tracker.push(d("2024-01-10")).unwrap(), StreakState::new(2, 2));
    }

    #[test]
    fn push_rejects_duplicates_and_backfill() {
        let mut tracker = IncrementalStreak::new(PeriodicityRule::daily(), GapPolicy::Lenient);
        tracker.push(d("2024-01-05")).unwrap();

        assert!(matches!(
            tracker.push(d("2024-01-05")),
            Err(ValidationError::OutOfOrder { .. })
        ));
        assert!(tracker.push(d("2024-01-01")).is_err());
        assert_eq!(tracker.state(), StreakState::new(1, 1));
    }

    #[test]
    fn rebuild_matches_full_evaluation() {
        let log = CompletionLog::parse(&[
            "2024-01-01", "2024-01-02", "2024-01-09", "2024-01-10", "2024-01-24",
        ])
        .unwrap();
        let rule = PeriodicityRule::new(PeriodKind::Weekly, 2).unwrap();

        for policy in [GapPolicy::Lenient, GapPolicy::Strict] {
            let tracker = IncrementalStreak::rebuild(&log, rule, policy);
            let expected = StreakEvaluator::new(policy).evaluate(log.iter(), &rule);
            assert_eq!(tracker.state(), expected);
        }
    }
}
