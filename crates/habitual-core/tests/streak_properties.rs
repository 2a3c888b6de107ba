//! Property tests for the period resolver and the streak engine.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use habitual_core::{
    period_start, CompletionLog, GapPolicy, Habit, HabitEdit, IncrementalStreak, PeriodKind,
    PeriodicityRule, StreakEvaluator, StreakState,
};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 20).unwrap()
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..3_000).prop_map(|offset| base() + Days::new(offset))
}

fn any_kind() -> impl Strategy<Value = PeriodKind> {
    prop::sample::select(PeriodKind::ALL.to_vec())
}

fn any_rule() -> impl Strategy<Value = PeriodicityRule> {
    any_kind().prop_flat_map(|kind| {
        (1..=kind.max_per_period().min(4))
            .prop_map(move |required| PeriodicityRule::new(kind, required).unwrap())
    })
}

fn any_policy() -> impl Strategy<Value = GapPolicy> {
    prop_oneof![Just(GapPolicy::Lenient), Just(GapPolicy::Strict)]
}

/// Sorted, unique dates spread over a bit more than two years.
fn any_log() -> impl Strategy<Value = Vec<NaiveDate>> {
    prop::collection::btree_set(0u64..800, 0..60).prop_map(|offsets| {
        offsets
            .into_iter()
            .map(|offset| base() + Days::new(offset))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn daily_start_is_identity(date in any_date()) {
        prop_assert_eq!(period_start(date, PeriodKind::Daily), date);
    }

    #[test]
    fn period_start_is_idempotent(date in any_date(), kind in any_kind()) {
        let start = period_start(date, kind);
        prop_assert!(start <= date);
        prop_assert_eq!(period_start(start, kind), start);
    }

    #[test]
    fn week_shares_monday_start(date in any_date()) {
        let start = period_start(date, PeriodKind::Weekly);
        prop_assert_eq!(start.weekday(), Weekday::Mon);
        prop_assert_eq!(start.iso_week(), date.iso_week());
        for offset in 0..7 {
            let day = start + Days::new(offset);
            prop_assert_eq!(period_start(day, PeriodKind::Weekly), start);
        }
    }

    #[test]
    fn month_and_year_starts(date in any_date()) {
        let month = period_start(date, PeriodKind::Monthly);
        prop_assert_eq!((month.year(), month.month(), month.day()), (date.year(), date.month(), 1));
        let year = period_start(date, PeriodKind::Yearly);
        prop_assert_eq!((year.year(), year.ordinal()), (date.year(), 1));
    }

    #[test]
    fn longest_bounds_current(dates in any_log(), rule in any_rule(), policy in any_policy()) {
        let state = StreakEvaluator::new(policy).evaluate(dates.iter().copied(), &rule);
        prop_assert!(state.longest >= state.current);
        if dates.is_empty() {
            prop_assert_eq!(state, StreakState::default());
        }
    }

    #[test]
    fn lenient_daily_counts_every_date(dates in any_log()) {
        let n = dates.len() as u32;
        let state = StreakEvaluator::default().evaluate(dates, &PeriodicityRule::daily());
        prop_assert_eq!(state, StreakState::new(n, n));
    }

    #[test]
    fn insertion_order_does_not_matter(mut dates in any_log(), rule in any_rule()) {
        let eval = StreakEvaluator::default();
        let expected = eval.evaluate(dates.iter().copied(), &rule);
        dates.reverse();
        let log: CompletionLog = dates.into_iter().collect();
        prop_assert_eq!(eval.evaluate(log.iter(), &rule), expected);
    }

    #[test]
    fn appending_never_lowers_longest(
        dates in any_log(),
        extra in 1u64..60,
        rule in any_rule(),
        policy in any_policy(),
    ) {
        let eval = StreakEvaluator::new(policy);
        let before = eval.evaluate(dates.iter().copied(), &rule);
        let next = dates.last().copied().unwrap_or_else(base) + Days::new(extra);
        let after = eval.evaluate(dates.iter().copied().chain([next]), &rule);
        prop_assert!(after.longest >= before.longest);
    }

    #[test]
    fn strict_never_exceeds_lenient(dates in any_log(), rule in any_rule()) {
        let lenient = StreakEvaluator::new(GapPolicy::Lenient).evaluate(dates.iter().copied(), &rule);
        let strict = StreakEvaluator::new(GapPolicy::Strict).evaluate(dates.iter().copied(), &rule);
        prop_assert!(strict.current <= lenient.current);
        prop_assert!(strict.longest <= lenient.longest);
    }

    #[test]
    fn incremental_matches_full_evaluation(
        dates in any_log(),
        rule in any_rule(),
        policy in any_policy(),
    ) {
        let eval = StreakEvaluator::new(policy);
        let mut tracker = IncrementalStreak::new(rule, policy);
        for (i, date) in dates.iter().enumerate() {
            let state = tracker.push(*date).unwrap();
            prop_assert_eq!(state, eval.evaluate(dates[..=i].iter().copied(), &rule));
        }
        prop_assert_eq!(tracker.state(), eval.evaluate(dates.iter().copied(), &rule));

        let log: CompletionLog = dates.iter().copied().collect();
        let rebuilt = IncrementalStreak::rebuild(&log, rule, policy);
        prop_assert_eq!(rebuilt.state(), tracker.state());
    }

    #[test]
    fn rule_change_equals_fresh_evaluation(
        dates in any_log(),
        first in any_rule(),
        second in any_rule(),
    ) {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Run", "", first).unwrap();
        for date in &dates {
            habit.check_off(*date, &eval);
        }
        prop_assert_eq!(habit.streak(), eval.evaluate(dates.iter().copied(), &first));

        let edit = HabitEdit {
            rule: Some(second),
            ..Default::default()
        };
        habit.apply_edit(edit, &eval).unwrap();
        let fresh = eval.evaluate(habit.completions().iter(), &second);
        prop_assert_eq!(habit.streak(), fresh);

        let rebuilt = IncrementalStreak::rebuild(habit.completions(), second, GapPolicy::Lenient);
        prop_assert_eq!(rebuilt.state(), fresh);
    }

    #[test]
    fn cleared_log_evaluates_to_zero(dates in any_log(), rule in any_rule()) {
        let mut log: CompletionLog = dates.into_iter().collect();
        log.clear();
        prop_assert_eq!(StreakEvaluator::default().evaluate(log.iter(), &rule), StreakState::default());
    }
}
