//! Habit analysis reports.
//!
//! Read-only summaries over a set of habits: totals, the average current
//! streak, the best streak overall, and per-habit details.

use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::period::PeriodKind;

/// Per-habit line of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSummary {
    pub id: String,
    pub name: String,
    pub kind: PeriodKind,
    pub required_per_period: u32,
    /// Display label, e.g. "Weekly (3 times)".
    pub periodicity: String,
    pub specification: String,
    pub completed_dates: Vec<String>,
    pub total_completions: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl From<&Habit> for HabitSummary {
    fn from(habit: &Habit) -> Self {
        let streak = habit.streak();
        Self {
            id: habit.id().to_string(),
            name: habit.name().to_string(),
            kind: habit.rule().kind(),
            required_per_period: habit.rule().required_per_period(),
            periodicity: habit.rule().to_string(),
            specification: habit.specification().to_string(),
            completed_dates: habit.completions().to_strings(),
            total_completions: habit.completions().len(),
            current_streak: streak.current,
            longest_streak: streak.longest,
        }
    }
}

/// The habit holding the longest streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestStreak {
    pub name: String,
    pub kind: PeriodKind,
    pub longest_streak: u32,
}

/// Aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitAnalysis {
    pub total_habits: usize,
    pub total_completions: usize,
    pub average_current_streak: f64,
    pub best: Option<BestStreak>,
    pub habits: Vec<HabitSummary>,
}

impl HabitAnalysis {
    pub fn from_habits<'a, I>(habits: I) -> Self
    where
        I: IntoIterator<Item = &'a Habit>,
    {
        let habits: Vec<HabitSummary> = habits.into_iter().map(HabitSummary::from).collect();
        let total_habits = habits.len();
        let total_completions: usize = habits.iter().map(|h| h.total_completions).sum();
        let average_current_streak = if total_habits > 0 {
            habits.iter().map(|h| f64::from(h.current_streak)).sum::<f64>() / total_habits as f64
        } else {
            0.0
        };

        // First habit wins ties.
        let best = habits
            .iter()
            .filter(|h| h.longest_streak > 0)
            .fold(None::<&HabitSummary>, |best, h| match best {
                Some(b) if b.longest_streak >= h.longest_streak => Some(b),
                _ => Some(h),
            })
            .map(|h| BestStreak {
                name: h.name.clone(),
                kind: h.kind,
                longest_streak: h.longest_streak,
            });

        Self {
            total_habits,
            total_completions,
            average_current_streak,
            best,
            habits,
        }
    }

    /// Report restricted to habits of one periodicity kind.
    pub fn for_kind<'a, I>(habits: I, kind: PeriodKind) -> Self
    where
        I: IntoIterator<Item = &'a Habit>,
    {
        Self::from_habits(habits.into_iter().filter(|h| h.rule().kind() == kind))
    }
}
