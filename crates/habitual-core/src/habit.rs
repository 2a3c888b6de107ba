//! Habit records.
//!
//! A [`Habit`] owns its periodicity rule, its completion log, and the streak
//! derived from both. Every operation that touches the log or the rule
//! recomputes the streak before returning.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::completion::CompletionLog;
use crate::error::{CoreError, ValidationError};
use crate::rule::PeriodicityRule;
use crate::streak::{StreakEvaluator, StreakState};

/// Opaque habit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HabitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Outcome of checking off a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOff {
    /// The date was new; the streak was recomputed.
    Recorded(StreakState),
    /// The date was already in the log; nothing changed.
    AlreadyRecorded,
}

/// Field changes for [`Habit::apply_edit`]. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct HabitEdit {
    pub name: Option<String>,
    pub specification: Option<String>,
    /// Replaces the whole rule.
    pub rule: Option<PeriodicityRule>,
}

impl HabitEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.specification.is_none() && self.rule.is_none()
    }
}

/// A tracked habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "HabitRecord", into = "HabitRecord")]
pub struct Habit {
    id: HabitId,
    name: String,
    specification: String,
    rule: PeriodicityRule,
    completions: CompletionLog,
    streak: StreakState,
    created_at: Option<DateTime<Utc>>,
    /// Set when the id was generated while loading a record that had none.
    /// Cleared once the repository has written the id back.
    unsaved_id: bool,
}

impl PartialEq for Habit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.specification == other.specification
            && self.rule == other.rule
            && self.completions == other.completions
            && self.streak == other.streak
            && self.created_at == other.created_at
    }
}

pub(crate) fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

impl Habit {
    /// Create a habit with an empty log.
    pub fn new(
        name: &str,
        specification: &str,
        rule: PeriodicityRule,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: HabitId::generate(),
            name: normalize_name(name)?,
            specification: specification.trim().to_string(),
            rule,
            completions: CompletionLog::new(),
            streak: StreakState::default(),
            created_at: Some(Utc::now()),
            unsaved_id: false,
        })
    }

    pub fn id(&self) -> &HabitId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    pub fn rule(&self) -> &PeriodicityRule {
        &self.rule
    }

    pub fn completions(&self) -> &CompletionLog {
        &self.completions
    }

    pub fn streak(&self) -> StreakState {
        self.streak
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Whether the id was generated on load and not yet persisted. Clears
    /// the flag.
    pub(crate) fn take_unsaved_id(&mut self) -> bool {
        std::mem::take(&mut self.unsaved_id)
    }

    /// Record a completion on `date`, supplied by the caller.
    ///
    /// The streak is recomputed over the full log with the stored longest
    /// streak as a floor, so adding a date never lowers it.
    pub fn check_off(&mut self, date: NaiveDate, evaluator: &StreakEvaluator) -> CheckOff {
        if !self.completions.insert(date) {
            debug!(habit = %self.id, %date, "completion already recorded");
            return CheckOff::AlreadyRecorded;
        }
        self.refresh(evaluator);
        CheckOff::Recorded(self.streak)
    }

    /// Clear the log and both streak values.
    pub fn reset(&mut self) {
        self.completions.clear();
        self.streak = StreakState::default();
    }

    /// Apply an edit. A rule change regroups every period, so the streak is
    /// recomputed from scratch without the previous longest as a floor.
    pub fn apply_edit(
        &mut self,
        edit: HabitEdit,
        evaluator: &StreakEvaluator,
    ) -> Result<(), ValidationError> {
        let name = edit.name.as_deref().map(normalize_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(spec) = edit.specification {
            self.specification = spec.trim().to_string();
        }
        if let Some(rule) = edit.rule {
            if rule != self.rule {
                debug!(habit = %self.id, from = %self.rule, to = %rule, "periodicity replaced");
                self.rule = rule;
                self.recompute(evaluator);
            }
        }
        Ok(())
    }

    /// Re-derive the streak, keeping the stored longest as a floor.
    pub fn refresh(&mut self, evaluator: &StreakEvaluator) {
        self.streak =
            evaluator.evaluate_from(self.completions.iter(), &self.rule, self.streak.longest);
    }

    /// Re-derive the streak from the log alone.
    pub fn recompute(&mut self, evaluator: &StreakEvaluator) {
        self.streak = evaluator.evaluate(self.completions.iter(), &self.rule);
    }

    /// Completions so far in the period containing `today`.
    pub fn progress(&self, today: NaiveDate) -> (usize, u32) {
        (
            self.completions.count_in_period(today, self.rule.kind()),
            self.rule.required_per_period(),
        )
    }
}

/// Persisted shape of a habit.
///
/// Also reads legacy files, which used
/// `periodicity_type` / `periodicity` and had no `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub specification: String,
    #[serde(alias = "periodicity_type")]
    pub periodicity_kind: String,
    #[serde(alias = "periodicity")]
    pub periodicity_count: u32,
    #[serde(default)]
    pub periodicity_display: Option<String>,
    #[serde(default)]
    pub completed_dates: Vec<String>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<HabitRecord> for Habit {
    type Error = CoreError;

    fn try_from(record: HabitRecord) -> Result<Self, Self::Error> {
        let rule = PeriodicityRule::parse(&record.periodicity_kind, record.periodicity_count)?;
        let completions = CompletionLog::parse(&record.completed_dates)?;
        if completions.len() != record.completed_dates.len() {
            warn!(
                habit = %record.name,
                dropped = record.completed_dates.len() - completions.len(),
                "duplicate completion dates dropped on load"
            );
        }

        let streak = if completions.is_empty() {
            StreakState::default()
        } else {
            StreakState::new(
                record.current_streak,
                record.longest_streak.max(record.current_streak),
            )
        };

        let unsaved_id = record.id.is_none();
        Ok(Self {
            id: record.id.map(HabitId::from).unwrap_or_else(HabitId::generate),
            name: normalize_name(&record.name)?,
            specification: record.specification,
            rule,
            completions,
            streak,
            created_at: record.created_at,
            unsaved_id,
        })
    }
}

impl From<Habit> for HabitRecord {
    fn from(habit: Habit) -> Self {
        Self {
            id: Some(habit.id.0),
            periodicity_kind: habit.rule.kind().as_str().to_string(),
            periodicity_count: habit.rule.required_per_period(),
            periodicity_display: Some(habit.rule.to_string()),
            completed_dates: habit.completions.to_strings(),
            current_streak: habit.streak.current,
            longest_streak: habit.streak.longest,
            name: habit.name,
            specification: habit.specification,
            created_at: habit.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::parse_date;
    use crate::period::PeriodKind;
    use crate::streak::GapPolicy;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn weekly(n: u32) -> PeriodicityRule {
        PeriodicityRule::new(PeriodKind::Weekly, n).unwrap()
    }

    #[test]
    fn new_rejects_blank_name() {
        assert_eq!(
            Habit::new("   ", "", PeriodicityRule::daily()).unwrap_err(),
            ValidationError::EmptyName
        );
    }

    #[test]
    fn check_off_records_once() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Read", "20 pages", PeriodicityRule::daily()).unwrap();

        assert_eq!(
            habit.check_off(d("2024-01-01"), &eval),
            CheckOff::Recorded(StreakState::new(1, 1))
        );
        assert_eq!(habit.check_off(d("2024-01-01"), &eval), CheckOff::AlreadyRecorded);
        assert_eq!(habit.completions().len(), 1);
    }

    #[test]
    fn check_off_never_lowers_longest() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Gym", "", weekly(2)).unwrap();
        habit.check_off(d("2024-01-01"), &eval);
        habit.check_off(d("2024-01-03"), &eval);
        assert_eq!(habit.streak(), StreakState::new(1, 1));

        habit.check_off(d("2024-01-08"), &eval);
        assert_eq!(habit.streak(), StreakState::new(0, 1));
    }

    #[test]
    fn reset_zeroes_everything() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Read", "", PeriodicityRule::daily()).unwrap();
        habit.check_off(d("2024-01-01"), &eval);
        habit.check_off(d("2024-01-02"), &eval);
        habit.reset();
        assert!(habit.completions().is_empty());
        assert_eq!(habit.streak(), StreakState::default());
    }

    #[test]
    fn rule_edit_recomputes_from_scratch() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Run", "", PeriodicityRule::daily()).unwrap();
        for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-08"] {
            habit.check_off(d(day), &eval);
        }
        assert_eq!(habit.streak(), StreakState::new(4, 4));

        habit
            .apply_edit(
                HabitEdit {
                    rule: Some(weekly(3)),
                    ..Default::default()
                },
                &eval,
            )
            .unwrap();
        let fresh = eval.evaluate(habit.completions().iter(), &weekly(3));
        assert_eq!(habit.streak(), fresh);
        assert_eq!(habit.streak(), StreakState::new(0, 1));
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let eval = StreakEvaluator::new(GapPolicy::Strict);
        let mut habit = Habit::new("Run", "5k", weekly(2)).unwrap();
        habit
            .apply_edit(
                HabitEdit {
                    name: Some("  Jog ".into()),
                    ..Default::default()
                },
                &eval,
            )
            .unwrap();
        assert_eq!(habit.name(), "Jog");
        assert_eq!(habit.specification(), "5k");
        assert_eq!(habit.rule(), &weekly(2));

        let err = habit.apply_edit(
            HabitEdit {
                name: Some(String::new()),
                specification: Some("ignored".into()),
                ..Default::default()
            },
            &eval,
        );
        assert_eq!(err, Err(ValidationError::EmptyName));
        assert_eq!(habit.specification(), "5k");
    }

    #[test]
    fn progress_counts_current_period() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Swim", "", weekly(3)).unwrap();
        habit.check_off(d("2024-01-01"), &eval);
        habit.check_off(d("2024-01-02"), &eval);
        assert_eq!(habit.progress(d("2024-01-07")), (2, 3));
        assert_eq!(habit.progress(d("2024-01-08")), (0, 3));
    }

    #[test]
    fn record_roundtrip_uses_flat_fields() {
        let eval = StreakEvaluator::default();
        let mut habit = Habit::new("Run", "5k", weekly(2)).unwrap();
        habit.check_off(d("2024-01-03"), &eval);
        habit.check_off(d("2024-01-01"), &eval);

        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["periodicity_kind"], "weekly");
        assert_eq!(json["periodicity_count"], 2);
        assert_eq!(json["periodicity_display"], "Weekly (2 times)");
        assert_eq!(json["completed_dates"][0], "2024-01-01");
        assert_eq!(json["current_streak"], 1);

        let back: Habit = serde_json::from_value(json).unwrap();
        assert_eq!(back, habit);
    }

    #[test]
    fn legacy_record_loads() {
        let legacy = r#"{
            "name": "Meditate",
            "periodicity": 2,
            "periodicity_display": "Weekly (2 times)",
            "periodicity_type": "weekly",
            "specification": "10 minutes",
            "completed_dates": ["2024-01-03", "2024-01-01", "2024-01-03"],
            "current_streak": 1,
            "longest_streak": 1
        }"#;
        let habit: Habit = serde_json::from_str(legacy).unwrap();
        assert_eq!(habit.rule(), &weekly(2));
        assert_eq!(habit.completions().to_strings(), vec!["2024-01-01", "2024-01-03"]);
        assert!(!habit.id().as_str().is_empty());
        assert!(habit.created_at().is_none());

        let mut habit = habit;
        assert!(habit.take_unsaved_id());
        assert!(!habit.take_unsaved_id());
    }

    #[test]
    fn invalid_record_is_rejected() {
        let bad_rule = r#"{"name":"X","periodicity_kind":"daily","periodicity_count":3}"#;
        assert!(serde_json::from_str::<Habit>(bad_rule).is_err());

        let bad_date = r#"{"name":"X","periodicity_kind":"daily","periodicity_count":1,
            "completed_dates":["2024-02-31"]}"#;
        assert!(serde_json::from_str::<Habit>(bad_date).is_err());
    }
}
