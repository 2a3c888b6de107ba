//! Habit repository.
//!
//! Owns every habit in display order, keyed by [`HabitId`], and writes the
//! full set back to its [`HabitStore`] after each successful mutation. The
//! in-memory state is always updated first; the store never sees a habit
//! whose streak has not been recomputed.

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::analysis::HabitAnalysis;
use crate::error::{Result, ValidationError};
use crate::habit::{normalize_name, CheckOff, Habit, HabitEdit, HabitId};
use crate::rule::PeriodicityRule;
use crate::store::HabitStore;
use crate::streak::StreakEvaluator;

pub struct HabitRepository<S: HabitStore> {
    store: S,
    habits: IndexMap<HabitId, Habit>,
    evaluator: StreakEvaluator,
}

impl<S: HabitStore> HabitRepository<S> {
    /// Load habits with the default (lenient) evaluator.
    pub fn open(store: S) -> Result<Self> {
        Self::open_with(store, StreakEvaluator::default())
    }

    /// Load habits and refresh every streak under `evaluator`.
    pub fn open_with(store: S, evaluator: StreakEvaluator) -> Result<Self> {
        let loaded = store.load()?;
        let mut habits = IndexMap::with_capacity(loaded.len());
        let mut assigned_ids = 0usize;
        for mut habit in loaded {
            habit.refresh(&evaluator);
            if habit.take_unsaved_id() {
                assigned_ids += 1;
            }
            let id = habit.id().clone();
            if habits.insert(id.clone(), habit).is_some() {
                warn!(habit = %id, "duplicate habit id in store; keeping the last record");
            }
        }
        info!(
            store = %store.describe(),
            count = habits.len(),
            policy = %evaluator.policy(),
            "habits loaded"
        );

        let mut repo = Self {
            store,
            habits,
            evaluator,
        };
        // Generated ids must survive to the next load.
        if assigned_ids > 0 {
            info!(count = assigned_ids, "assigning ids to legacy habits");
            repo.persist()?;
        }
        Ok(repo)
    }

    pub fn evaluator(&self) -> &StreakEvaluator {
        &self.evaluator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Habits in display order.
    pub fn list(&self) -> impl Iterator<Item = &Habit> {
        self.habits.values()
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.get(id)
    }

    /// Find a habit by id, by 1-based position, or by name (case-insensitive).
    pub fn resolve(&self, selector: &str) -> Result<HabitId> {
        let selector = selector.trim();

        if let Some((id, _)) = self.habits.get_key_value(&HabitId::from(selector)) {
            return Ok(id.clone());
        }
        if let Ok(position) = selector.parse::<usize>() {
            if let Some((id, _)) = position
                .checked_sub(1)
                .and_then(|index| self.habits.get_index(index))
            {
                return Ok(id.clone());
            }
        }
        self.find_by_name(selector)
            .map(|habit| habit.id().clone())
            .ok_or_else(|| ValidationError::NotFound(selector.to_string()).into())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Habit> {
        let name = name.trim();
        self.habits
            .values()
            .find(|habit| habit.name().eq_ignore_ascii_case(name))
    }

    /// Create and persist a habit.
    pub fn add(&mut self, name: &str, specification: &str, rule: PeriodicityRule) -> Result<&Habit> {
        let habit = Habit::new(name, specification, rule)?;
        self.ensure_unique_name(habit.name(), None)?;

        let id = habit.id().clone();
        info!(habit = %id, name = habit.name(), rule = %rule, "habit added");
        self.habits.insert(id.clone(), habit);
        self.persist()?;
        Ok(&self.habits[&id])
    }

    /// Check off `id` on `date`. Nothing is written when the date was
    /// already recorded.
    pub fn check_off(&mut self, id: &HabitId, date: NaiveDate) -> Result<CheckOff> {
        let evaluator = self.evaluator;
        let habit = self.habit_mut(id)?;
        let outcome = habit.check_off(date, &evaluator);

        if let CheckOff::Recorded(streak) = outcome {
            info!(
                habit = %id,
                %date,
                current = streak.current,
                longest = streak.longest,
                "habit checked off"
            );
            self.persist()?;
        }
        Ok(outcome)
    }

    /// Edit name, specification, or rule.
    pub fn edit(&mut self, id: &HabitId, edit: HabitEdit) -> Result<&Habit> {
        if edit.is_empty() {
            return self.get(id).ok_or_else(|| ValidationError::NotFound(id.to_string()).into());
        }
        if let Some(name) = edit.name.as_deref() {
            self.ensure_unique_name(&normalize_name(name)?, Some(id))?;
        }

        let evaluator = self.evaluator;
        self.habit_mut(id)?.apply_edit(edit, &evaluator)?;
        info!(habit = %id, "habit edited");
        self.persist()?;
        Ok(&self.habits[id])
    }

    /// Clear the log and streaks of `id`.
    pub fn reset(&mut self, id: &HabitId) -> Result<&Habit> {
        self.habit_mut(id)?.reset();
        info!(habit = %id, "habit reset");
        self.persist()?;
        Ok(&self.habits[id])
    }

    /// Delete `id`, keeping the order of the others.
    pub fn remove(&mut self, id: &HabitId) -> Result<Habit> {
        let habit = self
            .habits
            .shift_remove(id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()))?;
        info!(habit = %id, name = habit.name(), "habit removed");
        self.persist()?;
        Ok(habit)
    }

    /// Analysis over every habit.
    pub fn analyze(&self) -> HabitAnalysis {
        HabitAnalysis::from_habits(self.habits.values())
    }

    fn habit_mut(&mut self, id: &HabitId) -> Result<&mut Habit> {
        self.habits
            .get_mut(id)
            .ok_or_else(|| ValidationError::NotFound(id.to_string()).into())
    }

    fn ensure_unique_name(&self, name: &str, except: Option<&HabitId>) -> Result<()> {
        let clash = self
            .habits
            .values()
            .any(|h| Some(h.id()) != except && h.name().eq_ignore_ascii_case(name));
        if clash {
            return Err(ValidationError::DuplicateName(name.to_string()).into());
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        let habits: Vec<Habit> = self.habits.values().cloned().collect();
        self.store.save(&habits)?;
        debug!(store = %self.store.describe(), count = habits.len(), "habits saved");
        Ok(())
    }
}
