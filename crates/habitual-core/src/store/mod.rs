//! Habit persistence.
//!
//! [`HabitStore`] is the seam between the repository and the storage
//! backend. Backends:
//! - [`JsonFileStore`]: `habits.json`, one object per habit
//! - [`SqliteStore`]: `habits.db`
//! - [`MemoryStore`]: no persistence, for tests and embedding

mod json;
mod migrations;
mod sqlite;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::habit::Habit;

/// Default JSON habit file name.
pub const HABITS_FILE: &str = "habits.json";
/// Default SQLite database file name.
pub const HABITS_DB: &str = "habits.db";

/// Loads and saves the complete set of habits.
///
/// `save` receives every habit in display order and replaces whatever was
/// stored before.
pub trait HabitStore {
    fn load(&self) -> Result<Vec<Habit>>;

    fn save(&mut self, habits: &[Habit]) -> Result<()>;

    /// Short description for logs, e.g. `json:/home/me/.config/habitual/habits.json`.
    fn describe(&self) -> String;
}

impl<S: HabitStore + ?Sized> HabitStore for Box<S> {
    fn load(&self) -> Result<Vec<Habit>> {
        (**self).load()
    }

    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        (**self).save(habits)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    habits: Vec<Habit>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `habits`.
    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self { habits, saves: 0 }
    }

    /// Number of `save` calls so far.
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }
}

impl HabitStore for MemoryStore {
    fn load(&self) -> Result<Vec<Habit>> {
        Ok(self.habits.clone())
    }

    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        self.habits = habits.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Returns `~/.config/habitual[-dev]/`.
///
/// `HABITUAL_DATA_DIR` overrides the location outright; otherwise
/// `HABITUAL_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HABITUAL_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HABITUAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitual-dev")
            } else {
                base_dir.join("habitual")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::PeriodicityRule;

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let habit = Habit::new("Read", "", PeriodicityRule::daily()).unwrap();
        store.save(&[habit.clone()]).unwrap();
        assert_eq!(store.saves(), 1);
        assert_eq!(store.load().unwrap(), vec![habit]);
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn HabitStore> = Box::new(MemoryStore::new());
        store.save(&[]).unwrap();
        assert_eq!(store.describe(), "memory");
    }
}
