pub mod analyze;
pub mod check;
pub mod completions;
pub mod config;
pub mod habit;
pub mod period;

use chrono::NaiveDate;
use habitual_core::{Config, HabitRepository, HabitStore};

pub type Repository = HabitRepository<Box<dyn HabitStore>>;

/// Open the habit repository described by the config file.
pub fn open_repository() -> Result<Repository, habitual_core::CoreError> {
    let config = Config::load()?;
    let store = config.open_store()?;
    tracing::debug!(store = %store.describe(), policy = %config.streak.gap_policy, "opening habits");
    HabitRepository::open_with(store, config.evaluator())
}

/// Local calendar date; the core never reads the clock itself.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
