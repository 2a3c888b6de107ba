//! # Habitual Core Library
//!
//! This library provides the core logic for the habitual habit tracker.
//! Every operation is reachable from the standalone `habitual` CLI binary,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Periods**: calendar bucketing of dates into daily, Monday-based weekly,
//!   monthly and yearly periods
//! - **Streaks**: a pure evaluator over a completion history, plus an
//!   incremental tracker that agrees with it
//! - **Storage**: JSON file or SQLite habit stores and TOML configuration
//!
//! ## Key Components
//!
//! - [`period_start`]: Period resolver
//! - [`StreakEvaluator`]: Streak computation over a completion history
//! - [`HabitRepository`]: Habit lifecycle over a [`HabitStore`]
//! - [`Config`]: Application configuration management

pub mod analysis;
pub mod completion;
pub mod config;
pub mod error;
pub mod habit;
pub mod period;
pub mod repository;
pub mod rule;
pub mod store;
pub mod streak;

pub use analysis::{BestStreak, HabitAnalysis, HabitSummary};
pub use completion::{format_date, parse_date, CompletionLog, DATE_FORMAT};
pub use config::{Config, StorageBackend};
pub use error::{
    ConfigError, CoreError, InvalidDateError, InvalidRuleError, Result, StoreError,
    ValidationError,
};
pub use habit::{CheckOff, Habit, HabitEdit, HabitId, HabitRecord};
pub use period::{is_adjacent, next_period_start, period_start, same_period, PeriodKind};
pub use repository::HabitRepository;
pub use rule::PeriodicityRule;
pub use store::{data_dir, HabitStore, JsonFileStore, MemoryStore, SqliteStore};
pub use streak::{evaluate, GapPolicy, IncrementalStreak, StreakEvaluator, StreakState};
