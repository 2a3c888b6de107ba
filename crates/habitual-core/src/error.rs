//! Core error types for habitual-core.
//!
//! The streak engine itself never fails on validated input. Errors surface at
//! the boundaries: parsing dates, constructing rules, loading and saving
//! habits, and reading configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::period::PeriodKind;

/// Core error type for habitual-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A date string could not be parsed
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),

    /// A periodicity rule was rejected
    #[error(transparent)]
    InvalidRule(#[from] InvalidRuleError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string that is not a `YYYY-MM-DD` calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date '{input}': {reason} (expected YYYY-MM-DD)")]
pub struct InvalidDateError {
    pub input: String,
    pub reason: String,
}

/// Periodicity rule errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRuleError {
    /// Kind string outside daily/weekly/monthly/yearly
    #[error("Unknown periodicity kind '{0}' (expected daily, weekly, monthly or yearly)")]
    UnknownKind(String),

    /// Required count outside `[1, max]` for the kind
    #[error("{kind} habits need between 1 and {max} completions per period, got {got}")]
    RequiredOutOfRange { kind: PeriodKind, got: u32, max: u32 },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the SQLite database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Habit file exists but cannot be decoded
    #[error("Habit file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Failed to read or write a habit file
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key not present in the configuration schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Configuration file is not valid TOML for the schema
    #[error("Failed to parse configuration {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Data directory could not be determined or created
    #[error("Failed to access data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name empty after trimming
    #[error("Habit name must not be empty")]
    EmptyName,

    /// Another habit already uses the name
    #[error("A habit named '{0}' already exists")]
    DuplicateName(String),

    /// No habit matches the selector
    #[error("Habit not found: {0}")]
    NotFound(String),

    /// Incremental tracker received a date not after the last one
    #[error("Completion {date} is not after the last recorded completion {last}")]
    OutOfOrder {
        date: chrono::NaiveDate,
        last: chrono::NaiveDate,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
