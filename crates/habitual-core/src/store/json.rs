//! JSON habit file.
//!
//! The file holds a JSON array with one object per habit. Legacy files
//! load as well; see [`HabitRecord`](crate::habit::HabitRecord).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{data_dir, HabitStore, HABITS_FILE};
use crate::error::{Result, StoreError};
use crate::habit::Habit;

/// Storage backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `habits.json` in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join(HABITS_FILE)))
    }

    /// Get the habits file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HabitStore for JsonFileStore {
    /// A missing or blank file is an empty habit list. Anything else that
    /// fails to decode is reported, never replaced.
    fn load(&self) -> Result<Vec<Habit>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no habit file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e).into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let habits: Vec<Habit> =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(habits)
    }

    /// Writes to a sibling temp file first and renames it over the target.
    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(habits)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
