//! SQLite habit storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

use super::{data_dir, migrations, HabitStore, HABITS_DB};
use crate::error::{CoreError, Result, StoreError};
use crate::habit::{Habit, HabitRecord};

/// SQLite database for habit storage.
///
/// `save` rewrites both tables inside one transaction.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

type HabitRow = (
    String,
    String,
    String,
    String,
    u32,
    u32,
    u32,
    Option<String>,
);

impl SqliteStore {
    /// Open (and migrate) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.init()?;
        Ok(store)
    }

    /// `habits.db` in the data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?.join(HABITS_DB))
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init()?;
        Ok(store)
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(":memory:"))
    }

    fn completed_dates(&self, habit_id: &str) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM completions WHERE habit_id = ?1 ORDER BY date")?;
        let dates = stmt
            .query_map(params![habit_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }
}

impl HabitStore for SqliteStore {
    fn load(&self) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, specification, periodicity_kind, periodicity_count,
                    current_streak, longest_streak, created_at
             FROM habits
             ORDER BY position",
        )?;
        let rows: Vec<HabitRow> = stmt
            .query_map([], |row| -> rusqlite::Result<HabitRow> {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                    row.get(7)?,
                ))
            })?
            .collect::<Result<_, _>>()?;

        let mut habits = Vec::with_capacity(rows.len());
        for (id, name, specification, kind, count, current, longest, created_at) in rows {
            let created_at = created_at
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| StoreError::Corrupt {
                            path: self.location(),
                            message: format!("habit {id}: bad created_at '{raw}': {e}"),
                        })
                })
                .transpose()?;

            let record = HabitRecord {
                completed_dates: self.completed_dates(&id)?,
                id: Some(id),
                name,
                specification,
                periodicity_kind: kind,
                periodicity_count: count,
                periodicity_display: None,
                current_streak: current,
                longest_streak: longest,
                created_at,
            };
            habits.push(Habit::try_from(record)?);
        }
        Ok(habits)
    }

    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        let tx = self.conn.transaction().map_err(CoreError::from)?;
        tx.execute("DELETE FROM completions", [])?;
        tx.execute("DELETE FROM habits", [])?;

        for (position, habit) in habits.iter().enumerate() {
            let streak = habit.streak();
            tx.execute(
                "INSERT INTO habits (id, position, name, specification, periodicity_kind,
                                     periodicity_count, current_streak, longest_streak, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    habit.id().as_str(),
                    position as i64,
                    habit.name(),
                    habit.specification(),
                    habit.rule().kind().as_str(),
                    habit.rule().required_per_period(),
                    streak.current,
                    streak.longest,
                    habit.created_at().map(|dt| dt.to_rfc3339()),
                ],
            )?;

            let mut insert =
                tx.prepare_cached("INSERT INTO completions (habit_id, date) VALUES (?1, ?2)")?;
            for date in habit.completions().to_strings() {
                insert.execute(params![habit.id().as_str(), date])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::parse_date;
    use crate::period::PeriodKind;
    use crate::rule::PeriodicityRule;
    use crate::streak::StreakEvaluator;

    fn sample() -> Vec<Habit> {
        let eval = StreakEvaluator::default();
        let mut gym = Habit::new(
            "Gym",
            "Strength",
            PeriodicityRule::new(PeriodKind::Weekly, 2).unwrap(),
        )
        .unwrap();
        for day in ["2024-01-03", "2024-01-01", "2024-01-08"] {
            gym.check_off(parse_date(day).unwrap(), &eval);
        }
        let read = Habit::new("Read", "", PeriodicityRule::daily()).unwrap();
        vec![gym, read]
    }

    #[test]
    fn empty_database_loads_nothing() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.describe(), "sqlite::memory:");
    }

    #[test]
    fn save_then_load_roundtrips() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habits = sample();
        store.save(&habits).unwrap();
        assert_eq!(store.load().unwrap(), habits);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let mut store = SqliteStore::open_memory().unwrap();
        let habits = sample();
        store.save(&habits).unwrap();
        store.save(&habits[1..]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "Read");

        let orphaned: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habits.db");
        let habits = sample();
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save(&habits).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), habits);
    }
}
