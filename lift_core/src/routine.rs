//! Active routine persistence with file locking.
//!
//! A routine is a saved workout plan whose days are numbered 1..N. This
//! module turns plans into routines and stores the active one on disk with
//! proper file locking to prevent concurrent access issues.

use crate::{Error, Result, RoutineDay, SplitArchetype, WorkoutPlan};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A persisted training routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub archetype: SplitArchetype,
    pub created_at: DateTime<Utc>,
    pub days: Vec<RoutineDay>,
}

impl Routine {
    /// Build a routine from a generated plan, numbering days from 1 in plan order
    pub fn from_plan(plan: &WorkoutPlan, created_at: DateTime<Utc>) -> Self {
        let days = plan
            .workout_days
            .iter()
            .zip(1u32..)
            .map(|(day, order)| RoutineDay {
                id: Uuid::new_v4(),
                day_order: order,
                name: day.name.clone(),
                exercises: day.exercises.clone(),
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            name: format!("{} ({} days/week)", plan.archetype, plan.days_per_week),
            archetype: plan.archetype,
            created_at,
            days,
        }
    }

    /// Check that day orders are exactly 1..=N with no gaps or duplicates
    pub fn check_day_orders(&self) -> Result<()> {
        let mut orders: Vec<u32> = self.days.iter().map(|d| d.day_order).collect();
        orders.sort_unstable();

        for (expected, actual) in (1u32..).zip(&orders) {
            if expected != *actual {
                return Err(Error::MalformedRoutine(format!(
                    "routine '{}' has day orders {:?}, expected 1..={}",
                    self.name,
                    orders,
                    orders.len()
                )));
            }
        }
        Ok(())
    }
}

/// Source of the user's active routine
pub trait RoutinePersistence {
    fn active_routine(&self) -> Result<Option<Routine>>;
}

/// JSON file holding the active routine
pub struct RoutineStore {
    path: PathBuf,
}

impl RoutineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the routine with shared locking
    ///
    /// Returns `None` if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns `None`.
    pub fn load(&self) -> Result<Option<Routine>> {
        let path = self.path.as_path();
        if !path.exists() {
            tracing::info!("No routine file found at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open routine file {:?}: {}", path, e);
                return Ok(None);
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock routine file {:?}: {}", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read routine file {:?}: {}", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<Routine>(&contents) {
            Ok(routine) => {
                tracing::debug!("Loaded routine {} from {:?}", routine.id, path);
                Ok(Some(routine))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse routine file {:?}: {}. Treating as no routine.",
                    path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Save the routine with exclusive locking, replacing any previous one
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    ///
    /// Routines with non-contiguous day orders are rejected.
    pub fn save(&self, routine: &Routine) -> Result<()> {
        routine.check_day_orders()?;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::State("routine path missing parent".into()))?;
        std::fs::create_dir_all(parent)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(routine)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved routine {} to {:?}", routine.id, self.path);
        Ok(())
    }
}

impl RoutinePersistence for RoutineStore {
    fn active_routine(&self) -> Result<Option<Routine>> {
        self.load()
    }
}
