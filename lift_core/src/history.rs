//! Completion history lookup across WAL and CSV archives.
//!
//! The scheduler only needs the single most recent completion for the
//! active routine; this module finds it in whichever file holds it.

use crate::{CompletionRecord, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use uuid::Uuid;

/// Source of past completions
pub trait CompletionHistory {
    /// Most recent completion (by `completed_at`) recorded against `routine_id`
    fn last_completion(&self, routine_id: Uuid) -> Result<Option<CompletionRecord>>;
}

/// History backed by the completion WAL and its CSV rollup
pub struct FileHistory {
    wal_path: PathBuf,
    csv_path: PathBuf,
}

impl FileHistory {
    pub fn new(wal_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            wal_path: wal_path.into(),
            csv_path: csv_path.into(),
        }
    }

    /// Load every completion for a routine, newest first
    ///
    /// Records present in both the WAL and the CSV are returned once.
    pub fn completions_for(&self, routine_id: Uuid) -> Result<Vec<CompletionRecord>> {
        let mut seen_ids = HashSet::new();
        let mut records = Vec::new();

        // WAL before CSV: a rollup copies into the CSV before renaming the WAL,
        // so every record is in at least one of the two reads.
        let wal_records = crate::wal::read_completions(&self.wal_path)?;
        let csv_records = crate::csv_rollup::read_completions_csv(&self.csv_path)?;
        tracing::debug!(
            "Loaded {} completions from WAL, {} from CSV",
            wal_records.len(),
            csv_records.len()
        );

        for record in wal_records.into_iter().chain(csv_records) {
            if record.routine_id == routine_id && seen_ids.insert(record.id) {
                records.push(record);
            }
        }

        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(records)
    }
}

impl CompletionHistory for FileHistory {
    fn last_completion(&self, routine_id: Uuid) -> Result<Option<CompletionRecord>> {
        let last = self.completions_for(routine_id)?.into_iter().next();
        match &last {
            Some(record) => tracing::info!(
                "Last completion for routine {}: day {:?} at {}",
                routine_id,
                record.day_order,
                record.completed_at
            ),
            None => tracing::info!("No completions recorded for routine {}", routine_id),
        }
        Ok(last)
    }
}
