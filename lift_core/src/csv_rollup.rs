//! CSV rollup for archiving completion WAL files.
//!
//! A rollup holds the WAL's sidecar lock from the first read to the final
//! rename, so appends wait for it and land in a fresh WAL afterwards.

use crate::wal::WalLock;
use crate::{CompletionRecord, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A row in the completions CSV. Ad-hoc workouts leave `day_order` blank.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    id: String,
    routine_id: String,
    day_order: Option<u32>,
    completed_at: String,
}

impl From<&CompletionRecord> for CsvRow {
    fn from(record: &CompletionRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            routine_id: record.routine_id.to_string(),
            day_order: record.day_order,
            completed_at: record.completed_at.to_rfc3339(),
        }
    }
}

impl TryFrom<CsvRow> for CompletionRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("Invalid UUID: {}", e)))?;
        let routine_id = Uuid::parse_str(&row.routine_id)
            .map_err(|e| Error::Other(format!("Invalid routine UUID: {}", e)))?;
        let completed_at = DateTime::parse_from_rfc3339(&row.completed_at)
            .map_err(|e| Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(CompletionRecord {
            id,
            routine_id,
            day_order: row.day_order,
            completed_at,
        })
    }
}

/// Roll up WAL completions into CSV and archive the WAL
///
/// This function:
/// 1. Locks the WAL against appenders
/// 2. Reads all completions from it
/// 3. Appends them to the CSV file (creates with headers if needed)
/// 4. Syncs the CSV to disk
/// 5. Renames the WAL to a uniquely named `.processed` archive
///
/// Returns the number of completions rolled up. Archives are kept rather than
/// deleted so they can be recovered by hand; see [`cleanup_processed_wals`].
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let _guard = WalLock::acquire(wal_path)?;

    let records = crate::wal::read_completions(wal_path)?;

    if records.is_empty() {
        tracing::info!("No completions in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Only a fresh file gets a header row
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} completions to CSV", records.len());

    let processed_path = archive_path(wal_path);
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(records.len())
}

/// `completions.wal` → `completions.wal.<utc timestamp>.processed`, never an
/// existing file
fn archive_path(wal_path: &Path) -> PathBuf {
    let name = wal_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%9fZ").to_string();

    let mut candidate = wal_path.with_file_name(format!("{}.{}.processed", name, stamp));
    let mut attempt = 1;
    while candidate.exists() {
        candidate = wal_path.with_file_name(format!("{}.{}-{}.processed", name, stamp, attempt));
        attempt += 1;
    }
    candidate
}

/// Read every completion archived in a CSV file
///
/// Rows that fail to parse are skipped with a warning.
pub fn read_completions_csv(path: &Path) -> Result<Vec<CompletionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match CompletionRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    Ok(records)
}

/// Remove archived WALs (`*.processed`) from the given directory
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed WAL: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
