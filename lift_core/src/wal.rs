//! Append-only log of completed workouts.
//!
//! Each completion is one JSON line. Writers and the CSV rollup coordinate
//! through an exclusive lock on a sidecar file (`<wal>.lock`) rather than on
//! the WAL itself, because the rollup renames the WAL away: a lock held on
//! the WAL handle would not stop an appender that opened the old path.

use crate::{CompletionRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink for recording completed workouts
pub trait CompletionSink {
    fn append(&mut self, record: &CompletionRecord) -> Result<()>;
}

/// Exclusive hold on a WAL's sidecar lock file, released on drop
pub struct WalLock {
    file: File,
    path: PathBuf,
}

impl WalLock {
    /// Block until no other appender or rollup holds the WAL at `wal_path`
    pub fn acquire(wal_path: &Path) -> Result<Self> {
        let path = lock_path(wal_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(Self { file, path })
    }
}

impl Drop for WalLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release WAL lock {:?}: {}", self.path, e);
        }
    }
}

/// `completions.wal` locks through `completions.wal.lock`
fn lock_path(wal_path: &Path) -> PathBuf {
    let mut name = wal_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    wal_path.with_file_name(name)
}

/// JSONL completion log at a fixed path
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompletionSink for JsonlSink {
    fn append(&mut self, record: &CompletionRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;

        // Held until the line is on disk, so a rollup cannot archive the
        // file between our open and our write.
        let _guard = WalLock::acquire(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Readers take a shared lock on the WAL itself
        file.lock_exclusive()?;
        let written = writeln!(file, "{}", line).and_then(|_| file.sync_data());
        file.unlock()?;
        written?;

        tracing::debug!(
            "Appended completion {} (day {:?}) to {:?}",
            record.id,
            record.day_order,
            self.path
        );
        Ok(())
    }
}

/// Read all completions from a WAL file
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_completions(path: &Path) -> Result<Vec<CompletionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CompletionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse completion at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} completions from WAL", records.len());
    Ok(records)
}
