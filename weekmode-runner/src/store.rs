//! Mode store: the persisted weekly mode history.
//!
//! The store is injected into the pipeline through the [`ModeStore`] trait.
//! Two implementations:
//! - [`JsonFileStore`]: a human-readable JSON array on disk. Every write
//!   rewrites the whole file. The file must exist before the first run
//!   (`JsonFileStore::init` creates an empty one).
//! - [`MemoryStore`]: in-memory fake for tests.
//!
//! There is no locking. Two processes writing the same file race.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use weekmode_core::ModeRecord;

/// Errors from reading or writing the mode history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mode store '{}' does not exist (run `weekmode init` first)", path.display())]
    Missing { path: PathBuf },

    #[error("mode store '{}' already exists (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("mode store '{}' is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error on mode store '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize mode history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How new records meet records already stored for the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Always append. Re-running over an overlapping range duplicates dates.
    #[default]
    Append,
    /// Replace the record with the same date in place, append otherwise.
    Upsert,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Ordered, append-mostly sequence of mode records.
pub trait ModeStore {
    /// Read the whole history, in stored order.
    fn load(&self) -> Result<Vec<ModeRecord>, StoreError>;

    /// Add a record at the end.
    fn append(&mut self, record: ModeRecord) -> Result<(), StoreError>;

    /// Replace the last record with the same date, or append if there is none.
    fn upsert(&mut self, record: ModeRecord) -> Result<UpsertOutcome, StoreError>;
}

/// Apply an upsert to an in-memory history.
fn upsert_into(records: &mut Vec<ModeRecord>, record: ModeRecord) -> UpsertOutcome {
    match records.iter().rposition(|r| r.date == record.date) {
        Some(pos) => {
            records[pos] = record;
            UpsertOutcome::Replaced
        }
        None => {
            records.push(record);
            UpsertOutcome::Inserted
        }
    }
}

/// JSON array file store.
///
/// Format: `[{"date": "2024-03-08", "mode": "aggressive"}, ...]`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open an existing store file. The file itself is only read on `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create an empty store file. Refuses to overwrite unless `force`.
    pub fn init(path: impl Into<PathBuf>, force: bool) -> Result<Self, StoreError> {
        let store = Self::new(path);
        if store.path.exists() && !force {
            return Err(StoreError::AlreadyExists { path: store.path });
        }
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: store.path.clone(),
                    source,
                })?;
            }
        }
        store.write_all(&[])?;
        log::info!("initialised empty mode store at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[ModeRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ModeStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ModeRecord>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing {
                    path: self.path.clone(),
                })
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn append(&mut self, record: ModeRecord) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record);
        self.write_all(&records)
    }

    fn upsert(&mut self, record: ModeRecord) -> Result<UpsertOutcome, StoreError> {
        let mut records = self.load()?;
        let outcome = upsert_into(&mut records, record);
        self.write_all(&records)?;
        Ok(outcome)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ModeRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ModeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ModeRecord] {
        &self.records
    }
}

impl ModeStore for MemoryStore {
    fn load(&self) -> Result<Vec<ModeRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn append(&mut self, record: ModeRecord) -> Result<(), StoreError> {
        self.records.push(record);
        Ok(())
    }

    fn upsert(&mut self, record: ModeRecord) -> Result<UpsertOutcome, StoreError> {
        Ok(upsert_into(&mut self.records, record))
    }
}
