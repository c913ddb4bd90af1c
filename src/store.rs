//! Progress persistence
//!
//! One JSON file holds the full ordered entry list plus the day-keyed insight
//! cache, wrapped in a versioned envelope. Progress data is best-effort: a
//! missing, corrupt, or unreadable file degrades to an empty envelope with a
//! warning, never an error to the caller.

use crate::error::EngineError;
use crate::types::{DailyScoreEntry, InsightCache};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current persisted envelope version
pub const STORE_VERSION: u32 = 1;

/// Versioned on-disk envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredProgress {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Newest-first
    #[serde(default)]
    pub entries: Vec<DailyScoreEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight_cache: Option<InsightCache>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

/// Storage seam for progress data.
///
/// `load` never fails: unreadable state degrades to the empty envelope.
pub trait EntryStore {
    fn load(&self) -> StoredProgress;
    fn save(&mut self, progress: &StoredProgress) -> Result<(), EngineError>;
}

/// File-backed store with atomic write-then-rename persistence
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntryStore for JsonFileStore {
    fn load(&self) -> StoredProgress {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return StoredProgress::default();
            }
            Err(e) => {
                warn!("progress store unreadable at {:?}: {e}; starting empty", self.path);
                return StoredProgress::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(progress) => progress,
            Err(e) => {
                warn!("progress store corrupt at {:?}: {e}; starting empty", self.path);
                StoredProgress::default()
            }
        }
    }

    fn save(&mut self, progress: &StoredProgress) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(progress)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoredProgress,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryStore for MemoryStore {
    fn load(&self) -> StoredProgress {
        self.state.clone()
    }

    fn save(&mut self, progress: &StoredProgress) -> Result<(), EngineError> {
        self.state = progress.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_entry(day: u32) -> DailyScoreEntry {
        DailyScoreEntry {
            sessions_completed: 1,
            score: 68,
            ..DailyScoreEntry::placeholder(NaiveDate::from_ymd_opt(2024, 3, day).unwrap())
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("progress.json"));

        let progress = StoredProgress {
            version: STORE_VERSION,
            entries: vec![make_entry(2), make_entry(1)],
            insight_cache: None,
        };
        store.save(&progress).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.version, STORE_VERSION);
        assert_eq!(loaded.entries, progress.entries);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));

        let loaded = store.load();
        assert!(loaded.entries.is_empty());
        assert!(loaded.insight_cache.is_none());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = JsonFileStore::new(&path).load();
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&StoredProgress::default()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_dates_persist_as_iso8601() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        let mut store = JsonFileStore::new(&path);
        store
            .save(&StoredProgress {
                version: STORE_VERSION,
                entries: vec![make_entry(5)],
                insight_cache: None,
            })
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("2024-03-05"));
    }
}
