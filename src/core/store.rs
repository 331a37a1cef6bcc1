//! Persistence of the derived progress caches
//!
//! The evaluator hands each freshly computed cache to a [`ProgressStore`].
//! Writes overwrite whatever was stored for the student before.

use crate::core::aggregator::AcademicProgress;
use crate::core::eligibility::EligibilitySnapshot;
use logger::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored record could not be (de)serialized
    #[error("Malformed progress record: {0}")]
    Json(#[from] serde_json::Error),

    /// Student identifier cannot be used as a record key
    #[error("Invalid student id '{0}'")]
    InvalidUid(String),
}

/// Caches stored for one student
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Last credit cache
    #[serde(default)]
    pub academic_progress: Option<AcademicProgress>,
    /// Last eligibility cache
    #[serde(default)]
    pub eligibility_snapshot: Option<EligibilitySnapshot>,
}

/// Backend for the derived caches
pub trait ProgressStore {
    /// Overwrite the stored credit cache of a student
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the record
    fn save_progress(&mut self, uid: &str, progress: &AcademicProgress) -> Result<(), StoreError>;

    /// Overwrite the stored eligibility cache of a student
    ///
    /// # Errors
    /// Returns an error if the backend cannot persist the record
    fn save_snapshot(&mut self, uid: &str, snapshot: &EligibilitySnapshot) -> Result<(), StoreError>;

    /// Stored caches of a student, `None` if nothing was ever saved
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be read
    fn load(&self, uid: &str) -> Result<Option<StoredRecord>, StoreError>;
}

/// Stores one pretty-printed JSON file per student under a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a student's record, `<dir>/<uid_file_stem(uid)>.json`
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidUid`] for an empty id
    pub fn path_for(&self, uid: &str) -> Result<PathBuf, StoreError> {
        let stem = uid_file_stem(uid).ok_or_else(|| StoreError::InvalidUid(uid.to_string()))?;
        Ok(self.dir.join(format!("{stem}.json")))
    }

    fn update(&self, uid: &str, apply: impl FnOnce(&mut StoredRecord)) -> Result<(), StoreError> {
        let mut record = match self.load(uid) {
            Ok(record) => record.unwrap_or_default(),
            Err(StoreError::Json(e)) => {
                warn!("Discarding malformed progress record for '{uid}': {e}");
                StoredRecord::default()
            }
            Err(e) => return Err(e),
        };
        apply(&mut record);

        let path = self.path_for(uid)?;
        let contents = serde_json::to_string_pretty(&record)?;
        write_atomic(&path, contents.as_bytes())
    }
}

/// File stem for a student id, `None` if the id is blank.
///
/// Lowercase ASCII letters, digits, `-` and `_` are kept; every other byte
/// of the UTF-8 form becomes `%XX`. Distinct ids always get distinct stems,
/// also on case-insensitive filesystems.
#[must_use]
pub fn uid_file_stem(uid: &str) -> Option<String> {
    if uid.trim().is_empty() {
        return None;
    }

    let mut stem = String::with_capacity(uid.len());
    for byte in uid.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => stem.push(char::from(byte)),
            _ => {
                let _ = write!(stem, "%{byte:02X}");
            }
        }
    }
    Some(stem)
}

/// Write through a sibling temp file and rename it over `path`
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, data).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ProgressStore for JsonFileStore {
    fn save_progress(&mut self, uid: &str, progress: &AcademicProgress) -> Result<(), StoreError> {
        self.update(uid, |record| record.academic_progress = Some(progress.clone()))
    }

    fn save_snapshot(&mut self, uid: &str, snapshot: &EligibilitySnapshot) -> Result<(), StoreError> {
        self.update(uid, |record| record.eligibility_snapshot = Some(snapshot.clone()))
    }

    fn load(&self, uid: &str) -> Result<Option<StoredRecord>, StoreError> {
        let path = self.path_for(uid)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io { path, source })?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, StoredRecord>,
    /// Number of successful writes
    pub writes: usize,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn save_progress(&mut self, uid: &str, progress: &AcademicProgress) -> Result<(), StoreError> {
        self.records.entry(uid.to_string()).or_default().academic_progress = Some(progress.clone());
        self.writes += 1;
        Ok(())
    }

    fn save_snapshot(&mut self, uid: &str, snapshot: &EligibilitySnapshot) -> Result<(), StoreError> {
        self.records.entry(uid.to_string()).or_default().eligibility_snapshot = Some(snapshot.clone());
        self.writes += 1;
        Ok(())
    }

    fn load(&self, uid: &str) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self.records.get(uid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::CategoryBreakdown;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn progress(earned: u32) -> AcademicProgress {
        AcademicProgress {
            earned_credits: earned,
            remaining_credits: 125 - earned,
            category_progress: CategoryBreakdown::default(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_path_for_sanitizes() {
        let store = JsonFileStore::new("/tmp/store");
        let path = store.path_for("s/123 x").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/store/s%2F123%20x.json"));
        assert!(store.path_for("  ").is_err());
    }

    #[test]
    fn test_file_stem_is_unique_per_uid() {
        let stems: Vec<String> = ["s.1", "s_1", "s/1", "S_1", "s%2E1"]
            .iter()
            .map(|uid| uid_file_stem(uid).unwrap())
            .collect();
        assert_eq!(stems, vec!["s%2E1", "s_1", "s%2F1", "%53_1", "s%252E1"]);
        assert_eq!(uid_file_stem("s1001").as_deref(), Some("s1001"));
        assert!(uid_file_stem("").is_none());
    }

    #[test]
    fn test_save_replaces_malformed_record() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        fs::write(dir.path().join("s1.json"), "{ truncated").unwrap();

        store.save_progress("s1", &progress(9)).unwrap();

        let record = store.load("s1").unwrap().unwrap();
        assert_eq!(record.academic_progress.unwrap().earned_credits, 9);
        assert!(!dir.path().join("s1.json.tmp").exists());
    }

    #[test]
    fn test_json_store_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("progress"));

        assert!(store.load("s1").unwrap().is_none());
        store.save_progress("s1", &progress(10)).unwrap();
        store.save_progress("s1", &progress(20)).unwrap();

        let record = store.load("s1").unwrap().unwrap();
        assert_eq!(record.academic_progress.unwrap().earned_credits, 20);
        assert!(record.eligibility_snapshot.is_none());
    }

    #[test]
    fn test_json_store_keeps_other_cache() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let snapshot = EligibilitySnapshot {
            checked_at: Utc::now(),
            verdicts: BTreeMap::new(),
        };

        store.save_progress("s1", &progress(3)).unwrap();
        store.save_snapshot("s1", &snapshot).unwrap();

        let record = store.load("s1").unwrap().unwrap();
        assert!(record.academic_progress.is_some());
        assert_eq!(record.eligibility_snapshot, Some(snapshot));
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(dir.path().join("s1.json"), "not json").unwrap();

        assert!(matches!(store.load("s1"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.save_progress("s1", &progress(3)).unwrap();
        store.save_progress("s1", &progress(6)).unwrap();

        assert_eq!(store.writes, 2);
        assert_eq!(
            store.load("s1").unwrap().unwrap().academic_progress.unwrap().earned_credits,
            6
        );
        assert!(store.load("s2").unwrap().is_none());
    }
}
