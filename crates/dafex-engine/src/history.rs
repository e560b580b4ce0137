//! Capped, persisted per-workflow activity log.
//!
//! Each workflow owns an independent key-space holding one serialized
//! sequence, overwritten wholesale on every append. The backing store is a
//! port so tests run in memory while the CLI persists to disk.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use dafex_core::HistoryEntry;

/// Maximum entries kept per workflow key.
pub const HISTORY_CAP: usize = 25;

/// Key-space of the date-range workflow.
pub const KEY_EXTRATOS: &str = "historico_extratos";
/// Key-space of the 12-month workflow.
pub const KEY_EXTRATOS_12M: &str = "historico_extratos_12m";
/// Key-space of the INEX workflow.
pub const KEY_INEX: &str = "historico_inex";

/// Key/value persistence port backing the history log.
pub trait HistoryStore: Send + Sync {
    /// Reads the serialized sequence stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the store cannot be read.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Overwrites the serialized sequence stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the store cannot be written.
    fn save(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One JSON file per key under a base directory; survives across sessions.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl HistoryStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// Append-only capped log over one workflow's key-space.
///
/// The only writer runs strictly after a confirmed success, and submissions
/// are serialized per workflow, so appends never race.
pub struct HistoryLog {
    store: Arc<dyn HistoryStore>,
    key: &'static str,
}

impl HistoryLog {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    /// Entries as currently persisted, most recent first.
    ///
    /// Absent, unreadable or corrupt stored data reads as an empty list,
    /// never as an error surfaced to the user.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.load(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "history store unreadable");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Head-inserts `entry`, truncates to [`HISTORY_CAP`] and overwrites the
    /// stored sequence.
    ///
    /// Best-effort: a failing store must never undo the completed
    /// generation, so write errors are logged and swallowed.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries();
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAP);
        match serde_json::to_string(&entries) {
            Ok(raw) => {
                if let Err(err) = self.store.save(self.key, &raw) {
                    tracing::warn!(key = self.key, error = %err, "history store write failed");
                }
            }
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "history serialization failed");
            }
        }
    }

    /// One display line per entry, most recent first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries().iter().map(HistoryEntry::display_line).collect()
    }
}
