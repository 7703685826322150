//! Snapshot persistence for the profile book
//!
//! Layout under the data directory:
//! ```text
//! studyloop/
//! ├── config.toml       # Optional planner configuration
//! └── profiles.json     # Full ProfileBook snapshot
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::profile::ProfileBook;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Where the planner reads its starting state and writes every change
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved book, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<ProfileBook>>;

    fn save(&self, book: &ProfileBook) -> Result<()>;
}

/// Stores the whole book as one pretty-printed JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studyloop"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<ProfileBook>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let book: ProfileBook = serde_json::from_str(&content)?;
        Ok(Some(book))
    }

    fn save(&self, book: &ProfileBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write next to the target, then swap, so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(book)?)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Keeps the last snapshot in memory, serialized the same way as on disk
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON of the last save
    pub fn raw(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<ProfileBook>> {
        match self.raw() {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, book: &ProfileBook) -> Result<()> {
        let json = serde_json::to_string(book)?;
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) = Some(json);
        Ok(())
    }
}
