//! Storage layer for tt
//!
//! All state lives in a single user-scoped data directory:
//!
//! ```text
//! <data dir>/              # platform data dir for "tt", or --dir/TT_DIR
//!   tasks.json             # live tasks, one flat JSON array
//!   archive.json           # archived tasks
//!   config.toml            # optional user configuration
//!   .disabled              # sentinel: mutating commands are refused
//!   tasks.json.lock        # advisory lock file
//! ```
//!
//! The whole document is the unit of persistence. Reads degrade to an
//! empty list when a file is missing or unreadable as JSON; writes go
//! through the atomic temp-then-rename path and always replace the file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::lock::{self, DocumentLock, LOCK_WAIT};
use crate::task::{ArchivedTask, Task};

/// Live task document
pub const TASKS_FILE: &str = "tasks.json";

/// Archived task document
pub const ARCHIVE_FILE: &str = "archive.json";

/// Optional user configuration
pub const CONFIG_FILE: &str = "config.toml";

/// Sentinel marking the store as disabled
pub const DISABLED_FLAG: &str = ".disabled";

/// Storage manager for the tt data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

/// Informational body of the `.disabled` marker
///
/// Presence of the file is the contract; the body exists for humans
/// poking at the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisabledMarker {
    pub disabled_at: DateTime<Utc>,
    pub reason: String,
}

impl Storage {
    /// Create a storage manager rooted at the given directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit override first, then the
    /// platform-specific data dir for "tt"
    pub fn resolve(dir_override: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = dir_override {
            return Ok(Self::new(dir));
        }

        let dirs = directories::ProjectDirs::from("", "", "tt").ok_or(Error::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn archive_file(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn disabled_flag(&self) -> PathBuf {
        self.data_dir.join(DISABLED_FLAG)
    }

    /// Create the data directory if it does not exist
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    // =========================================================================
    // Task documents
    // =========================================================================

    /// Acquire the exclusive lock guarding task mutations
    ///
    /// Hold the returned guard across the read-modify-write; it releases
    /// on drop.
    pub fn lock_tasks(&self) -> Result<DocumentLock> {
        DocumentLock::acquire(&self.tasks_file(), LOCK_WAIT)
    }

    /// Read the live task list; missing or corrupt files read as empty
    pub fn read_tasks(&self) -> Result<Vec<Task>> {
        self.read_document(&self.tasks_file())
    }

    /// Replace the live task list on disk
    pub fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write_document(&self.tasks_file(), tasks)
    }

    /// Read the archive; missing or corrupt files read as empty
    pub fn read_archive(&self) -> Result<Vec<ArchivedTask>> {
        self.read_document(&self.archive_file())
    }

    /// Replace the archive on disk
    pub fn write_archive(&self, tasks: &[ArchivedTask]) -> Result<()> {
        self.write_document(&self.archive_file(), tasks)
    }

    fn read_document<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Error::Io(err)),
        };

        match serde_json::from_str(&content) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(path = %path.display(), %err, "unreadable task document, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write_document<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        self.init()?;
        let json = serde_json::to_string_pretty(records)?;
        lock::replace_file(path, json.as_bytes())
    }

    // =========================================================================
    // Lifecycle marker
    // =========================================================================

    /// Whether the disabled sentinel is present
    pub fn is_disabled(&self) -> bool {
        self.disabled_flag().exists()
    }

    /// Best-effort read of the recorded disable reason
    pub fn disabled_reason(&self) -> Option<String> {
        let content = fs::read_to_string(self.disabled_flag()).ok()?;
        let marker: DisabledMarker = serde_json::from_str(&content).ok()?;
        Some(marker.reason)
    }

    /// Create (or refresh) the disabled sentinel
    pub fn disable(&self, reason: Option<String>) -> Result<DisabledMarker> {
        self.init()?;
        let marker = DisabledMarker {
            disabled_at: Utc::now(),
            reason: reason.unwrap_or_else(|| "manually disabled".to_string()),
        };
        let json = serde_json::to_string_pretty(&marker)?;
        lock::replace_file(&self.disabled_flag(), json.as_bytes())?;
        Ok(marker)
    }

    /// Remove the disabled sentinel; returns whether it was present
    pub fn enable(&self) -> Result<bool> {
        let flag = self.disabled_flag();
        if !flag.exists() {
            return Ok(false);
        }
        fs::remove_file(&flag)?;
        Ok(true)
    }

    /// Remove the entire data directory
    ///
    /// Best effort: failure is reported as `false`, never raised. A
    /// directory that is already gone counts as success.
    pub fn uninstall(&self) -> bool {
        if !self.data_dir.is_dir() {
            return true;
        }
        match fs::remove_dir_all(&self.data_dir) {
            Ok(()) => true,
            Err(err) => {
                warn!(dir = %self.data_dir.display(), %err, "failed to remove data directory");
                false
            }
        }
    }
}
