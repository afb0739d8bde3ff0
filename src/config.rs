//! Configuration loading
//!
//! Reads `config.toml` from the data directory. A missing file means
//! defaults; a malformed file is a user error, not something to paper
//! over silently.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::CONFIG_FILE;
use crate::task::Priority;

/// User configuration for tt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Priority assigned to new tasks when `--priority` is not given
    #[serde(default = "default_priority")]
    pub default_priority: Priority,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
        }
    }
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        Ok(config)
    }

    /// Load `config.toml` from the data directory, or defaults when absent
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
