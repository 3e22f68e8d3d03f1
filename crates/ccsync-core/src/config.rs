//! User configuration (`config.yaml`)
//!
//! Loaded through [`ConfigStore`], so the format follows the file
//! extension. A missing file yields the defaults; empty pattern lists and a
//! zero backup count in a present file are replaced by their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use ccsync_fs::ConfigStore;

use crate::Result;
use crate::classify::PatternSet;

/// Files encrypted before they leave the machine.
pub const DEFAULT_ENCRYPT_PATTERNS: &[&str] = &[
    "settings.json",
    "settings.local.json",
    "claude.json",
    ".credentials.json",
    "client_secret_*.json",
    "skills/*/resources/*",
];

/// Files and directories never synced.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    // Directories
    "plans",
    "projects",
    "local",
    "statsig",
    "todos",
    "debug",
    "file-history",
    "ide",
    "plugins",
    "shell-snapshots",
    "telemetry",
    "sessionStorage",
    // Files
    "history.jsonl",
    "stats-cache.json",
    "*.log",
    "*.tmp",
    "*.cache",
    "*.local-backup-*",
    ".git",
];

/// Number of backup archives kept by default.
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Backup retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_count: usize,
}

/// Contents of the user configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encrypt_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,

    #[serde(default)]
    pub backup: BackupConfig,

    /// Remote URL given to `init`; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl SyncConfig {
    /// Configuration with every default filled in.
    pub fn with_defaults() -> Self {
        let mut config = Self::default();
        config.merge_defaults();
        config
    }

    /// Load the configuration at `path`, merged with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_raw(path)?;
        config.merge_defaults();
        Ok(config)
    }

    /// Load the configuration as written, without defaults.
    ///
    /// A missing file yields an empty configuration.
    pub fn load_raw(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Ok(ConfigStore::new().load(path)?)
    }

    /// Write the configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    /// Set or clear the remembered remote URL in the file at `path`,
    /// leaving every other setting as written.
    pub fn update_remote_url(path: &Path, url: Option<&str>) -> Result<()> {
        let mut config = Self::load_raw(path)?;
        config.remote_url = url.map(str::to_string);
        config.save(path)
    }

    /// Replace empty settings with their defaults.
    pub fn merge_defaults(&mut self) {
        if self.encrypt_patterns.is_empty() {
            self.encrypt_patterns = to_owned(DEFAULT_ENCRYPT_PATTERNS);
        }
        if self.exclude_patterns.is_empty() {
            self.exclude_patterns = to_owned(DEFAULT_EXCLUDE_PATTERNS);
        }
        if self.backup.max_count == 0 {
            self.backup.max_count = DEFAULT_MAX_BACKUPS;
        }
    }

    /// The classifier's view of this configuration.
    pub fn pattern_set(&self) -> PatternSet {
        PatternSet::new(self.encrypt_patterns.clone(), self.exclude_patterns.clone())
    }

    pub fn max_backups(&self) -> usize {
        self.backup.max_count
    }
}

fn to_owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| p.to_string()).collect()
}
