//! Well-known filesystem locations

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Name of the local config directory under the home directory.
pub const CLAUDE_DIR_NAME: &str = ".claude";
/// Name of the extra top-level config file under the home directory.
pub const CLAUDE_JSON_NAME: &str = ".claude.json";
/// Repository-relative logical name of the extra top-level config file.
pub const CLAUDE_JSON_REPO_NAME: &str = "claude.json";
/// Name of the sync-state directory under the home directory.
pub const SYNC_DIR_NAME: &str = ".claude-sync";

/// Every location the tool reads or writes, derived from one home
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Base directory everything else is derived from
    pub home: PathBuf,
    /// `~/.claude`
    pub claude_dir: PathBuf,
    /// `~/.claude.json`
    pub claude_json: PathBuf,
    /// `~/.claude-sync`
    pub sync_dir: PathBuf,
    /// `~/.claude-sync/config.yaml`
    pub config_file: PathBuf,
    /// `~/.claude-sync/identity.key`
    pub key_file: PathBuf,
    /// `~/.claude-sync/repo`
    pub repo_dir: PathBuf,
    /// `~/.claude-sync/backups`
    pub backup_dir: PathBuf,
    /// `~/.claude-sync/.lock` (reserved)
    pub lock_file: PathBuf,
}

impl ConfigPaths {
    /// Derive the layout from `home`.
    pub fn from_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        let sync_dir = home.join(SYNC_DIR_NAME);

        Self {
            claude_dir: home.join(CLAUDE_DIR_NAME),
            claude_json: home.join(CLAUDE_JSON_NAME),
            config_file: sync_dir.join("config.yaml"),
            key_file: sync_dir.join("identity.key"),
            repo_dir: sync_dir.join("repo"),
            backup_dir: sync_dir.join("backups"),
            lock_file: sync_dir.join(".lock"),
            sync_dir,
            home,
        }
    }

    /// Layout under the current user's home directory.
    pub fn discover() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::io(
                "~",
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine home directory",
                ),
            )
        })?;
        Ok(Self::from_home(home))
    }

    /// Whether a key file exists.
    pub fn is_initialized(&self) -> bool {
        self.key_file.exists()
    }

    /// The local config directory as the placeholder translator sees it.
    pub fn claude_dir_str(&self) -> String {
        self.claude_dir.to_string_lossy().to_string()
    }
}
