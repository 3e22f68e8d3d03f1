//! [`TestHome`]: a temporary home directory for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::git;

/// A temporary home directory with the sync tool's layout:
///
/// ```text
/// <home>/.claude/            local config directory
/// <home>/.claude.json        extra top-level config file
/// <home>/.claude-sync/       sync state (key, config, repo/, backups/)
/// ```
///
/// Nothing is created until a helper asks for it.
pub struct TestHome {
    temp_dir: TempDir,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create an empty temporary home.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The home directory itself.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn claude_dir(&self) -> PathBuf {
        self.root().join(".claude")
    }

    pub fn claude_json(&self) -> PathBuf {
        self.root().join(".claude.json")
    }

    pub fn sync_dir(&self) -> PathBuf {
        self.root().join(".claude-sync")
    }

    pub fn repo_dir(&self) -> PathBuf {
        self.sync_dir().join("repo")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.sync_dir().join("backups")
    }

    /// Write `content` to `rel` inside the local config directory.
    pub fn write_local(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_under(&self.claude_dir(), rel, content.as_ref())
    }

    /// Read `rel` from the local config directory as UTF-8.
    pub fn read_local(&self, rel: &str) -> String {
        let path = self.claude_dir().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
    }

    /// Write `content` to `rel` inside the repository working copy.
    pub fn write_repo(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
        write_under(&self.repo_dir(), rel, content.as_ref())
    }

    /// Read `rel` from the repository working copy as raw bytes.
    pub fn read_repo(&self, rel: &str) -> Vec<u8> {
        let path = self.repo_dir().join(rel);
        fs::read(&path).unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
    }

    /// Initialise the repository working copy with a README commit.
    pub fn init_repo(&self) {
        git::repo_with_commit(&self.repo_dir());
    }

    /// Create a bare remote next to the home and register it as `origin`.
    ///
    /// Returns the remote's path.
    pub fn add_bare_remote(&self) -> PathBuf {
        let remote = self.root().join("remote.git");
        git::bare_repo(&remote);
        let url = remote.to_string_lossy().to_string();
        git::run_git(&self.repo_dir(), &["remote", "add", "origin", &url]);
        remote
    }

    /// Clone `remote` as this home's repository working copy.
    pub fn clone_repo_from(&self, remote: &Path) {
        fs::create_dir_all(self.sync_dir()).unwrap();
        let url = remote.to_string_lossy().to_string();
        let dest = self.repo_dir().to_string_lossy().to_string();
        git::run_git(self.root(), &["clone", &url, &dest]);
        git::configure_identity(&self.repo_dir());
    }

    /// Names of the entries in the backup directory, sorted.
    pub fn backup_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.backup_dir()) {
            Ok(entries) => entries
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Assert that `rel` exists inside the local config directory.
    pub fn assert_local_exists(&self, rel: &str) {
        let path = self.claude_dir().join(rel);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that `rel` does not exist inside the local config directory.
    pub fn assert_local_not_exists(&self, rel: &str) {
        let path = self.claude_dir().join(rel);
        assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
    }
}

fn write_under(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
