//! Reserved names inside the sync repository working copy.

use std::path::Path;

/// Entries of the repository working copy that have a fixed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoEntry {
    /// The `.git` directory (version-control metadata)
    GitDir,
    /// The integrity ledger written on every push
    Manifest,
    /// Documentation file created with the repository, never synced back
    Readme,
    /// Plugin configuration subtree whose JSON may embed local paths
    PluginsDir,
}

impl RepoEntry {
    /// Get the string representation of the entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::Manifest => ".sync-manifest",
            Self::Readme => "README.md",
            Self::PluginsDir => "plugins",
        }
    }
}

impl AsRef<Path> for RepoEntry {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for RepoEntry {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for RepoEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suffix appended to the repository copy of every encrypted file.
pub const ENCRYPTED_SUFFIX: &str = ".age";

/// Returns true for any repository-relative path that belongs to
/// version-control metadata (`.git/`, `.gitignore`, `.gitattributes`, ...).
pub fn is_vcs_metadata(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .next()
        .is_some_and(|first| first.starts_with(RepoEntry::GitDir.as_str()))
}
