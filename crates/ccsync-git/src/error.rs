//! Error types for ccsync-git

use std::path::PathBuf;

/// Result type for ccsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] ccsync_fs::Error),

    /// A `git` subprocess exited non-zero; carries its stderr.
    #[error("git {command}: {stderr}")]
    Command { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Not a git repository: {path}")]
    NotARepo { path: PathBuf },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Invalid repository URL: {url}")]
    InvalidUrl { url: String },
}
