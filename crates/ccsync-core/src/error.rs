//! Error types for ccsync-core

use std::path::PathBuf;

/// Result type for ccsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No key file; `init` or `import-key` has not been run
    #[error("not initialized: no key file at {key_file}. Run 'claude-code-sync init' or 'claude-code-sync import-key' first")]
    NotInitialized { key_file: PathBuf },

    /// The local config directory is missing, so push has no input
    #[error("no config directory at {path}. Nothing to sync")]
    NothingToSync { path: PathBuf },

    /// The repository working copy is missing
    #[error("no repository at {path}. Run 'claude-code-sync init <repo-url>' first")]
    NoRepo { path: PathBuf },

    /// Mutually exclusive options were combined
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Filesystem failure for a specific file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encryption or decryption failure for a specific file
    #[error("failed to process {path}: {source}")]
    Crypto {
        path: String,
        #[source]
        source: ccsync_crypto::Error,
    },

    /// Version-control failure
    #[error(transparent)]
    Vcs(#[from] ccsync_git::Error),

    /// Manifest verification found discrepancies
    #[error("integrity check failed: {count} file(s) missing or modified")]
    Integrity { count: usize },

    /// No manifest in the repository
    #[error("no manifest at {path}. Run 'claude-code-sync push' first")]
    ManifestNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from ccsync-fs
    #[error(transparent)]
    Fs(#[from] ccsync_fs::Error),

    /// Backup archive error
    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    /// Directory traversal error
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn crypto(path: impl Into<String>, source: ccsync_crypto::Error) -> Self {
        Self::Crypto {
            path: path.into(),
            source,
        }
    }
}
