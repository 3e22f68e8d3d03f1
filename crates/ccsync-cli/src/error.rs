//! Error types for ccsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from ccsync-core
    #[error(transparent)]
    Core(#[from] ccsync_core::Error),

    /// Error from ccsync-git
    #[error(transparent)]
    Git(#[from] ccsync_git::Error),

    /// Error from ccsync-fs
    #[error(transparent)]
    Fs(#[from] ccsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Release lookup failed
    #[error("failed to check for updates: {0}")]
    Network(#[from] reqwest::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
