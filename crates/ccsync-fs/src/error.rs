use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file could not be decoded, or a value could not be encoded
    #[error("Invalid {format} config {path}: {message}")]
    Config {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Unsupported config format: '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("Could not lock {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
