//! Error types for ccsync-crypto

use std::path::PathBuf;

/// Result type for ccsync-crypto operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ccsync-crypto operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no AGE-SECRET-KEY found in key material")]
    MissingSecretKey,

    #[error("invalid secret key: {0}")]
    InvalidIdentity(String),

    #[error("invalid public key: {0}")]
    InvalidRecipient(String),

    #[error("encryption failed: {0}")]
    Encrypt(#[from] age::EncryptError),

    #[error("failed to decrypt: {0}")]
    Decrypt(#[from] age::DecryptError),

    #[error("ciphertext is passphrase-protected; expected a recipient-encrypted file")]
    PassphraseProtected,

    #[error("key file not found at {path}")]
    KeyNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fs(#[from] ccsync_fs::Error),
}
