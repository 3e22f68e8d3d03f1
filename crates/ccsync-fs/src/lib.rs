//! Filesystem primitives for claude-code-sync
//!
//! Provides forward-slash relative paths, streaming content digests,
//! atomic writes and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{content_digest, file_digest};
pub use config::ConfigStore;
pub use constants::RepoEntry;
pub use error::{Error, Result};
pub use path::NormalizedPath;
