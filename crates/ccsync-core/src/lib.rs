//! Sync engine for claude-code-sync
//!
//! This crate implements selective synchronization of a local Claude Code
//! configuration directory through a version-controlled repository:
//!
//! - **Pattern classification**: which files are encrypted, copied or excluded
//! - **Manifest**: SHA-256 digests of the repository content and verification
//! - **Path placeholders**: machine-specific paths in plugin metadata
//! - **Backups**: timestamped archives of local state before each pull
//! - **SyncEngine**: push, pull, verify and status
//! - **Setup**: init, key import/export, reset, unlink and health checks
//!
//! # Architecture
//!
//! ```text
//!                  claude-code-sync
//!                        |
//!                   ccsync-core
//!                        |
//!          +-------------+-------------+
//!          |             |             |
//!      ccsync-fs     ccsync-git   ccsync-crypto
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ccsync_core::{ConfigPaths, PushOptions, Result, SyncEngine};
//!
//! fn example() -> Result<()> {
//!     let engine = SyncEngine::load(ConfigPaths::discover()?)?;
//!     let report = engine.push(&PushOptions::default())?;
//!     println!("{} file(s) pushed", report.files_processed());
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod classify;
pub mod config;
pub mod error;
pub mod manifest;
pub mod paths;
pub mod placeholder;
pub mod platform;
pub mod platform_check;
pub mod setup;
pub mod sync;
pub mod walk;

pub use classify::{Classification, PatternSet};
pub use config::{BackupConfig, SyncConfig};
pub use error::{Error, Result};
pub use manifest::{EntryCheck, EntryStatus, ManifestEntry};
pub use paths::ConfigPaths;
pub use platform::Platform;
pub use platform_check::PlatformWarning;
pub use setup::{CheckLevel, HealthCheck, InitReport, RepoSetup};
pub use sync::{
    ConflictStrategy, DiffPreview, FileAction, PullOptions, PullReport, PulledFile, PushAction,
    PushOptions, PushOutcome, PushReport, RemoteState, RepoFile, StatusReport, SyncEngine,
    VerifyReport,
};
pub use walk::SyncableFile;
