//! Synchronization between the local config directory and the repository
//!
//! [`SyncEngine`] holds the collaborators; each operation lives in its own
//! module and returns a report the caller renders.

mod engine;
mod pull;
mod push;
mod status;
mod verify;

pub use engine::SyncEngine;
pub use pull::{
    ConflictStrategy, DiffPreview, FileAction, LineDiff, PullOptions, PullReport, PulledFile,
};
pub use push::{PushAction, PushOptions, PushOutcome, PushReport, PushedFile};
pub use status::{RemoteState, RepoFile, SHORT_HASH_LEN, StatusReport, short_hash};
pub use verify::VerifyReport;
