//! Version-control collaborator trait

use chrono::{DateTime, Utc};

use crate::Result;

/// Version-control operations required by the sync engine.
///
/// The engine never inspects the repository directly; everything it needs
/// from version control goes through this trait so the backend can be
/// replaced (or faked in tests) without touching push/pull logic.
pub trait VcsProvider {
    /// Whether the working copy is a repository.
    fn is_repo(&self) -> bool;

    /// Create an empty repository in the working copy directory.
    fn init(&self) -> Result<()>;

    /// Stage every addition, modification and deletion.
    fn add_all(&self) -> Result<()>;

    /// Whether the index differs from HEAD.
    fn has_changes(&self) -> Result<bool>;

    /// Commit the index with `message`.
    fn commit(&self, message: &str) -> Result<()>;

    /// Whether the `origin` remote is configured.
    fn has_remote(&self) -> bool;

    /// Add a named remote.
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;

    /// Remove a named remote.
    fn remove_remote(&self, name: &str) -> Result<()>;

    /// Push HEAD to `origin`.
    fn push(&self) -> Result<()>;

    /// Pull HEAD from `origin`.
    ///
    /// Retries once allowing unrelated histories when the first attempt
    /// fails for that reason.
    fn pull(&self) -> Result<()>;

    /// Refresh remote-tracking refs. Best-effort.
    fn fetch(&self) -> Result<()>;

    /// Full hash of the local HEAD commit, if any.
    fn local_commit(&self) -> Result<Option<String>>;

    /// Full hash of the remote-tracking HEAD, if known.
    fn remote_commit(&self) -> Result<Option<String>>;

    /// Timestamp of the local HEAD commit, if any.
    fn last_commit_time(&self) -> Result<Option<DateTime<Utc>>>;
}
