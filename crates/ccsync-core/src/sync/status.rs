//! Remote state and file inventories for `status`

use ccsync_fs::NormalizedPath;
use ccsync_fs::constants::{ENCRYPTED_SUFFIX, is_vcs_metadata};
use ccsync_git::VcsProvider;

use crate::Result;
use crate::walk::{SyncableFile, local_files, walk_relative};

use super::engine::SyncEngine;

/// Length commit hashes are abbreviated to for display.
pub const SHORT_HASH_LEN: usize = 7;

/// How the working copy relates to its remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteState {
    NotConfigured,
    UpToDate { commit: String },
    OutOfSync { local: String, remote: String },
    /// Fetch failed or one side has no commits
    Unknown,
}

/// Abbreviate a commit hash for display.
pub fn short_hash(commit: &str) -> &str {
    commit.get(..SHORT_HASH_LEN).unwrap_or(commit)
}

/// A file tracked in the repository working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub rel: NormalizedPath,
    pub encrypted: bool,
}

#[derive(Debug, Clone)]
pub struct StatusReport {
    /// `None` when the repository does not exist yet
    pub remote: Option<RemoteState>,
    pub last_commit: Option<String>,
    /// Every local file, excluded ones included
    pub local_files: Vec<SyncableFile>,
    pub claude_json_present: bool,
    pub repo_files: Vec<RepoFile>,
}

impl<V: VcsProvider> SyncEngine<V> {
    /// Fetch, then compare the local head with the remote-tracking head.
    pub fn remote_state(&self) -> RemoteState {
        if !self.vcs().has_remote() {
            return RemoteState::NotConfigured;
        }
        if let Err(e) = self.vcs().fetch() {
            tracing::warn!(error = %e, "fetch failed");
            return RemoteState::Unknown;
        }

        match (self.vcs().local_commit(), self.vcs().remote_commit()) {
            (Ok(Some(local)), Ok(Some(remote))) if local == remote => {
                RemoteState::UpToDate { commit: local }
            }
            (Ok(Some(local)), Ok(Some(remote))) => RemoteState::OutOfSync { local, remote },
            _ => RemoteState::Unknown,
        }
    }

    /// Gather remote state and both file inventories.
    pub fn status(&self) -> Result<StatusReport> {
        let paths = self.paths();

        let local_files = if paths.claude_dir.is_dir() {
            local_files(&paths.claude_dir, self.patterns())?
        } else {
            Vec::new()
        };

        let (remote, last_commit, repo_files) = if paths.repo_dir.is_dir() && self.vcs().is_repo() {
            let last_commit = self
                .vcs()
                .local_commit()
                .ok()
                .flatten()
                .map(|c| short_hash(&c).to_string());
            let repo_files = walk_relative(&paths.repo_dir)?
                .into_iter()
                .filter(|rel| !is_vcs_metadata(rel.as_str()))
                .map(|rel| RepoFile {
                    encrypted: rel.as_str().ends_with(ENCRYPTED_SUFFIX),
                    rel,
                })
                .collect();
            (Some(self.remote_state()), last_commit, repo_files)
        } else {
            (None, None, Vec::new())
        };

        Ok(StatusReport {
            remote,
            last_commit,
            local_files,
            claude_json_present: paths.claude_json.is_file(),
            repo_files,
        })
    }
}
