//! Manifest verification of the repository working copy

use ccsync_fs::RepoEntry;
use ccsync_git::VcsProvider;

use crate::manifest::{self, EntryCheck, EntryStatus};
use crate::{Error, Result};

use super::engine::SyncEngine;

/// Per-entry outcome of checking the manifest against the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub checks: Vec<EntryCheck>,
}

impl VerifyReport {
    pub fn ok_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_ok()).count()
    }

    pub fn discrepancies(&self) -> impl Iterator<Item = &EntryCheck> {
        self.checks.iter().filter(|c| !c.is_ok())
    }

    pub fn missing_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == EntryStatus::Missing)
            .count()
    }

    pub fn mismatch_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, EntryStatus::Mismatch { .. }))
            .count()
    }

    pub fn is_intact(&self) -> bool {
        self.checks.iter().all(EntryCheck::is_ok)
    }

    /// Turn discrepancies into [`Error::Integrity`].
    pub fn ensure_intact(&self) -> Result<()> {
        let count = self.discrepancies().count();
        if count == 0 {
            Ok(())
        } else {
            Err(Error::Integrity { count })
        }
    }
}

impl<V: VcsProvider> SyncEngine<V> {
    /// Check every manifest entry against the repository working copy.
    ///
    /// Files present in the repository but absent from the manifest are
    /// not reported.
    pub fn verify(&self) -> Result<VerifyReport> {
        self.require_repo()?;
        let repo_dir = &self.paths().repo_dir;
        let checks = manifest::verify(repo_dir, &repo_dir.join(RepoEntry::Manifest.as_str()))?;
        Ok(VerifyReport { checks })
    }
}
