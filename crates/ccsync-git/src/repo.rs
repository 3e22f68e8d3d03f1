//! Git-backed implementation of [`VcsProvider`]

use std::path::Path;

use chrono::{DateTime, Utc};
use git2::{Commit, IndexAddOption, Repository, Signature};

use ccsync_fs::{NormalizedPath, RepoEntry, io};

use crate::command::run_git;
use crate::provider::VcsProvider;
use crate::{Error, REMOTE_NAME, Result, commits};

/// Identity used when the user has no `user.name` / `user.email` configured.
const FALLBACK_AUTHOR: &str = "claude-code-sync";
const FALLBACK_EMAIL: &str = "claude-code-sync@localhost";

/// Marker text written into the repository's documentation file.
const README_CONTENT: &str = "# Claude Code Sync\n";

/// Sync repository working copy.
///
/// Local state (index, commits, remotes, refs) goes through `git2`;
/// push, pull and fetch shell out to `git`.
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: NormalizedPath,
}

impl GitRepo {
    /// Create a handle for the working copy at `root`. Nothing is opened yet.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: NormalizedPath::new(root),
        }
    }

    /// Root of the working copy.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(self.root.to_native()).map_err(|_| Error::NotARepo {
            path: self.root.to_native(),
        })
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        run_git(Some(&self.root.to_native()), args)
    }

    /// Write the documentation file and commit it as the first commit.
    pub fn create_initial_commit(&self) -> Result<()> {
        let readme = self.root.to_native().join(RepoEntry::Readme.as_str());
        io::write_text(&readme, README_CONTENT)?;

        let repo = self.open()?;
        let mut index = repo.index()?;
        index.add_path(Path::new(RepoEntry::Readme.as_str()))?;
        index.write()?;
        drop(repo);

        self.commit("Initial commit")
    }

    /// URL of a named remote, if configured.
    pub fn remote_url(&self, name: &str) -> Option<String> {
        let repo = self.open().ok()?;
        let remote = repo.find_remote(name).ok()?;
        remote.url().map(str::to_string)
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        match repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => Ok(Signature::now(FALLBACK_AUTHOR, FALLBACK_EMAIL)?),
        }
    }
}

impl VcsProvider for GitRepo {
    fn is_repo(&self) -> bool {
        self.root.to_native().join(RepoEntry::GitDir.as_str()).exists()
    }

    fn init(&self) -> Result<()> {
        let root = self.root.to_native();
        io::ensure_dir(&root)?;
        Repository::init(&root)?;
        Ok(())
    }

    fn add_all(&self) -> Result<()> {
        let repo = self.open()?;
        let mut index = repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        // add_all does not drop entries for deleted files
        index.update_all(["*"], None)?;
        index.write()?;
        Ok(())
    }

    fn has_changes(&self) -> Result<bool> {
        let repo = self.open()?;
        let index = repo.index()?;
        let head_tree = match repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(_) => None,
        };

        let diff = repo.diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;
        Ok(diff.stats()?.files_changed() > 0)
    }

    fn commit(&self, message: &str) -> Result<()> {
        let repo = self.open()?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let signature = Self::signature(&repo)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&Commit> = parent.iter().collect();

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::debug!(commit = %oid, "created commit");
        Ok(())
    }

    fn has_remote(&self) -> bool {
        self.open()
            .map(|repo| repo.find_remote(REMOTE_NAME).is_ok())
            .unwrap_or(false)
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        let repo = self.open()?;
        repo.remote(name, url)?;
        Ok(())
    }

    fn remove_remote(&self, name: &str) -> Result<()> {
        let repo = self.open()?;
        repo.find_remote(name).map_err(|_| Error::RemoteNotFound {
            name: name.to_string(),
        })?;
        repo.remote_delete(name)?;
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.git(&["push", REMOTE_NAME, "HEAD"])?;
        Ok(())
    }

    fn pull(&self) -> Result<()> {
        match self.git(&["pull", "--no-rebase", "--no-edit", REMOTE_NAME, "HEAD"]) {
            Err(Error::Command { stderr, .. }) if stderr.contains("unrelated histories") => {
                tracing::debug!("retrying pull with --allow-unrelated-histories");
                self.git(&[
                    "pull",
                    "--no-rebase",
                    "--no-edit",
                    REMOTE_NAME,
                    "HEAD",
                    "--allow-unrelated-histories",
                ])?;
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    fn fetch(&self) -> Result<()> {
        if let Err(e) = self.git(&["fetch", REMOTE_NAME]) {
            tracing::debug!(error = %e, "fetch failed");
        }
        Ok(())
    }

    fn local_commit(&self) -> Result<Option<String>> {
        let repo = self.open()?;
        let commit = repo.head().ok().and_then(|head| head.target());
        Ok(commit.map(|oid| oid.to_string()))
    }

    fn remote_commit(&self) -> Result<Option<String>> {
        let repo = self.open()?;

        let mut candidates = vec![format!("refs/remotes/{REMOTE_NAME}/HEAD")];
        if let Ok(head) = repo.head()
            && head.is_branch()
            && let Some(branch) = head.shorthand()
        {
            candidates.push(format!("refs/remotes/{REMOTE_NAME}/{branch}"));
        }

        for name in candidates {
            if let Ok(reference) = repo.find_reference(&name)
                && let Ok(resolved) = reference.resolve()
                && let Some(oid) = resolved.target()
            {
                return Ok(Some(oid.to_string()));
            }
        }

        Ok(None)
    }

    fn last_commit_time(&self) -> Result<Option<DateTime<Utc>>> {
        let repo = self.open()?;
        commits::last_commit_time(&repo)
    }
}
