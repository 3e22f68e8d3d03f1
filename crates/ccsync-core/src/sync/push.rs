//! Push: local config directory -> repository -> remote

use std::fs;
use std::path::Path;

use ccsync_fs::constants::{ENCRYPTED_SUFFIX, is_vcs_metadata};
use ccsync_fs::io::ensure_dir;
use ccsync_fs::{NormalizedPath, RepoEntry};
use ccsync_git::VcsProvider;

use crate::backup::timestamp;
use crate::classify::Classification;
use crate::paths::CLAUDE_JSON_REPO_NAME;
use crate::platform_check::{PlatformWarning, check_platform_variants};
use crate::walk::{local_files, walk_relative};
use crate::{Error, Result, manifest, placeholder};

use super::engine::SyncEngine;

/// Options for [`SyncEngine::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOptions {
    /// Report what would be transferred without touching the repository
    pub dry_run: bool,
    /// Warn about platform-specific scripts lacking a variant
    pub platform_check: bool,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            platform_check: true,
        }
    }
}

/// How a file reaches the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushAction {
    Encrypt,
    Copy,
}

/// A file transferred (or, in a dry run, planned) by push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedFile {
    /// Logical relative path; `claude.json` for the extra config file
    pub rel: NormalizedPath,
    pub action: PushAction,
}

/// Where push stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Dry run; nothing was written
    DryRun,
    /// The repository already matched; nothing committed
    NoChanges,
    /// Committed and pushed to the remote
    Pushed,
    /// Committed, but no remote is configured
    CommittedLocalOnly,
}

/// Report from a push.
#[derive(Debug, Clone)]
pub struct PushReport {
    pub files: Vec<PushedFile>,
    /// Plugin files whose local paths were replaced with the placeholder
    pub normalized: Vec<NormalizedPath>,
    pub platform_warnings: Vec<PlatformWarning>,
    /// Number of entries in the regenerated manifest
    pub manifest_entries: usize,
    pub commit_message: Option<String>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
    pub outcome: PushOutcome,
}

impl PushReport {
    fn new(outcome: PushOutcome) -> Self {
        Self {
            files: Vec::new(),
            normalized: Vec::new(),
            platform_warnings: Vec::new(),
            manifest_entries: 0,
            commit_message: None,
            warnings: Vec::new(),
            outcome,
        }
    }

    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    pub fn committed(&self) -> bool {
        matches!(
            self.outcome,
            PushOutcome::Pushed | PushOutcome::CommittedLocalOnly
        )
    }

    pub fn pushed(&self) -> bool {
        self.outcome == PushOutcome::Pushed
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

impl<V: VcsProvider> SyncEngine<V> {
    /// Transfer the local config directory into the repository, regenerate
    /// the manifest, commit, and push when a remote exists.
    ///
    /// # Errors
    ///
    /// Fails before any write when the key file, the local config
    /// directory, or (outside a dry run) the repository is missing. Any
    /// per-file encryption or copy failure aborts the push; files already
    /// written stay in the working copy.
    pub fn push(&self, options: &PushOptions) -> Result<PushReport> {
        let paths = self.paths();
        self.require_key()?;
        if !paths.claude_dir.is_dir() {
            return Err(Error::NothingToSync {
                path: paths.claude_dir.clone(),
            });
        }
        if !options.dry_run {
            self.require_repo()?;
        }

        let recipient = self.load_recipient()?;
        let repo_dir = &paths.repo_dir;
        let mut report = PushReport::new(if options.dry_run {
            PushOutcome::DryRun
        } else {
            PushOutcome::NoChanges
        });

        for file in local_files(&paths.claude_dir, self.patterns())? {
            let action = match file.classification {
                Classification::Encrypted => PushAction::Encrypt,
                Classification::Plain => PushAction::Copy,
                Classification::Excluded | Classification::PlatformSkipped => {
                    tracing::trace!(file = %file.rel, "skipped");
                    continue;
                }
            };

            if !options.dry_run {
                match action {
                    PushAction::Encrypt => {
                        let dest = file.rel.with_suffix(ENCRYPTED_SUFFIX).under(repo_dir);
                        ccsync_crypto::encrypt_file(&recipient, &file.source, &dest)
                            .map_err(|e| Error::crypto(file.rel.as_str(), e))?;
                    }
                    PushAction::Copy => {
                        copy_into(&file.source, &file.rel.under(repo_dir), &file.rel)?;
                    }
                }
            }

            tracing::debug!(file = %file.rel, ?action, dry_run = options.dry_run, "push");
            report.files.push(PushedFile {
                rel: file.rel,
                action,
            });
        }

        if paths.claude_json.is_file() {
            if !options.dry_run {
                let dest = repo_dir.join(format!("{CLAUDE_JSON_REPO_NAME}{ENCRYPTED_SUFFIX}"));
                ccsync_crypto::encrypt_file(&recipient, &paths.claude_json, &dest)
                    .map_err(|e| Error::crypto(CLAUDE_JSON_REPO_NAME, e))?;
            }
            report.files.push(PushedFile {
                rel: NormalizedPath::from(CLAUDE_JSON_REPO_NAME),
                action: PushAction::Encrypt,
            });
        }

        if options.dry_run {
            return Ok(report);
        }

        let plugins = repo_dir.join(RepoEntry::PluginsDir.as_str());
        match placeholder::normalize_tree(repo_dir, &plugins, &paths.claude_dir_str()) {
            Ok(rewritten) => report.normalized = rewritten,
            Err(e) => report.warn(format!("failed to normalize plugin paths: {e}")),
        }

        if options.platform_check {
            match walk_relative(repo_dir) {
                Ok(files) => {
                    let files: Vec<NormalizedPath> = files
                        .into_iter()
                        .filter(|rel| !is_vcs_metadata(rel.as_str()))
                        .collect();
                    report.platform_warnings = check_platform_variants(repo_dir, &files);
                }
                Err(e) => report.warn(format!("platform check skipped: {e}")),
            }
        }

        let entries = manifest::generate(repo_dir)?;
        manifest::write(&repo_dir.join(RepoEntry::Manifest.as_str()), &entries)?;
        report.manifest_entries = entries.len();

        self.vcs().add_all()?;
        if !self.vcs().has_changes()? {
            tracing::info!("repository unchanged, nothing to commit");
            return Ok(report);
        }

        let message = format!("Sync {}", timestamp());
        self.vcs().commit(&message)?;
        report.commit_message = Some(message);

        if self.vcs().has_remote() {
            self.vcs().push()?;
            report.outcome = PushOutcome::Pushed;
        } else {
            report.outcome = PushOutcome::CommittedLocalOnly;
        }

        tracing::info!(files = report.files_processed(), outcome = ?report.outcome, "push finished");
        Ok(report)
    }
}

/// Copy `src` to `dest`, creating parents, with errors naming `rel`.
pub(crate) fn copy_into(src: &Path, dest: &Path, rel: &NormalizedPath) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dest).map_err(|e| Error::io(rel.to_native(), e))?;
    Ok(())
}
