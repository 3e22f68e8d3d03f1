//! Pull: remote -> repository -> local config directory

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use ccsync_crypto::Identity;
use ccsync_fs::file_digest;
use ccsync_fs::io::ensure_dir;
use ccsync_fs::{NormalizedPath, RepoEntry};
use ccsync_git::{VcsProvider, describe_age};

use crate::backup::{self, timestamp};
use crate::paths::CLAUDE_JSON_REPO_NAME;
use crate::walk::{SyncableFile, repo_files};
use crate::{Error, Result, placeholder};

use super::engine::SyncEngine;
use super::push::copy_into;

/// Differing lines shown per file in a diff preview.
const PREVIEW_LINES: usize = 3;
/// Display width a previewed line is truncated to.
const PREVIEW_WIDTH: usize = 60;

/// What to do when a pulled file already exists locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictStrategy {
    /// Overwrite local files, backing up the ones that differ
    #[default]
    Theirs,
    /// Keep existing local files; only create missing ones
    Ours,
    /// Change nothing; report what differs
    DiffOnly,
}

impl ConflictStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Theirs => "theirs",
            Self::Ours => "ours",
            Self::DiffOnly => "diff",
        }
    }
}

/// Options for [`SyncEngine::pull`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullOptions {
    pub strategy: ConflictStrategy,
    /// Report what would be pulled without touching anything
    pub dry_run: bool,
}

impl PullOptions {
    /// Build options from command-line flags.
    ///
    /// `--theirs` may not be combined with `--ours` or `--diff`, and at
    /// most one of `--ours`, `--diff` and `--dry-run` may be set.
    pub fn from_flags(ours: bool, theirs: bool, diff: bool, dry_run: bool) -> Result<Self> {
        if theirs && (ours || diff) {
            return Err(Error::InvalidArguments(
                "--theirs cannot be combined with --ours or --diff".into(),
            ));
        }
        let modes = [ours, diff, dry_run].iter().filter(|set| **set).count();
        if modes > 1 {
            return Err(Error::InvalidArguments(
                "--ours, --diff and --dry-run are mutually exclusive".into(),
            ));
        }

        let strategy = if ours {
            ConflictStrategy::Ours
        } else if diff {
            ConflictStrategy::DiffOnly
        } else {
            ConflictStrategy::Theirs
        };
        Ok(Self { strategy, dry_run })
    }
}

/// One differing line in a [`DiffPreview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    /// 1-based line number
    pub number: usize,
    pub local: String,
    pub remote: String,
}

/// Bounded line-level comparison of a changed text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffPreview {
    pub local_lines: usize,
    pub remote_lines: usize,
    pub lines: Vec<LineDiff>,
}

impl DiffPreview {
    /// Compare two payloads; `None` unless both are UTF-8.
    pub fn compute(local: &[u8], remote: &[u8]) -> Option<Self> {
        let local = std::str::from_utf8(local).ok()?;
        let remote = std::str::from_utf8(remote).ok()?;
        let local: Vec<&str> = local.split('\n').collect();
        let remote: Vec<&str> = remote.split('\n').collect();

        let lines = (0..local.len().max(remote.len()))
            .filter_map(|i| {
                let l = local.get(i).copied().unwrap_or_default();
                let r = remote.get(i).copied().unwrap_or_default();
                (l != r).then(|| LineDiff {
                    number: i + 1,
                    local: truncate(l),
                    remote: truncate(r),
                })
            })
            .take(PREVIEW_LINES)
            .collect();

        Some(Self {
            local_lines: local.len(),
            remote_lines: remote.len(),
            lines,
        })
    }
}

fn truncate(line: &str) -> String {
    if line.chars().count() > PREVIEW_WIDTH {
        let head: String = line.chars().take(PREVIEW_WIDTH).collect();
        format!("{head}...")
    } else {
        line.to_string()
    }
}

/// What pull did (or would do) with one repository file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Dry run: would be written
    Planned,
    /// Written; no local file existed
    Created,
    /// Overwritten; the previous content was saved to `backup`
    Updated { backup: PathBuf },
    /// Local content already matched
    Unchanged,
    /// Local file left in place under [`ConflictStrategy::Ours`]
    KeptLocal,
    /// Diff only: no local file
    DiffNew,
    /// Diff only: local file differs
    DiffChanged { preview: Option<DiffPreview> },
    /// Diff only: local file matches
    DiffUnchanged,
}

/// A repository file visited by pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulledFile {
    /// Logical relative path (encrypted suffix stripped)
    pub rel: NormalizedPath,
    /// Local destination
    pub dest: PathBuf,
    pub encrypted: bool,
    pub action: FileAction,
}

/// Report from a pull.
#[derive(Debug, Clone)]
pub struct PullReport {
    pub files: Vec<PulledFile>,
    pub strategy: ConflictStrategy,
    pub dry_run: bool,
    /// Why fetching from the remote failed; the pull went on with the
    /// content already in the working copy
    pub pull_error: Option<String>,
    /// Age of the last local commit, reported when the remote pull failed
    pub staleness: Option<String>,
    pub backup_archive: Option<PathBuf>,
    pub pruned: Vec<PathBuf>,
    /// Plugin files whose placeholders were expanded
    pub expanded: Vec<NormalizedPath>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl PullReport {
    fn new(options: &PullOptions) -> Self {
        Self {
            files: Vec::new(),
            strategy: options.strategy,
            dry_run: options.dry_run,
            pull_error: None,
            staleness: None,
            backup_archive: None,
            pruned: Vec::new(),
            expanded: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    /// Files whose local content differs from the repository (diff only).
    pub fn changed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.action, FileAction::DiffNew | FileAction::DiffChanged { .. }))
            .count()
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

impl<V: VcsProvider> SyncEngine<V> {
    /// Bring the repository's content into the local config directory.
    ///
    /// # Errors
    ///
    /// Fails before any write when the key file or repository is missing
    /// or the options are contradictory. A file that cannot be decrypted
    /// aborts the pull with its relative path. Remote, backup and
    /// placeholder failures are reported as warnings.
    pub fn pull(&self, options: &PullOptions) -> Result<PullReport> {
        if options.dry_run && options.strategy != ConflictStrategy::Theirs {
            return Err(Error::InvalidArguments(
                "--dry-run cannot be combined with --ours or --diff".into(),
            ));
        }

        let paths = self.paths();
        self.require_key()?;
        self.require_repo()?;
        let identity = self.load_identity()?;

        let mut report = PullReport::new(options);

        if self.vcs().has_remote() && !options.dry_run {
            if let Err(e) = self.vcs().pull() {
                tracing::warn!(error = %e, "pull from remote failed, using cached content");
                report.pull_error = Some(e.to_string());
                if let Ok(Some(then)) = self.vcs().last_commit_time() {
                    report.staleness = Some(describe_age(then, Utc::now()));
                }
            }
        }

        let ts = timestamp();
        if !options.dry_run && paths.claude_dir.is_dir() {
            self.snapshot(&ts, &mut report);
        }

        let mutating = !options.dry_run && options.strategy != ConflictStrategy::DiffOnly;
        if mutating {
            ensure_dir(&paths.claude_dir)?;
        }

        for file in repo_files(&paths.repo_dir, self.patterns(), self.platform())? {
            if !file.classification.is_synced() {
                tracing::trace!(file = %file.rel, classification = file.classification.label(), "skipped");
                continue;
            }

            let encrypted = file.source.extension().is_some_and(|ext| ext == "age");
            let dest = self.destination(&file.rel, encrypted);

            let action = if options.dry_run {
                FileAction::Planned
            } else {
                match options.strategy {
                    ConflictStrategy::DiffOnly => self.diff_file(&identity, &file, encrypted, &dest)?,
                    ConflictStrategy::Ours if dest.exists() => FileAction::KeptLocal,
                    _ => self.install_file(&identity, &file, encrypted, &dest, &ts)?,
                }
            };

            tracing::debug!(file = %file.rel, ?action, "pull");
            report.files.push(PulledFile {
                rel: file.rel,
                dest,
                encrypted,
                action,
            });
        }

        if mutating {
            let plugins = paths.claude_dir.join(RepoEntry::PluginsDir.as_str());
            match placeholder::expand_tree(&paths.claude_dir, &plugins, &paths.claude_dir_str()) {
                Ok(expanded) => report.expanded = expanded,
                Err(e) => report.warn(format!("failed to expand plugin paths: {e}")),
            }
        }

        tracing::info!(files = report.files_processed(), strategy = options.strategy.as_str(), "pull finished");
        Ok(report)
    }

    /// Archive the local state and prune old archives; never fatal.
    fn snapshot(&self, ts: &str, report: &mut PullReport) {
        let paths = self.paths();
        let archive = paths.backup_dir.join(backup::archive_name(ts));

        let created = ensure_dir(&paths.backup_dir)
            .map_err(Error::from)
            .and_then(|()| backup::create_archive(&paths.claude_dir, &paths.claude_json, &archive));
        match created {
            Ok(count) => {
                tracing::debug!(archive = %archive.display(), files = count, "backup created");
                report.backup_archive = Some(archive);
            }
            Err(e) => {
                report.warn(format!("failed to create backup: {e}"));
                return;
            }
        }

        match backup::prune(&paths.backup_dir, self.config().max_backups()) {
            Ok(pruned) => report.pruned = pruned,
            Err(e) => report.warn(format!("failed to prune backups: {e}")),
        }
    }

    /// Local path a logical repository path is written to.
    fn destination(&self, rel: &NormalizedPath, encrypted: bool) -> PathBuf {
        let paths = self.paths();
        if encrypted && rel.as_str() == CLAUDE_JSON_REPO_NAME {
            paths.claude_json.clone()
        } else {
            rel.under(&paths.claude_dir)
        }
    }

    fn diff_file(
        &self,
        identity: &Identity,
        file: &SyncableFile,
        encrypted: bool,
        dest: &Path,
    ) -> Result<FileAction> {
        if !dest.exists() {
            return Ok(FileAction::DiffNew);
        }

        let local = file_digest(dest).map_err(|e| Error::io(dest, e))?;
        let remote = if encrypted {
            // Plaintext stays inside the user's tree
            let parent = dest.parent().unwrap_or(Path::new("."));
            let temp = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
            decrypt_into(identity, file, temp.as_file())?;
            file_digest(temp.path()).map_err(|e| Error::io(temp.path(), e))?
        } else {
            file_digest(&file.source).map_err(|e| Error::io(&file.source, e))?
        };

        if local == remote {
            return Ok(FileAction::DiffUnchanged);
        }

        let preview = if encrypted {
            None
        } else {
            let local = fs::read(dest).map_err(|e| Error::io(dest, e))?;
            let remote = fs::read(&file.source).map_err(|e| Error::io(&file.source, e))?;
            DiffPreview::compute(&local, &remote)
        };
        Ok(FileAction::DiffChanged { preview })
    }

    fn install_file(
        &self,
        identity: &Identity,
        file: &SyncableFile,
        encrypted: bool,
        dest: &Path,
        ts: &str,
    ) -> Result<FileAction> {
        let parent = dest.parent().unwrap_or(Path::new("."));
        ensure_dir(parent)?;

        // Decrypted content is staged next to the destination so the
        // comparison and install never see a half-written file.
        let staged = if encrypted {
            let temp = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
            decrypt_into(identity, file, temp.as_file())?;
            Some(temp)
        } else {
            None
        };
        let incoming = staged.as_ref().map_or(file.source.as_path(), |t| t.path());

        let action = if dest.exists() {
            let local = file_digest(dest).map_err(|e| Error::io(dest, e))?;
            let remote = file_digest(incoming).map_err(|e| Error::io(incoming, e))?;
            if local == remote {
                return Ok(FileAction::Unchanged);
            }
            FileAction::Updated {
                backup: backup::backup_file(dest, ts)?,
            }
        } else {
            FileAction::Created
        };

        match staged {
            Some(temp) => {
                temp.persist(dest).map_err(|e| Error::io(dest, e.error))?;
            }
            None => copy_into(&file.source, dest, &file.rel)?,
        }
        Ok(action)
    }
}

fn decrypt_into(identity: &Identity, file: &SyncableFile, out: &File) -> Result<()> {
    let input = File::open(&file.source).map_err(|e| Error::io(&file.source, e))?;
    ccsync_crypto::decrypt(identity, BufReader::new(input), out)
        .map_err(|e| Error::crypto(file.rel.as_str(), e))?;
    Ok(())
}
