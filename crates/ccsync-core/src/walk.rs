//! Tree walking and per-file classification

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use ccsync_fs::constants::{ENCRYPTED_SUFFIX, is_vcs_metadata};
use ccsync_fs::{NormalizedPath, RepoEntry};

use crate::Result;
use crate::classify::{Classification, PatternSet};
use crate::platform::Platform;

/// A file found by a walk, with the decision made for it.
///
/// Only lives for the duration of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncableFile {
    /// Absolute path of the file on disk
    pub source: PathBuf,
    /// Logical relative path (encrypted suffix stripped)
    pub rel: NormalizedPath,
    pub classification: Classification,
}

/// Every regular file under `root`, in walk order (sorted by name within
/// each directory). Symlinks to files are included; symlinked directories
/// are not descended into and are reported with a warning.
pub fn walk_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else if entry.path_is_symlink() {
            if entry.path().is_file() {
                files.push(entry.into_path());
            } else if entry.path().is_dir() {
                tracing::warn!(path = %entry.path().display(), "skipping symlinked directory");
            }
        }
    }
    Ok(files)
}

/// Files under `root` as forward-slash paths relative to it.
pub fn walk_relative(root: &Path) -> Result<Vec<NormalizedPath>> {
    Ok(walk_files(root)?
        .iter()
        .filter_map(|path| NormalizedPath::relative(root, path))
        .collect())
}

/// Classify every file of the local config directory for push.
pub fn local_files(local_dir: &Path, patterns: &PatternSet) -> Result<Vec<SyncableFile>> {
    Ok(walk_files(local_dir)?
        .into_iter()
        .filter_map(|source| {
            let rel = NormalizedPath::relative(local_dir, &source)?;
            let classification = patterns.classify_local(rel.as_str());
            Some(SyncableFile {
                source,
                rel,
                classification,
            })
        })
        .collect())
}

/// Whether a repository path is bookkeeping that is never synced back:
/// version-control metadata, the manifest or the root documentation file.
pub fn is_reserved(repo_rel: &str) -> bool {
    is_vcs_metadata(repo_rel)
        || repo_rel == RepoEntry::Manifest.as_str()
        || repo_rel == RepoEntry::Readme.as_str()
}

/// Classify every file of the repository working copy for pull.
///
/// Reserved entries are omitted. Logical paths have the encrypted suffix
/// stripped; classification is made against the logical path.
pub fn repo_files(
    repo_dir: &Path,
    patterns: &PatternSet,
    platform: Platform,
) -> Result<Vec<SyncableFile>> {
    Ok(walk_files(repo_dir)?
        .into_iter()
        .filter_map(|source| {
            let repo_rel = NormalizedPath::relative(repo_dir, &source)?;
            if is_reserved(repo_rel.as_str()) {
                return None;
            }

            let (rel, encrypted) = match repo_rel.strip_suffix(ENCRYPTED_SUFFIX) {
                Some(logical) => (logical, true),
                None => (repo_rel, false),
            };
            let classification = patterns.classify_repo(rel.as_str(), encrypted, platform);

            Some(SyncableFile {
                source,
                rel,
                classification,
            })
        })
        .collect())
}
