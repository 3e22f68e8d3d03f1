//! Checksum manifest: the repository's integrity ledger
//!
//! The manifest is regenerated wholesale on every push:
//!
//! ```text
//! # claude-code-sync manifest - 2026-01-01T12:00:00+00:00
//! # Format: checksum  path
//! <sha256-hex>  CLAUDE.md
//! <sha256-hex>  settings.json.age
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};

use ccsync_fs::constants::is_vcs_metadata;
use ccsync_fs::{NormalizedPath, RepoEntry, file_digest, io};

use crate::walk::walk_files;
use crate::{Error, Result};

const HEADER_PREFIX: &str = "# claude-code-sync manifest - ";
const FORMAT_LINE: &str = "# Format: checksum  path";
const SEPARATOR: &str = "  ";

/// One line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Lowercase hex SHA-256 of the file content
    pub digest: String,
    /// Forward-slash path relative to the tree root
    pub path: NormalizedPath,
}

/// Result of checking one manifest entry against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Ok,
    /// The file no longer exists
    Missing,
    /// The file's digest differs from the recorded one
    Mismatch { actual: String },
}

/// A manifest entry paired with its verification outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCheck {
    pub entry: ManifestEntry,
    pub status: EntryStatus,
}

impl EntryCheck {
    pub fn is_ok(&self) -> bool {
        self.status == EntryStatus::Ok
    }
}

/// Digest every file under `tree_root` except version-control metadata
/// and the manifest itself, in walk order.
pub fn generate(tree_root: &Path) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();

    for path in walk_files(tree_root)? {
        let Some(rel) = NormalizedPath::relative(tree_root, &path) else {
            continue;
        };
        if is_vcs_metadata(rel.as_str()) || rel.as_str() == RepoEntry::Manifest.as_str() {
            continue;
        }

        let digest = file_digest(&path).map_err(|e| Error::io(&path, e))?;
        entries.push(ManifestEntry { digest, path: rel });
    }

    tracing::debug!(count = entries.len(), "generated manifest");
    Ok(entries)
}

/// Serialize entries with a header stamped `generated`.
pub fn render(entries: &[ManifestEntry], generated: DateTime<Utc>) -> String {
    let mut out = format!("{HEADER_PREFIX}{}\n{FORMAT_LINE}\n", generated.to_rfc3339());
    for entry in entries {
        out.push_str(&entry.digest);
        out.push_str(SEPARATOR);
        out.push_str(entry.path.as_str());
        out.push('\n');
    }
    out
}

/// Write entries to `path`, replacing any previous manifest.
pub fn write(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    io::write_text(path, &render(entries, Utc::now()))?;
    Ok(())
}

/// Parse manifest text. Blank lines, comments and lines without the
/// two-space separator are ignored.
pub fn parse(content: &str) -> Vec<ManifestEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (digest, path) = line.split_once(SEPARATOR)?;
            Some(ManifestEntry {
                digest: digest.to_string(),
                path: NormalizedPath::from(path),
            })
        })
        .collect()
}

/// Read the manifest at `path`.
pub fn read(path: &Path) -> Result<Vec<ManifestEntry>> {
    if !path.exists() {
        return Err(Error::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(parse(&io::read_text(path)?))
}

/// Check every entry of the manifest at `manifest_path` against the files
/// under `tree_root`.
///
/// Files in the tree that the manifest does not list are not reported.
pub fn verify(tree_root: &Path, manifest_path: &Path) -> Result<Vec<EntryCheck>> {
    read(manifest_path)?
        .into_iter()
        .map(|entry| {
            let file = entry.path.under(tree_root);
            let status = if !file.is_file() {
                EntryStatus::Missing
            } else {
                let actual = file_digest(&file).map_err(|e| Error::io(&file, e))?;
                if actual == entry.digest {
                    EntryStatus::Ok
                } else {
                    EntryStatus::Mismatch { actual }
                }
            };
            Ok(EntryCheck { entry, status })
        })
        .collect()
}
