//! Backups taken before pull overwrites anything
//!
//! Two kinds exist: a zip archive of the whole local config directory taken
//! at the start of every pull, and a `.local-backup-<timestamp>` sibling
//! copy of a single file that is about to be replaced. Neither is read back
//! by the tool; restoring is manual.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use ccsync_fs::io::{copy_file, ensure_dir};
use ccsync_fs::NormalizedPath;

use crate::paths::CLAUDE_JSON_NAME;
use crate::walk::walk_files;
use crate::{Error, Result};

/// `strftime` format embedded in backup names and commit messages.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

const ARCHIVE_PREFIX: &str = "backup-";
const ARCHIVE_EXTENSION: &str = ".zip";
const FILE_BACKUP_MARKER: &str = ".local-backup-";

/// Local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `backup-<timestamp>.zip`
pub fn archive_name(timestamp: &str) -> String {
    format!("{ARCHIVE_PREFIX}{timestamp}{ARCHIVE_EXTENSION}")
}

/// Whether `name` is a backup archive file name.
pub fn is_archive_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_EXTENSION)
}

/// Archive the local config directory and the extra config file into
/// `dest`.
///
/// Directory entries are stored under the directory's own name
/// (`.claude/settings.json`); the extra file is stored as `.claude.json`.
/// Either input may be absent. Returns the number of files archived.
pub fn create_archive(claude_dir: &Path, claude_json: &Path, dest: &Path) -> Result<usize> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    let file = File::create(dest).map_err(|e| Error::io(dest, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut count = 0;

    if claude_dir.is_dir() {
        let archive_root = claude_dir.parent().unwrap_or(claude_dir);
        for path in walk_files(claude_dir)? {
            let Some(name) = NormalizedPath::relative(archive_root, &path) else {
                continue;
            };
            zip.start_file(name.as_str(), options)?;
            let mut src = File::open(&path).map_err(|e| Error::io(&path, e))?;
            io::copy(&mut src, &mut zip).map_err(|e| Error::io(&path, e))?;
            count += 1;
        }
    }

    if claude_json.is_file() {
        zip.start_file(CLAUDE_JSON_NAME, options)?;
        let mut src = File::open(claude_json).map_err(|e| Error::io(claude_json, e))?;
        io::copy(&mut src, &mut zip).map_err(|e| Error::io(claude_json, e))?;
        count += 1;
    }

    zip.finish()?.flush().map_err(|e| Error::io(dest, e))?;
    tracing::debug!(archive = %dest.display(), files = count, "created backup archive");
    Ok(count)
}

/// Delete the oldest archives in `backup_dir` so that at most `max_count`
/// remain. Archive names embed their timestamp, so name order is age order.
///
/// Returns the removed paths.
pub fn prune(backup_dir: &Path, max_count: usize) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(backup_dir).map_err(|e| Error::io(backup_dir, e))?;

    let mut archives: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_archive_name(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();

    if archives.len() <= max_count {
        return Ok(Vec::new());
    }

    archives.sort();
    let excess = archives.len() - max_count;
    let removed: Vec<PathBuf> = archives.into_iter().take(excess).collect();
    for path in &removed {
        fs::remove_file(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(archive = %path.display(), "pruned backup");
    }
    Ok(removed)
}

/// Path of the single-file backup of `path` taken at `timestamp`.
pub fn file_backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(FILE_BACKUP_MARKER);
    name.push(timestamp);
    PathBuf::from(name)
}

/// Copy `path` to its `.local-backup-<timestamp>` sibling.
pub fn backup_file(path: &Path, timestamp: &str) -> Result<PathBuf> {
    let backup = file_backup_path(path, timestamp);
    copy_file(path, &backup)?;
    Ok(backup)
}
