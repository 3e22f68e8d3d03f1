//! Atomic writes, private key files and small read/copy helpers

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Create `path` and all missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Hidden sibling of `path` used as the staging file for a write.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

#[cfg(unix)]
fn open_staging(path: &Path, private: bool) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if private {
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_staging(path: &Path, _private: bool) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

fn write_staged(path: &Path, content: &[u8], private: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let staging = staging_path(path);
    let mut file = open_staging(&staging, private).map_err(|e| Error::io(&staging, e))?;

    // Advisory lock so two writers of the same target cannot interleave
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    file.write_all(content).map_err(|e| Error::io(&staging, e))?;
    file.sync_all().map_err(|e| Error::io(&staging, e))?;
    file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    drop(file);

    fs::rename(&staging, path).map_err(|e| Error::io(path, e))
}

/// Replace `path` with `content` without ever exposing a partial file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_staged(path, content, false)
}

/// Like [`write_atomic`], readable by the owner only (0600 on Unix).
pub fn write_private(path: &Path, content: &[u8]) -> Result<()> {
    write_staged(path, content, true)?;

    // An existing file keeps its mode across the rename on some systems
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| Error::io(path, e))?;
    }
    Ok(())
}

/// Copy `src` to `dst`, creating the destination's parent directories.
///
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst).map_err(|e| Error::io(src, e))
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/manifest");

        write_atomic(&target, b"one").unwrap();
        write_atomic(&target, b"two").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"two");
        let names: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_private_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let key = temp.path().join("identity.key");

        write_private(&key, b"AGE-SECRET-KEY-1").unwrap();

        let mode = fs::metadata(&key).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn copy_file_reports_source_on_failure() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = copy_file(&missing, &temp.path().join("out")).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
