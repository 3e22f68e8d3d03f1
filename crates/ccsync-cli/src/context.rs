//! Location of the files the CLI operates on

use std::path::Path;

use ccsync_core::ConfigPaths;

use crate::error::Result;

/// Layout under `home`, or under the user's home directory.
pub fn resolve_paths(home: Option<&Path>) -> Result<ConfigPaths> {
    let paths = match home {
        Some(home) => ConfigPaths::from_home(home),
        None => ConfigPaths::discover()?,
    };
    tracing::debug!(sync_dir = %paths.sync_dir.display(), "resolved paths");
    Ok(paths)
}
