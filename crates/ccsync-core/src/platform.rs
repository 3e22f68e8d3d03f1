//! Platform-variant file names
//!
//! A file named `name.windows.ext` or `name.unix.ext` is only restored on
//! the matching platform. Files without a tag are restored everywhere.

use std::fmt;

/// A platform a variant can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// The platform this binary runs on.
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Unix => "unix",
        }
    }

    /// The platform a variant for the other side would target.
    pub fn other(self) -> Self {
        match self {
            Self::Windows => Self::Unix,
            Self::Unix => Self::Windows,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Windows => ".windows.",
            Self::Unix => ".unix.",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn file_name(rel_path: &str) -> &str {
    rel_path.rsplit(['/', '\\']).next().unwrap_or(rel_path)
}

/// The platform a variant file targets, if it carries a tag.
pub fn variant_platform(rel_path: &str) -> Option<Platform> {
    let name = file_name(rel_path);
    [Platform::Windows, Platform::Unix]
        .into_iter()
        .find(|p| name.contains(p.tag()))
}

/// Whether the file name carries a platform tag.
pub fn is_platform_variant(rel_path: &str) -> bool {
    variant_platform(rel_path).is_some()
}

/// Whether the file is a variant for a platform other than `current`.
pub fn should_skip_for_platform(rel_path: &str, current: Platform) -> bool {
    variant_platform(rel_path).is_some_and(|p| p != current)
}

/// Name of the `platform` variant of `rel_path`:
/// `commands/deploy.md` becomes `commands/deploy.windows.md`.
pub fn variant_name(rel_path: &str, platform: Platform) -> String {
    let name_start = rel_path.len() - file_name(rel_path).len();
    let ext_start = rel_path[name_start..]
        .rfind('.')
        .map(|idx| name_start + idx)
        .unwrap_or(rel_path.len());

    format!(
        "{}.{}{}",
        &rel_path[..ext_start],
        platform.as_str(),
        &rel_path[ext_start..]
    )
}
