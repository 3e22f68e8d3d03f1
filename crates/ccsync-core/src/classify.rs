//! Pattern classifier
//!
//! Pure decisions over forward-slash relative paths. Nothing here touches
//! the filesystem.
//!
//! Encrypt and exclude patterns deliberately use different scopes:
//!
//! - encrypt: exact patterns compare with the base name; wildcard patterns
//!   compare with the base name or the whole relative path
//! - exclude (case-insensitive): exact patterns match the whole path, any
//!   `pattern/` prefix of it, or the base name; wildcard patterns compare
//!   with the base name only
//!
//! Existing synced repositories depend on this behaviour.

use regex::Regex;

use crate::config::{DEFAULT_ENCRYPT_PATTERNS, DEFAULT_EXCLUDE_PATTERNS};
use crate::platform::{Platform, should_skip_for_platform};

/// The glob marker recognised in patterns.
const WILDCARD: char = '*';

/// How a relative path is treated by a sync operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Copied verbatim
    Plain,
    /// Stored encrypted in the repository
    Encrypted,
    /// Never synced
    Excluded,
    /// A variant for another platform; not restored here
    PlatformSkipped,
}

impl Classification {
    /// Whether the file takes part in the operation.
    pub fn is_synced(self) -> bool {
        matches!(self, Self::Plain | Self::Encrypted)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Encrypted => "encrypted",
            Self::Excluded => "excluded",
            Self::PlatformSkipped => "other platform",
        }
    }
}

/// Encrypt and exclude patterns, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    encrypt: Vec<String>,
    exclude: Vec<String>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_ENCRYPT_PATTERNS.iter().map(|p| p.to_string()).collect(),
            DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        )
    }
}

impl PatternSet {
    pub fn new(encrypt: Vec<String>, exclude: Vec<String>) -> Self {
        Self { encrypt, exclude }
    }

    pub fn encrypt_patterns(&self) -> &[String] {
        &self.encrypt
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude
    }

    /// Whether `rel_path` is stored encrypted.
    pub fn should_encrypt(&self, rel_path: &str) -> bool {
        let rel_path = to_slash(rel_path);
        let name = base_name(&rel_path);

        self.encrypt.iter().any(|pattern| {
            if is_wildcard(pattern) {
                match_wildcard(name, pattern) || match_wildcard(&rel_path, pattern)
            } else {
                name == pattern
            }
        })
    }

    /// Whether `rel_path` is left out of sync entirely.
    pub fn should_exclude(&self, rel_path: &str) -> bool {
        let rel_lower = to_slash(rel_path).to_lowercase();
        let name_lower = base_name(&rel_lower);

        self.exclude.iter().any(|pattern| {
            let pattern_lower = pattern.to_lowercase();
            if is_wildcard(pattern) {
                match_wildcard(name_lower, &pattern_lower)
            } else {
                rel_lower == pattern_lower
                    || rel_lower
                        .strip_prefix(pattern_lower.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
                    || name_lower == pattern_lower
            }
        })
    }

    /// Classify a local file for push.
    ///
    /// Platform variants are pushed as-is so that every machine receives
    /// every variant.
    pub fn classify_local(&self, rel_path: &str) -> Classification {
        if self.should_exclude(rel_path) {
            Classification::Excluded
        } else if self.should_encrypt(rel_path) {
            Classification::Encrypted
        } else {
            Classification::Plain
        }
    }

    /// Classify a repository file for pull.
    ///
    /// `logical_path` has the encrypted suffix already stripped; `encrypted`
    /// says whether it was present.
    pub fn classify_repo(
        &self,
        logical_path: &str,
        encrypted: bool,
        platform: Platform,
    ) -> Classification {
        if self.should_exclude(logical_path) {
            Classification::Excluded
        } else if should_skip_for_platform(logical_path, platform) {
            Classification::PlatformSkipped
        } else if encrypted {
            Classification::Encrypted
        } else {
            Classification::Plain
        }
    }
}

/// Whether `pattern` contains the glob marker.
pub fn is_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARD)
}

/// Match `s` against `pattern`.
///
/// Without a marker this is equality. A single marker (`prefix*suffix`)
/// matches by prefix and suffix. Anything else is a glob in which `*` and
/// `?` never cross a `/`.
pub fn match_wildcard(s: &str, pattern: &str) -> bool {
    if !is_wildcard(pattern) {
        return s == pattern;
    }

    let parts: Vec<&str> = pattern.split(WILDCARD).collect();
    if let [prefix, suffix] = parts.as_slice() {
        return s.starts_with(prefix) && s.ends_with(suffix);
    }

    glob_to_regex(pattern).is_some_and(|re| re.is_match(s))
}

fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let mut source = String::with_capacity(pattern.len() * 2 + 2);
    source.push('^');
    for c in pattern.chars() {
        match c {
            '*' => source.push_str("[^/]*"),
            '?' => source.push_str("[^/]"),
            other => source.push_str(&regex::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source).ok()
}

fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
