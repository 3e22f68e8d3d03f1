//! Portable placeholders for the config directory path
//!
//! Plugin configuration records absolute paths into the config directory.
//! On push those paths become [`PLACEHOLDER`]; on pull the placeholder is
//! expanded to this machine's directory in its native form.

use std::fs;
use std::path::Path;

use serde_json::Value;

use ccsync_fs::{NormalizedPath, io};

use crate::Result;
use crate::walk::walk_files;

/// Token standing in for the config directory inside synced payloads.
pub const PLACEHOLDER: &str = "$CLAUDE_DIR";

/// The three spellings a directory can take inside a serialized payload:
/// JSON-escaped backslashes, forward slashes, and as-is.
fn spellings(config_dir: &str) -> [String; 3] {
    [
        config_dir.replace('\\', "\\\\"),
        config_dir.replace('\\', "/"),
        config_dir.to_string(),
    ]
}

/// Whether `payload` mentions `config_dir` in any spelling.
pub fn embeds_dir(payload: &str, config_dir: &str) -> bool {
    !config_dir.is_empty()
        && spellings(config_dir)
            .iter()
            .any(|form| payload.contains(form.as_str()))
}

/// Replace every spelling of `config_dir` in `payload` with the
/// placeholder.
pub fn normalize(payload: &str, config_dir: &str) -> String {
    if config_dir.is_empty() {
        return payload.to_string();
    }
    spellings(config_dir)
        .iter()
        .fold(payload.to_string(), |acc, form| acc.replace(form.as_str(), PLACEHOLDER))
}

/// Replace the placeholder in `payload` with `config_dir`.
///
/// The payload is parsed as JSON and only string leaves are rewritten, then
/// re-serialized with two-space indentation. When `config_dir` has no
/// backslashes, backslashes in rewritten leaves become forward slashes.
/// Payloads that do not parse get a textual substitution instead.
pub fn expand(payload: &str, config_dir: &str) -> String {
    let Ok(mut value) = serde_json::from_str::<Value>(payload) else {
        return fallback_expand(payload, config_dir);
    };

    expand_value(&mut value, config_dir);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| fallback_expand(payload, config_dir))
}

fn expand_value(value: &mut Value, config_dir: &str) {
    match value {
        Value::Object(map) => map
            .values_mut()
            .for_each(|v| expand_value(v, config_dir)),
        Value::Array(items) => items.iter_mut().for_each(|v| expand_value(v, config_dir)),
        Value::String(s) if s.contains(PLACEHOLDER) => {
            let mut expanded = s.replace(PLACEHOLDER, config_dir);
            if !config_dir.contains('\\') {
                expanded = expanded.replace('\\', "/");
            }
            *s = expanded;
        }
        _ => {}
    }
}

/// Text substitution for payloads that are not valid JSON.
///
/// With a backslash directory the JSON-escaped spelling is inserted. With a
/// forward-slash directory, escaped backslashes are turned into `/` on the
/// lines that held the placeholder and nowhere else.
fn fallback_expand(payload: &str, config_dir: &str) -> String {
    if config_dir.contains('\\') {
        return payload.replace(PLACEHOLDER, &config_dir.replace('\\', "\\\\"));
    }

    payload
        .split_inclusive('\n')
        .map(|line| {
            if line.contains(PLACEHOLDER) {
                line.replace(PLACEHOLDER, config_dir).replace("\\\\", "/")
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn json_files(root: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    Ok(walk_files(root)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect())
}

/// Normalize every `.json` file under `subtree` that embeds `config_dir`.
///
/// Returns the rewritten files relative to `base`. Unreadable files are
/// skipped.
pub fn normalize_tree(base: &Path, subtree: &Path, config_dir: &str) -> Result<Vec<NormalizedPath>> {
    let mut rewritten = Vec::new();
    for file in json_files(subtree)? {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        if !embeds_dir(&content, config_dir) {
            continue;
        }

        io::write_text(&file, &normalize(&content, config_dir))?;
        if let Some(rel) = NormalizedPath::relative(base, &file) {
            tracing::debug!(file = %rel, "normalized paths");
            rewritten.push(rel);
        }
    }
    Ok(rewritten)
}

/// Expand the placeholder in every `.json` file under `subtree` that
/// contains it.
///
/// Returns the rewritten files relative to `base`.
pub fn expand_tree(base: &Path, subtree: &Path, config_dir: &str) -> Result<Vec<NormalizedPath>> {
    let mut rewritten = Vec::new();
    for file in json_files(subtree)? {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        if !content.contains(PLACEHOLDER) {
            continue;
        }

        io::write_text(&file, &expand(&content, config_dir))?;
        if let Some(rel) = NormalizedPath::relative(base, &file) {
            tracing::debug!(file = %rel, "expanded paths");
            rewritten.push(rel);
        }
    }
    Ok(rewritten)
}
