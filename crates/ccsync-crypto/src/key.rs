//! Key generation, key-file rendering and parsing

use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use age::secrecy::ExposeSecret;
use age::x25519::{Identity, Recipient};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;

use ccsync_fs::io;

use crate::{Error, Result};

const SECRET_KEY_PREFIX: &str = "AGE-SECRET-KEY-";

static PUBLIC_KEY_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"# public key: (age1[a-z0-9]+)").unwrap());

/// Generate a fresh X25519 identity.
pub fn generate_identity() -> Identity {
    Identity::generate()
}

/// The `AGE-SECRET-KEY-...` token of `identity`.
pub fn secret_key_line(identity: &Identity) -> String {
    identity.to_string().expose_secret().to_string()
}

/// Render the key file content for `identity`:
///
/// ```text
/// # created: 2026-01-01T00:00:00Z
/// # public key: age1...
/// AGE-SECRET-KEY-...
/// ```
pub fn render_key_file(identity: &Identity, created: DateTime<Utc>) -> String {
    format!(
        "# created: {}\n# public key: {}\n{}\n",
        created.to_rfc3339_opts(SecondsFormat::Secs, true),
        identity.to_public(),
        secret_key_line(identity),
    )
}

/// Extract the identity from key material.
///
/// The first line (after trimming) that starts with `AGE-SECRET-KEY-` is
/// parsed; comment lines and anything else are ignored.
pub fn parse_identity(content: &str) -> Result<Identity> {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(SECRET_KEY_PREFIX))
        .ok_or(Error::MissingSecretKey)?;

    Identity::from_str(line).map_err(|e| Error::InvalidIdentity(e.to_string()))
}

/// Check that `content` holds a usable secret key.
pub fn validate_key_content(content: &str) -> Result<()> {
    parse_identity(content).map(|_| ())
}

/// Public key for key material.
///
/// Prefers the `# public key:` comment; falls back to deriving it from the
/// secret key.
pub fn public_key_from_content(content: &str) -> Result<String> {
    if let Some(captures) = PUBLIC_KEY_COMMENT.captures(content)
        && let Some(key) = captures.get(1)
    {
        return Ok(key.as_str().to_string());
    }

    let identity = parse_identity(content)?;
    Ok(identity.to_public().to_string())
}

/// Parse an `age1...` recipient.
pub fn parse_recipient(public_key: &str) -> Result<Recipient> {
    Recipient::from_str(public_key.trim()).map_err(|e| Error::InvalidRecipient(e.to_string()))
}

/// Load the identity stored in the key file at `path`.
pub fn load_identity(path: &Path) -> Result<Identity> {
    if !path.exists() {
        return Err(Error::KeyNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = io::read_text(path)?;
    parse_identity(&content)
}

/// Write key material to `path`, readable only by the owner.
pub fn save_key_file(path: &Path, content: &str) -> Result<()> {
    io::write_private(path, content.as_bytes())?;
    tracing::debug!(path = %path.display(), "wrote key file");
    Ok(())
}
