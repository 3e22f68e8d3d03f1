//! Lifecycle of the sync-state directory: init, key import/export,
//! reset, unlink and health checks.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use ccsync_fs::io::{self, ensure_dir};
use ccsync_git::{GitRepo, REMOTE_NAME, VcsProvider};

use crate::config::SyncConfig;
use crate::paths::ConfigPaths;
use crate::{Error, Result};

/// How `init` obtained the repository working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSetup {
    /// A working copy was already present
    Existing,
    /// Cloned from the given URL
    Cloned { url: String },
    /// Created locally with an initial commit; no remote
    Initialized,
}

#[derive(Debug, Clone)]
pub struct InitReport {
    pub public_key: String,
    /// The secret key line, only when `init` generated it
    pub new_secret_key: Option<String>,
    pub repo: RepoSetup,
    /// Remote added to an existing working copy
    pub remote_added: Option<String>,
}

impl InitReport {
    pub fn key_created(&self) -> bool {
        self.new_secret_key.is_some()
    }
}

/// Whether `url` can be used as a remote: a well-formed git URL or an
/// existing local path.
pub fn is_usable_remote(url: &str) -> bool {
    ccsync_git::is_valid_repo_url(url) || Path::new(url).exists()
}

/// Prepare the sync-state directory, key and repository working copy.
///
/// An existing key is reused. With `url`, the repository is cloned (or,
/// when a working copy without a remote exists, the remote is added);
/// without it a local repository with an initial commit is created.
pub fn init(paths: &ConfigPaths, url: Option<&str>) -> Result<InitReport> {
    if let Some(url) = url
        && !is_usable_remote(url)
    {
        return Err(ccsync_git::Error::InvalidUrl {
            url: url.to_string(),
        }
        .into());
    }

    ensure_dir(&paths.sync_dir)?;
    ensure_dir(&paths.backup_dir)?;

    let (public_key, new_secret_key) = ensure_key(paths)?;

    let repo = GitRepo::new(&paths.repo_dir);
    let mut remote_added = None;
    let setup = if repo.is_repo() {
        if let Some(url) = url
            && !repo.has_remote()
        {
            repo.add_remote(REMOTE_NAME, url)?;
            remote_added = Some(url.to_string());
        }
        RepoSetup::Existing
    } else if let Some(url) = url {
        tracing::info!(url, "cloning sync repository");
        ccsync_git::clone(url, &paths.repo_dir)?;
        RepoSetup::Cloned {
            url: url.to_string(),
        }
    } else {
        repo.init()?;
        repo.create_initial_commit()?;
        RepoSetup::Initialized
    };

    if let Some(url) = url {
        SyncConfig::update_remote_url(&paths.config_file, Some(url))?;
    }

    Ok(InitReport {
        public_key,
        new_secret_key,
        repo: setup,
        remote_added,
    })
}

fn ensure_key(paths: &ConfigPaths) -> Result<(String, Option<String>)> {
    let crypto = |e| Error::crypto(paths.key_file.display().to_string(), e);

    if paths.key_file.is_file() {
        let content = io::read_text(&paths.key_file)?;
        let public_key = ccsync_crypto::public_key_from_content(&content).map_err(crypto)?;
        tracing::debug!("reusing existing key");
        return Ok((public_key, None));
    }

    let identity = ccsync_crypto::generate_identity();
    let content = ccsync_crypto::render_key_file(&identity, Utc::now());
    ccsync_crypto::save_key_file(&paths.key_file, &content).map_err(crypto)?;
    Ok((
        identity.to_public().to_string(),
        Some(ccsync_crypto::secret_key_line(&identity)),
    ))
}

/// Install key material read from elsewhere; returns its public key.
///
/// An existing key file is only replaced with `force`.
pub fn import_key(paths: &ConfigPaths, content: &str, force: bool) -> Result<String> {
    let label = paths.key_file.display().to_string();
    ccsync_crypto::validate_key_content(content).map_err(|e| Error::crypto(&label, e))?;

    if paths.key_file.exists() && !force {
        return Err(Error::InvalidArguments(format!(
            "a key already exists at {label}; use --force to replace it"
        )));
    }

    ensure_dir(&paths.sync_dir)?;
    let mut content = content.trim_end().to_string();
    content.push('\n');
    ccsync_crypto::save_key_file(&paths.key_file, &content).map_err(|e| Error::crypto(&label, e))?;
    ccsync_crypto::public_key_from_content(&content).map_err(|e| Error::crypto(&label, e))
}

/// Contents of the key file.
pub fn export_key(paths: &ConfigPaths) -> Result<String> {
    if !paths.key_file.is_file() {
        return Err(Error::NotInitialized {
            key_file: paths.key_file.clone(),
        });
    }
    Ok(io::read_text(&paths.key_file)?)
}

/// Delete local sync state; returns what was removed.
///
/// With `keep_key`, the key file survives and everything else the tool
/// created is removed. The local config directory is never touched.
pub fn reset(paths: &ConfigPaths, keep_key: bool) -> Result<Vec<PathBuf>> {
    let targets = if keep_key {
        vec![
            paths.repo_dir.clone(),
            paths.config_file.clone(),
            paths.backup_dir.clone(),
            paths.lock_file.clone(),
        ]
    } else {
        vec![paths.sync_dir.clone()]
    };

    let mut removed = Vec::new();
    for target in targets {
        let result = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else if target.exists() {
            fs::remove_file(&target)
        } else {
            continue;
        };
        result.map_err(|e| Error::io(&target, e))?;
        tracing::debug!(path = %target.display(), "removed");
        removed.push(target);
    }
    Ok(removed)
}

/// Disconnect the working copy from its remote, keeping local data.
pub fn unlink(paths: &ConfigPaths) -> Result<()> {
    let repo = GitRepo::new(&paths.repo_dir);
    if !repo.is_repo() {
        return Err(Error::NoRepo {
            path: paths.repo_dir.clone(),
        });
    }
    repo.remove_remote(REMOTE_NAME)?;
    SyncConfig::update_remote_url(&paths.config_file, None)?;
    Ok(())
}

/// Outcome of one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckLevel {
    Ok,
    /// Optional piece missing
    Warn,
    /// Required piece missing
    Fail,
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: &'static str,
    pub level: CheckLevel,
    pub detail: String,
}

impl HealthCheck {
    fn new(name: &'static str, ok: bool, required: bool, detail: impl Into<String>) -> Self {
        let level = match (ok, required) {
            (true, _) => CheckLevel::Ok,
            (false, true) => CheckLevel::Fail,
            (false, false) => CheckLevel::Warn,
        };
        Self {
            name,
            level,
            detail: detail.into(),
        }
    }
}

/// Check every prerequisite of push and pull.
pub fn doctor(paths: &ConfigPaths) -> Vec<HealthCheck> {
    let repo = GitRepo::new(&paths.repo_dir);
    let is_repo = repo.is_repo();
    let remote = is_repo.then(|| repo.remote_url(REMOTE_NAME)).flatten();

    let reachability = remote.as_deref().map(|url| match ccsync_git::check_remote(url) {
        Ok(()) => HealthCheck::new("remote reachable", true, false, url),
        Err(e) => HealthCheck::new("remote reachable", false, false, e.to_string()),
    });

    let mut checks = vec![
        HealthCheck::new("git", ccsync_git::is_installed(), true, "git executable on PATH"),
        HealthCheck::new("age", true, true, "built in"),
        HealthCheck::new(
            "sync directory",
            paths.sync_dir.is_dir(),
            true,
            paths.sync_dir.display().to_string(),
        ),
        HealthCheck::new(
            "key file",
            paths.key_file.is_file(),
            true,
            paths.key_file.display().to_string(),
        ),
        HealthCheck::new(
            "repository",
            is_repo,
            true,
            paths.repo_dir.display().to_string(),
        ),
        HealthCheck::new(
            "remote",
            remote.is_some(),
            false,
            remote.clone().unwrap_or_else(|| "not configured".into()),
        ),
        HealthCheck::new(
            "config directory",
            paths.claude_dir.is_dir(),
            false,
            paths.claude_dir.display().to_string(),
        ),
        HealthCheck::new(
            "config file",
            paths.claude_json.is_file(),
            false,
            paths.claude_json.display().to_string(),
        ),
    ];
    // Only probed when a remote is configured
    if let Some(check) = reachability {
        checks.insert(6, check);
    }
    checks
}
