//! SyncEngine: owns the paths, configuration and VCS collaborator that
//! push, pull, verify and status share.

use ccsync_crypto::{Identity, Recipient};
use ccsync_fs::io;
use ccsync_git::{GitRepo, VcsProvider};

use crate::classify::PatternSet;
use crate::config::SyncConfig;
use crate::paths::ConfigPaths;
use crate::platform::Platform;
use crate::{Error, Result};

/// Engine for moving the local config directory to and from the sync
/// repository.
///
/// Generic over the version-control collaborator so tests can substitute
/// a recording double for [`GitRepo`].
pub struct SyncEngine<V: VcsProvider = GitRepo> {
    paths: ConfigPaths,
    config: SyncConfig,
    patterns: PatternSet,
    platform: Platform,
    vcs: V,
}

impl SyncEngine<GitRepo> {
    /// Create an engine backed by the git working copy at
    /// `paths.repo_dir`.
    pub fn new(paths: ConfigPaths, config: SyncConfig) -> Self {
        let vcs = GitRepo::new(&paths.repo_dir);
        Self::with_vcs(paths, config, vcs)
    }

    /// Create an engine with the configuration file found in `paths`.
    pub fn load(paths: ConfigPaths) -> Result<Self> {
        let config = SyncConfig::load(&paths.config_file)?;
        Ok(Self::new(paths, config))
    }
}

impl<V: VcsProvider> SyncEngine<V> {
    /// Create an engine with an explicit version-control collaborator.
    pub fn with_vcs(paths: ConfigPaths, config: SyncConfig, vcs: V) -> Self {
        let patterns = config.pattern_set();
        Self {
            paths,
            config,
            patterns,
            platform: Platform::current(),
            vcs,
        }
    }

    /// Override the platform used to select platform variants.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    pub(crate) fn require_key(&self) -> Result<()> {
        if self.paths.key_file.is_file() {
            Ok(())
        } else {
            Err(Error::NotInitialized {
                key_file: self.paths.key_file.clone(),
            })
        }
    }

    pub(crate) fn require_repo(&self) -> Result<()> {
        if self.paths.repo_dir.is_dir() {
            Ok(())
        } else {
            Err(Error::NoRepo {
                path: self.paths.repo_dir.clone(),
            })
        }
    }

    pub(crate) fn key_file_label(&self) -> String {
        self.paths.key_file.display().to_string()
    }

    /// The recipient files are encrypted to, from the key file.
    pub(crate) fn load_recipient(&self) -> Result<Recipient> {
        let content = io::read_text(&self.paths.key_file)?;
        ccsync_crypto::public_key_from_content(&content)
            .and_then(|key| ccsync_crypto::parse_recipient(&key))
            .map_err(|e| Error::crypto(self.key_file_label(), e))
    }

    /// The identity used to decrypt, from the key file.
    pub(crate) fn load_identity(&self) -> Result<Identity> {
        ccsync_crypto::load_identity(&self.paths.key_file)
            .map_err(|e| Error::crypto(self.key_file_label(), e))
    }
}
