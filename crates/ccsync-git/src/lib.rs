//! Git abstraction for claude-code-sync
//!
//! The sync engine only talks to version control through [`VcsProvider`].
//! [`GitRepo`] implements it with `git2` for local repository state and the
//! `git` executable for network transport, so credential helpers and SSH
//! agents configured for the user keep working.

pub mod command;
pub mod commits;
pub mod error;
pub mod provider;
pub mod repo;

pub use command::{check_remote, clone, is_installed, is_valid_repo_url};
pub use commits::{describe_age, last_commit_time};
pub use error::{Error, Result};
pub use provider::VcsProvider;
pub use repo::GitRepo;

/// Name of the remote the sync repository pushes to and pulls from.
pub const REMOTE_NAME: &str = "origin";
