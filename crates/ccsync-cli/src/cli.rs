//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// claude-code-sync - Secure Claude Code config sync across machines
///
/// Syncs ~/.claude through a git repository. Sensitive files (API keys,
/// OAuth tokens) are encrypted with age before they leave the machine.
#[derive(Parser, Debug)]
#[command(name = "claude-code-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Home directory holding .claude, .claude.json and .claude-sync
    #[arg(long, global = true, env = "CLAUDE_CODE_SYNC_HOME")]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Set up the sync directory, key and repository
    ///
    /// Examples:
    ///   claude-code-sync init git@github.com:me/claude-config.git
    ///   claude-code-sync init              # local repository, add a remote later
    Init {
        /// Repository to clone
        repo_url: Option<String>,
    },

    /// Encrypt and push local config to the repository
    Push {
        /// Show what would be synced without making changes
        #[arg(long)]
        dry_run: bool,

        /// Skip the platform-specific content check
        #[arg(long)]
        no_platform_check: bool,
    },

    /// Pull and decrypt config from the repository
    ///
    /// By default remote files win and differing local files are backed up
    /// next to the original.
    Pull {
        /// Keep local files where they differ from the repository
        #[arg(long)]
        ours: bool,

        /// Overwrite local files with the repository's (default)
        #[arg(long)]
        theirs: bool,

        /// Show differences without applying them
        #[arg(long)]
        diff: bool,

        /// Show what would be restored without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Show sync status
    Status,

    /// Verify repository files against the manifest
    Verify,

    /// Import an age private key from stdin
    ImportKey {
        /// Replace an existing key without asking
        #[arg(long)]
        force: bool,
    },

    /// Print the age private key for backup or transfer
    ExportKey,

    /// Remove local sync data
    Reset {
        /// Keep the encryption key
        #[arg(long)]
        keep_key: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Disconnect the repository from its remote, keeping local data
    Unlink,

    /// Check prerequisites and configuration
    Doctor,

    /// Print version information
    Version,

    /// Check for a newer release
    CheckUpdate,
}
