//! claude-code-sync CLI
//!
//! Syncs a Claude Code configuration directory across machines through a
//! git repository, encrypting sensitive files with age.

mod cli;
mod commands;
mod context;
mod error;
mod ui;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ccsync_core::{PullOptions, PushOptions};

use cli::{Cli, Commands};
use context::resolve_paths;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.home.as_deref()),
        None => {
            println!("{} Sync Claude Code configs across machines", "claude-code-sync".green().bold());
            println!();
            println!("Run {} for available commands.", "claude-code-sync --help".cyan());
            Ok(())
        }
    }
}

/// DEBUG with `--verbose`; otherwise whatever `RUST_LOG` asks for.
fn init_tracing(verbose: bool) {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        return;
    };

    if let Err(e) = result {
        eprintln!("failed to set tracing subscriber: {e}");
    }
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(cmd: Commands, home: Option<&Path>) -> Result<()> {
    let paths = || resolve_paths(home);
    match cmd {
        Commands::Init { repo_url } => commands::run_init(&paths()?, repo_url.as_deref()),
        Commands::Push {
            dry_run,
            no_platform_check,
        } => commands::run_push(
            paths()?,
            PushOptions {
                dry_run,
                platform_check: !no_platform_check,
            },
        ),
        Commands::Pull {
            ours,
            theirs,
            diff,
            dry_run,
        } => {
            let options = PullOptions::from_flags(ours, theirs, diff, dry_run)?;
            commands::run_pull(paths()?, options)
        }
        Commands::Status => commands::run_status(paths()?),
        Commands::Verify => commands::run_verify(paths()?),
        Commands::ImportKey { force } => commands::run_import_key(&paths()?, force),
        Commands::ExportKey => commands::run_export_key(&paths()?),
        Commands::Reset { keep_key, yes } => commands::run_reset(&paths()?, keep_key, yes),
        Commands::Unlink => commands::run_unlink(&paths()?),
        Commands::Doctor => commands::run_doctor(&paths()?),
        Commands::Version => commands::run_version(),
        Commands::CheckUpdate => commands::run_check_update(),
    }
}
