//! The status command

use colored::Colorize;

use ccsync_core::{Classification, ConfigPaths, RemoteState, SyncEngine, sync::short_hash};

use crate::error::Result;

pub fn run_status(paths: ConfigPaths) -> Result<()> {
    if !paths.repo_dir.is_dir() {
        return Err(ccsync_core::Error::NoRepo {
            path: paths.repo_dir.clone(),
        }
        .into());
    }

    let engine = SyncEngine::load(paths)?;
    let report = engine.status()?;
    let paths = engine.paths();

    println!("{}", "=== claude-code-sync status ===".cyan());
    println!();

    print!("Remote: ");
    match report.remote.unwrap_or(RemoteState::Unknown) {
        RemoteState::NotConfigured => println!("{}", "Not configured".yellow()),
        RemoteState::UpToDate { .. } => println!("{}", "Up to date".green()),
        RemoteState::OutOfSync { local, remote } => println!(
            "{}",
            format!(
                "Out of sync (local: {}, remote: {})",
                short_hash(&local),
                short_hash(&remote)
            )
            .yellow()
        ),
        RemoteState::Unknown => println!("{}", "Unknown".yellow()),
    }
    if let Some(commit) = &report.last_commit {
        println!("Last commit: {commit}");
    }

    println!();
    println!("Local files in {}:", paths.claude_dir.display());
    if report.local_files.is_empty() && !report.claude_json_present {
        println!("  (none)");
    }
    for file in &report.local_files {
        let tag = match file.classification {
            Classification::Excluded => "[excluded]".dimmed(),
            Classification::Encrypted => "[encrypted]".yellow(),
            _ => "[plain]".green(),
        };
        println!("  {tag} {}", file.rel);
    }
    if report.claude_json_present {
        println!("  {} {}", "[encrypted]".yellow(), paths.claude_json.display());
    }

    println!();
    println!("Repo files in {}:", paths.repo_dir.display());
    if report.repo_files.is_empty() {
        println!("  (none)");
    }
    for file in &report.repo_files {
        let tag = if file.encrypted {
            "[encrypted]".yellow()
        } else {
            "[plain]".green()
        };
        println!("  {tag} {}", file.rel);
    }

    Ok(())
}
