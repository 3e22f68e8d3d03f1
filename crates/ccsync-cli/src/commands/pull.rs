//! The pull command

use colored::Colorize;

use ccsync_core::{
    ConfigPaths, ConflictStrategy, DiffPreview, FileAction, PullOptions, PulledFile, SyncEngine,
};

use crate::error::Result;
use crate::ui;

pub fn run_pull(paths: ConfigPaths, options: PullOptions) -> Result<()> {
    let engine = SyncEngine::load(paths)?;

    match (options.dry_run, options.strategy) {
        (true, _) => ui::info("[DRY RUN] Would restore the following files:"),
        (false, ConflictStrategy::DiffOnly) => {
            ui::info("Comparing local vs remote (no changes will be applied):")
        }
        (false, ConflictStrategy::Ours) => {
            ui::info("Pulling with --ours: keeping local files where they differ")
        }
        (false, ConflictStrategy::Theirs) => ui::info("Restoring files..."),
    }

    let report = engine.pull(&options)?;

    if let Some(error) = &report.pull_error {
        ui::warn(format!("Pull failed: {error}"));
        ui::warn("You may need to resolve conflicts manually.");
        if let Some(age) = &report.staleness {
            ui::warn(format!("Using cached files from: {age}"));
        }
    }
    if let Some(archive) = &report.backup_archive {
        ui::info(format!("Backed up current config to {}", archive.display()));
    }
    for warning in &report.warnings {
        ui::warn(warning);
    }

    for file in &report.files {
        render_file(file);
    }
    for rel in &report.expanded {
        ui::info(format!("Expanded paths: {rel}"));
    }

    let count = report.files_processed();
    if options.dry_run {
        ui::info(format!("[DRY RUN] Would restore {count} files"));
    } else {
        match options.strategy {
            ConflictStrategy::DiffOnly => {
                ui::info(format!("Diff complete. {} files would be affected.", report.changed()));
                ui::info("Run 'claude-code-sync pull' to apply changes, or 'claude-code-sync pull --ours' to keep local.");
            }
            ConflictStrategy::Ours => ui::success(format!(
                "Pull complete (--ours)! Kept local versions, {count} files checked."
            )),
            ConflictStrategy::Theirs => ui::success(format!("Pull complete! Restored {count} files.")),
        }
    }
    Ok(())
}

fn render_file(file: &PulledFile) {
    let kind = if file.encrypted { "decrypt" } else { "copy" };
    match &file.action {
        FileAction::Planned => ui::info(format!("  [{kind}] {}", file.rel)),
        FileAction::Created => ui::info(format!("Restored: {}", file.rel)),
        FileAction::Updated { backup } => {
            ui::warn(format!("Conflict: backed up {} to {}", file.rel, backup.display()));
            ui::info(format!("Restored: {}", file.rel));
        }
        FileAction::Unchanged => tracing::debug!(file = %file.rel, "unchanged"),
        FileAction::KeptLocal => ui::info(format!("Keeping local: {}", file.rel)),
        FileAction::DiffNew => ui::info(format!("  [new] {}", file.rel)),
        FileAction::DiffChanged { preview } => {
            ui::info(format!("  [changed] {}", file.rel));
            match preview {
                Some(preview) => render_preview(preview),
                None if file.encrypted => println!("    (encrypted content differs)"),
                None => println!("    (content differs but no line-by-line diff available)"),
            }
        }
        FileAction::DiffUnchanged => tracing::debug!(file = %file.rel, "unchanged"),
    }
}

fn render_preview(preview: &DiffPreview) {
    println!("    Local:  {} lines", preview.local_lines);
    println!("    Remote: {} lines", preview.remote_lines);
    for line in &preview.lines {
        println!("    Line {}:", line.number);
        println!("      {}", format!("- {}", line.local).red());
        println!("      {}", format!("+ {}", line.remote).green());
    }
}
