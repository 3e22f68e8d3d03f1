//! The push command

use ccsync_core::{ConfigPaths, PushAction, PushOptions, PushOutcome, SyncEngine};

use crate::error::Result;
use crate::ui;

pub fn run_push(paths: ConfigPaths, options: PushOptions) -> Result<()> {
    let repo_dir = paths.repo_dir.clone();
    let engine = SyncEngine::load(paths)?;

    if options.dry_run {
        ui::info("[DRY RUN] Would sync the following files:");
    } else {
        ui::info("Syncing files to repo...");
    }

    let report = engine.push(&options)?;

    for file in &report.files {
        let verb = match (file.action, options.dry_run) {
            (PushAction::Encrypt, true) => "  [encrypt]",
            (PushAction::Copy, true) => "  [copy]",
            (PushAction::Encrypt, false) => "Encrypted:",
            (PushAction::Copy, false) => "Copied:",
        };
        ui::info(format!("{verb} {}", file.rel));
    }

    if report.outcome == PushOutcome::DryRun {
        ui::info(format!("[DRY RUN] Would sync {} files", report.files_processed()));
        return Ok(());
    }

    for rel in &report.normalized {
        ui::info(format!("Normalized paths: {rel}"));
    }
    for warning in &report.warnings {
        ui::warn(warning);
    }

    if !report.platform_warnings.is_empty() {
        ui::warn("Platform-specific content detected without variants:");
        for w in &report.platform_warnings {
            ui::warn(format!("  {} contains {} syntax ({})", w.file, w.platform, w.matched));
            ui::info(format!("    Consider creating: {}", w.suggested));
        }
        ui::info("Use --no-platform-check to skip this warning");
    }

    ui::info(format!("Generated manifest with {} entries", report.manifest_entries));

    match report.outcome {
        PushOutcome::NoChanges => ui::info("No changes to commit."),
        PushOutcome::Pushed => {
            ui::success(format!("Pushed {} files to remote.", report.files_processed()))
        }
        PushOutcome::CommittedLocalOnly => {
            ui::warn("No remote configured. Changes committed locally only.");
            ui::info(format!(
                "Add a remote with: git -C {} remote add origin <url>",
                repo_dir.display()
            ));
        }
        PushOutcome::DryRun => {}
    }

    ui::success("Push complete!");
    Ok(())
}
