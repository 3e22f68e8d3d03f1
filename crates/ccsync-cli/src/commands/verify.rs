//! The verify command

use ccsync_core::{ConfigPaths, EntryStatus, SyncEngine};

use crate::error::Result;
use crate::ui;

pub fn run_verify(paths: ConfigPaths) -> Result<()> {
    let engine = SyncEngine::load(paths)?;
    ui::info("Verifying repository against manifest...");

    let report = engine.verify()?;
    for check in &report.checks {
        match &check.status {
            EntryStatus::Ok => ui::success(format!("{}", check.entry.path)),
            EntryStatus::Missing => ui::error(format!("Missing: {}", check.entry.path)),
            EntryStatus::Mismatch { .. } => {
                ui::error(format!("Checksum mismatch: {}", check.entry.path))
            }
        }
    }

    report.ensure_intact()?;
    ui::success(format!("All {} files verified.", report.ok_count()));
    Ok(())
}
