//! The doctor command

use ccsync_core::{CheckLevel, ConfigPaths, setup};

use crate::error::Result;
use crate::ui;

pub fn run_doctor(paths: &ConfigPaths) -> Result<()> {
    ui::info("Checking claude-code-sync setup...");
    println!();

    let checks = setup::doctor(paths);
    for check in &checks {
        let line = format!("{}: {}", check.name, check.detail);
        match check.level {
            CheckLevel::Ok => ui::success(line),
            CheckLevel::Warn => ui::warn(line),
            CheckLevel::Fail => ui::error(line),
        }
    }

    let failed = checks.iter().filter(|c| c.level == CheckLevel::Fail).count();
    println!();
    if failed > 0 {
        ui::warn(format!(
            "{failed} required check(s) failed. Run 'claude-code-sync init' to set up."
        ));
    } else {
        ui::success("All required checks passed.");
    }
    Ok(())
}
