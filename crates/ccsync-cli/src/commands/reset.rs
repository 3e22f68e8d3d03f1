//! Reset and unlink

use std::io::{self, BufRead, Write};

use ccsync_core::{ConfigPaths, setup};

use crate::error::Result;
use crate::ui;

pub fn run_reset(paths: &ConfigPaths, keep_key: bool, yes: bool) -> Result<()> {
    if !paths.sync_dir.exists() {
        ui::info(format!(
            "Nothing to reset - {} does not exist.",
            paths.sync_dir.display()
        ));
        return Ok(());
    }

    println!();
    if keep_key {
        println!("This will delete:");
        println!("  - {} (local repo)", paths.repo_dir.display());
        println!("  - {} (config)", paths.config_file.display());
        println!("  - {} (backups)", paths.backup_dir.display());
        println!();
        println!("Your key at {} will be kept.", paths.key_file.display());
    } else {
        println!("This will delete {}, including your encryption key.", paths.sync_dir.display());
        println!("Export it first if you have not backed it up: claude-code-sync export-key");
    }
    println!();

    if !yes && !confirm_typed("Type 'yes' to continue: ")? {
        ui::info("Aborted.");
        return Ok(());
    }

    let removed = setup::reset(paths, keep_key)?;
    tracing::debug!(count = removed.len(), "reset removed paths");

    if keep_key {
        ui::success("Reset complete. Key preserved. Run 'claude-code-sync init <repo-url>' to reconnect.");
    } else {
        ui::success("Reset complete. All sync data removed.");
    }
    Ok(())
}

fn confirm_typed(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}

pub fn run_unlink(paths: &ConfigPaths) -> Result<()> {
    setup::unlink(paths)?;
    ui::success("Remote removed. Local repo, key and backups are kept.");
    ui::info("Reconnect with: git -C <repo> remote add origin <url>, or 'claude-code-sync reset --keep-key' and 'init <url>'.");
    Ok(())
}
