//! Key import and export

use std::io::{self, IsTerminal, Read};

use dialoguer::Confirm;

use ccsync_core::{ConfigPaths, setup};

use crate::error::{CliError, Result};
use crate::ui;

pub fn run_import_key(paths: &ConfigPaths, force: bool) -> Result<()> {
    let mut force = force;
    if paths.key_file.exists() && !force {
        ui::warn(format!("Key already exists at {}", paths.key_file.display()));
        if !io::stdin().is_terminal() {
            return Err(CliError::user(
                "refusing to replace the existing key; pass --force",
            ));
        }
        let replace = Confirm::new()
            .with_prompt("Overwrite existing key?")
            .default(false)
            .interact()?;
        if !replace {
            ui::info("Aborted.");
            return Ok(());
        }
        force = true;
    }

    if io::stdin().is_terminal() {
        println!("Paste your age private key (starts with AGE-SECRET-KEY-):");
        println!("Press Ctrl+D (Unix) or Ctrl+Z then Enter (Windows) when done.");
        println!();
    }

    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;

    let public_key = setup::import_key(paths, &content, force)?;
    ui::success("Key imported successfully!");
    ui::info(format!("Public key: {public_key}"));
    Ok(())
}

pub fn run_export_key(paths: &ConfigPaths) -> Result<()> {
    let content = setup::export_key(paths)?;
    if io::stdout().is_terminal() {
        ui::warn("Keep this key secret. Anyone holding it can decrypt your synced files.");
        println!();
    }
    print!("{content}");
    Ok(())
}
