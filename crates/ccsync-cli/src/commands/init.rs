//! The init command

use colored::Colorize;

use ccsync_core::{ConfigPaths, RepoSetup, setup};

use crate::error::Result;
use crate::ui;

pub fn run_init(paths: &ConfigPaths, repo_url: Option<&str>) -> Result<()> {
    ui::info("Initializing claude-code-sync...");

    let report = setup::init(paths, repo_url)?;

    match &report.new_secret_key {
        Some(secret) => {
            ui::success(format!("Generated age keypair at {}", paths.key_file.display()));
            println!();
            println!("{}", "IMPORTANT: back up your private key!".yellow().bold());
            println!("Without it, encrypted files cannot be recovered on another machine.");
            println!("Store it in a password manager, or move it with:");
            println!("  claude-code-sync export-key | claude-code-sync import-key");
            println!();
            println!("# public key: {}", report.public_key);
            println!("{}", secret.red());
            println!();
        }
        None => {
            ui::warn(format!("Key already exists at {}", paths.key_file.display()));
            ui::info(format!("Public key: {}", report.public_key));
        }
    }

    match &report.repo {
        RepoSetup::Existing => {
            ui::warn(format!("Repo already exists at {}", paths.repo_dir.display()));
            if let Some(url) = &report.remote_added {
                ui::info(format!("Added remote: {url}"));
            }
        }
        RepoSetup::Cloned { url } => ui::success(format!("Cloned {url}")),
        RepoSetup::Initialized => {
            ui::info("Created local repo.");
            println!();
            ui::info("No repo URL provided. To add a remote later:");
            println!(
                "  git -C {} remote add origin <your-repo-url>",
                paths.repo_dir.display()
            );
            println!("  claude-code-sync push");
        }
    }

    ui::success("Initialization complete!");
    Ok(())
}
