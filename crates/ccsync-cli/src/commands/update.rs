//! Version reporting and the release check

use std::time::Duration;

use colored::Colorize;
use semver::Version;
use serde::Deserialize;

use crate::error::{CliError, Result};
use crate::ui;

const REPO_OWNER: &str = "felixisaac";
const REPO_NAME: &str = "claude-code-sync";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Version of the running binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    html_url: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// How the running version relates to the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Available { latest: Version },
}

/// Compare `current` against a release tag such as `v1.2.3`.
pub fn compare_versions(current: &str, tag: &str) -> Result<UpdateStatus> {
    let parse = |v: &str| {
        Version::parse(v.trim_start_matches('v'))
            .map_err(|e| CliError::user(format!("invalid version '{v}': {e}")))
    };
    let current = parse(current)?;
    let latest = parse(tag)?;

    if latest > current {
        Ok(UpdateStatus::Available { latest })
    } else {
        Ok(UpdateStatus::UpToDate)
    }
}

/// Release archive name for this platform.
fn asset_name() -> String {
    let ext = if cfg!(windows) { "zip" } else { "tar.gz" };
    format!(
        "{REPO_NAME}_{}_{}.{ext}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn latest_release() -> Result<Release> {
    let url = format!("https://api.github.com/repos/{REPO_OWNER}/{REPO_NAME}/releases/latest");
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("claude-code-sync/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client.get(&url).send()?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(CliError::user("no releases found"));
    }
    Ok(response.error_for_status()?.json()?)
}

pub fn run_version() -> Result<()> {
    println!("claude-code-sync v{CURRENT_VERSION}");
    Ok(())
}

pub fn run_check_update() -> Result<()> {
    ui::info("Checking for updates...");

    let release = latest_release()?;
    match compare_versions(CURRENT_VERSION, &release.tag_name)? {
        UpdateStatus::UpToDate => {
            ui::success(format!("You're on the latest version (v{CURRENT_VERSION})"));
        }
        UpdateStatus::Available { latest } => {
            println!();
            println!(
                "{}",
                format!("Update available: v{CURRENT_VERSION} -> v{latest}").yellow()
            );
            println!();
            println!("Download:");
            println!("  {}", release.html_url);

            let wanted = asset_name();
            if let Some(asset) = release.assets.iter().find(|a| a.name == wanted) {
                println!();
                println!("Direct download for your platform:");
                println!("  {}", asset.browser_download_url);
            }
            println!();
            ui::info("To update: download and replace your current binary");
        }
    }
    Ok(())
}
