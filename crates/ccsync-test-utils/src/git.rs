//! Git repository fixtures.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `path`, panicking with stderr on failure.
pub fn run_git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure a throwaway identity so commits and merges never prompt.
pub fn configure_identity(path: &Path) {
    run_git(path, &["config", "user.email", "test@test.com"]);
    run_git(path, &["config", "user.name", "Test User"]);
    run_git(path, &["config", "commit.gpgsign", "false"]);
}

/// `git init` plus a throwaway identity and one commit holding a README.
pub fn repo_with_commit(path: &Path) {
    fs::create_dir_all(path).unwrap();
    run_git(path, &["init"]);
    configure_identity(path);

    fs::write(path.join("README.md"), "# Claude Code Sync\n")
        .unwrap_or_else(|e| panic!("failed to write README.md: {e}"));

    run_git(path, &["add", "."]);
    run_git(path, &["commit", "-m", "Initial commit"]);
}

/// Create a bare repository usable as a push/pull remote.
pub fn bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    run_git(path, &["init", "--bare"]);
}
