//! End-to-end tests for the claude-code-sync binary.
//!
//! Every test points `--home` at a temporary directory so nothing touches
//! the real home directory.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

use ccsync_test_utils::home::TestHome;

/// Get a Command for the binary, rooted at `home`
fn sync_cmd(home: &TestHome) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("claude-code-sync"));
    cmd.env_remove("CLAUDE_CODE_SYNC_HOME")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .arg("--home")
        .arg(home.root());
    cmd
}

fn init(home: &TestHome) {
    sync_cmd(home).arg("init").assert().success();
    ccsync_test_utils::git::configure_identity(&home.repo_dir());
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_lists_commands() {
    let home = TestHome::new();
    sync_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("pull"))
        .stdout(predicate::str::contains("import-key"));
}

#[test]
fn test_version_command() {
    let home = TestHome::new();
    sync_cmd(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("v", env!("CARGO_PKG_VERSION"))));
}

// ============================================================================
// Preconditions
// ============================================================================

#[test]
fn test_push_before_init_fails() {
    let home = TestHome::new();
    home.write_local("CLAUDE.md", "hello");

    sync_cmd(&home)
        .arg("push")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_pull_rejects_conflicting_flags() {
    let home = TestHome::new();
    sync_cmd(&home)
        .args(["pull", "--ours", "--diff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_status_without_repo_fails() {
    let home = TestHome::new();
    sync_cmd(&home)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no repository"));
}

// ============================================================================
// Init, push, verify, status
// ============================================================================

#[test]
fn test_init_creates_layout() {
    let home = TestHome::new();
    sync_cmd(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("AGE-SECRET-KEY-"))
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(home.sync_dir().join("identity.key").is_file());
    assert!(home.repo_dir().join(".git").is_dir());
    assert!(home.backup_dir().is_dir());

    sync_cmd(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Key already exists"))
        .stdout(predicate::str::contains("AGE-SECRET-KEY-").not());
}

#[test]
fn test_push_dry_run_lists_files() {
    let home = TestHome::new();
    init(&home);
    home.write_local("settings.json", "{}");
    home.write_local("CLAUDE.md", "hello");
    home.write_local("todos/1.json", "[]");

    sync_cmd(&home)
        .args(["push", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[encrypt] settings.json"))
        .stdout(predicate::str::contains("[copy] CLAUDE.md"))
        .stdout(predicate::str::contains("todos").not())
        .stdout(predicate::str::contains("Would sync 2 files"));

    assert!(!home.repo_dir().join("CLAUDE.md").exists());
}

#[test]
fn test_push_then_verify_and_status() {
    let home = TestHome::new();
    init(&home);
    home.write_local("settings.json", r#"{"key":"v"}"#);
    home.write_local("CLAUDE.md", "hello");

    sync_cmd(&home)
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("No remote configured"))
        .stdout(predicate::str::contains("Push complete!"));

    assert_eq!(home.read_repo("CLAUDE.md"), b"hello");
    assert!(home.repo_dir().join("settings.json.age").is_file());

    sync_cmd(&home)
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("All 3 files verified."));

    sync_cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not configured"))
        .stdout(predicate::str::contains("[encrypted] settings.json"))
        .stdout(predicate::str::contains("[plain] CLAUDE.md"));
}

#[test]
fn test_verify_fails_on_tampering() {
    let home = TestHome::new();
    init(&home);
    home.write_local("CLAUDE.md", "hello");
    sync_cmd(&home).arg("push").assert().success();

    home.write_repo("CLAUDE.md", "tampered");

    sync_cmd(&home)
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch: CLAUDE.md"))
        .stderr(predicate::str::contains("integrity check failed: 1 file(s)"));
}

// ============================================================================
// Pull
// ============================================================================

#[test]
fn test_pull_diff_then_apply() {
    let home = TestHome::new();
    init(&home);
    home.write_local("CLAUDE.md", "hello");
    sync_cmd(&home).arg("push").assert().success();
    home.write_local("CLAUDE.md", "changed");

    sync_cmd(&home)
        .args(["pull", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[changed] CLAUDE.md"))
        .stdout(predicate::str::contains("- changed"))
        .stdout(predicate::str::contains("+ hello"));
    assert_eq!(home.read_local("CLAUDE.md"), "changed");

    sync_cmd(&home)
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("Conflict: backed up CLAUDE.md"))
        .stdout(predicate::str::contains("Pull complete!"));
    assert_eq!(home.read_local("CLAUDE.md"), "hello");
    assert!(!home.backup_names().is_empty());
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_export_then_import_key() {
    let first = TestHome::new();
    init(&first);
    let exported = sync_cmd(&first)
        .arg("export-key")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let exported = String::from_utf8(exported).unwrap();
    assert!(exported.contains("AGE-SECRET-KEY-"));

    let second = TestHome::new();
    sync_cmd(&second)
        .arg("import-key")
        .write_stdin(exported.clone())
        .assert()
        .success()
        .stdout(predicate::str::contains("Key imported successfully!"))
        .stdout(predicate::str::contains("Public key: age1"));

    let imported = fs::read_to_string(second.sync_dir().join("identity.key")).unwrap();
    assert_eq!(imported.trim(), exported.trim());

    sync_cmd(&second)
        .arg("import-key")
        .write_stdin(exported)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_import_key_rejects_garbage() {
    let home = TestHome::new();
    sync_cmd(&home)
        .args(["import-key", "--force"])
        .write_stdin("not a key")
        .assert()
        .failure();
    assert!(!home.sync_dir().join("identity.key").exists());
}

// ============================================================================
// Reset, unlink, doctor
// ============================================================================

#[test]
fn test_reset_keep_key() {
    let home = TestHome::new();
    init(&home);

    sync_cmd(&home)
        .args(["reset", "--keep-key", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key preserved"));

    assert!(home.sync_dir().join("identity.key").is_file());
    assert!(!home.repo_dir().exists());
}

#[test]
fn test_reset_requires_typed_confirmation() {
    let home = TestHome::new();
    init(&home);

    sync_cmd(&home)
        .arg("reset")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));
    assert!(home.sync_dir().exists());

    sync_cmd(&home)
        .arg("reset")
        .write_stdin("yes\n")
        .assert()
        .success();
    assert!(!home.sync_dir().exists());
}

#[test]
fn test_unlink_without_remote_fails() {
    let home = TestHome::new();
    init(&home);

    sync_cmd(&home)
        .arg("unlink")
        .assert()
        .failure()
        .stderr(predicate::str::contains("origin"));
}

#[test]
fn test_unlink_removes_remote() {
    let home = TestHome::new();
    init(&home);
    home.add_bare_remote();

    sync_cmd(&home).arg("unlink").assert().success();

    let repo = git2::Repository::open(home.repo_dir()).unwrap();
    assert!(repo.find_remote("origin").is_err());
}

#[test]
fn test_doctor_reports_missing_key() {
    let home = TestHome::new();
    sync_cmd(&home)
        .arg("doctor")
        .assert()
        .success()
        .stderr(predicate::str::contains("key file"))
        .stdout(predicate::str::contains("required check(s) failed"));
}
