//! SyncEngine tests against a recording version-control double

use std::cell::RefCell;
use std::fs;

use chrono::{DateTime, TimeZone, Utc};
use rstest::rstest;

use ccsync_core::{
    ConfigPaths, ConflictStrategy, Error, FileAction, Platform, PullOptions, PushAction,
    PushOptions, PushOutcome, SyncConfig, SyncEngine,
};
use ccsync_crypto::Identity;
use ccsync_git::VcsProvider;
use ccsync_test_utils::home::TestHome;

/// Records every call; behaviour is set per test.
#[derive(Default)]
struct RecordingVcs {
    calls: RefCell<Vec<&'static str>>,
    remote: bool,
    changes: bool,
    fail_pull: bool,
}

impl RecordingVcs {
    fn with_remote() -> Self {
        Self {
            remote: true,
            changes: true,
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl VcsProvider for RecordingVcs {
    fn is_repo(&self) -> bool {
        true
    }

    fn init(&self) -> ccsync_git::Result<()> {
        self.record("init");
        Ok(())
    }

    fn add_all(&self) -> ccsync_git::Result<()> {
        self.record("add_all");
        Ok(())
    }

    fn has_changes(&self) -> ccsync_git::Result<bool> {
        self.record("has_changes");
        Ok(self.changes)
    }

    fn commit(&self, _message: &str) -> ccsync_git::Result<()> {
        self.record("commit");
        Ok(())
    }

    fn has_remote(&self) -> bool {
        self.remote
    }

    fn add_remote(&self, _name: &str, _url: &str) -> ccsync_git::Result<()> {
        self.record("add_remote");
        Ok(())
    }

    fn remove_remote(&self, _name: &str) -> ccsync_git::Result<()> {
        self.record("remove_remote");
        Ok(())
    }

    fn push(&self) -> ccsync_git::Result<()> {
        self.record("push");
        Ok(())
    }

    fn pull(&self) -> ccsync_git::Result<()> {
        self.record("pull");
        if self.fail_pull {
            Err(ccsync_git::Error::Command {
                command: "pull".into(),
                stderr: "could not resolve host".into(),
            })
        } else {
            Ok(())
        }
    }

    fn fetch(&self) -> ccsync_git::Result<()> {
        self.record("fetch");
        Ok(())
    }

    fn local_commit(&self) -> ccsync_git::Result<Option<String>> {
        Ok(Some("a".repeat(40)))
    }

    fn remote_commit(&self) -> ccsync_git::Result<Option<String>> {
        Ok(Some("b".repeat(40)))
    }

    fn last_commit_time(&self) -> ccsync_git::Result<Option<DateTime<Utc>>> {
        Ok(Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()))
    }
}

/// Write a fresh key file into `home`'s sync directory.
fn install_key(home: &TestHome) -> Identity {
    let identity = ccsync_crypto::generate_identity();
    let content = ccsync_crypto::render_key_file(&identity, Utc::now());
    fs::create_dir_all(home.sync_dir()).unwrap();
    fs::write(home.sync_dir().join("identity.key"), content).unwrap();
    identity
}

fn engine(home: &TestHome, vcs: RecordingVcs) -> SyncEngine<RecordingVcs> {
    SyncEngine::with_vcs(
        ConfigPaths::from_home(home.root()),
        SyncConfig::with_defaults(),
        vcs,
    )
    .with_platform(Platform::Unix)
}

/// A home with a key, an empty repository directory and some local files.
fn prepared_home() -> (TestHome, Identity) {
    let home = TestHome::new();
    let identity = install_key(&home);
    fs::create_dir_all(home.repo_dir()).unwrap();
    home.write_local("settings.json", r#"{"key":"v"}"#);
    home.write_local("CLAUDE.md", "hello");
    (home, identity)
}

fn push_all(home: &TestHome) {
    engine(home, RecordingVcs::default())
        .push(&PushOptions::default())
        .unwrap();
}

mod push {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_requires_key() {
        let home = TestHome::new();
        home.write_local("CLAUDE.md", "hello");

        let err = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotInitialized { .. }), "got {err:?}");
    }

    #[test]
    fn test_push_requires_local_dir() {
        let home = TestHome::new();
        install_key(&home);

        let err = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NothingToSync { .. }), "got {err:?}");
    }

    #[test]
    fn test_push_requires_repo() {
        let home = TestHome::new();
        install_key(&home);
        home.write_local("CLAUDE.md", "hello");

        let err = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoRepo { .. }), "got {err:?}");
    }

    #[test]
    fn test_push_classifies_and_commits() {
        let (home, identity) = prepared_home();
        home.write_local("plans/foo.md", "draft");
        home.write_local("skills/pdf/resources/key.txt", "secret");
        fs::write(home.claude_json(), r#"{"numStartups":3}"#).unwrap();

        let vcs = RecordingVcs::with_remote();
        let engine = engine(&home, vcs);
        let report = engine.push(&PushOptions::default()).unwrap();

        assert_eq!(report.outcome, PushOutcome::Pushed);
        assert_eq!(report.files_processed(), 4);
        assert!(report.commit_message.as_deref().unwrap().starts_with("Sync "));
        assert_eq!(
            engine.vcs().calls(),
            vec!["add_all", "has_changes", "commit", "push"]
        );

        assert_eq!(home.read_repo("CLAUDE.md"), b"hello");
        assert!(!home.repo_dir().join("settings.json").exists());
        assert!(!home.repo_dir().join("plans").exists());

        let secret = home.read_repo("skills/pdf/resources/key.txt.age");
        assert_eq!(
            ccsync_crypto::decrypt_bytes(&identity, &secret).unwrap(),
            b"secret"
        );
        let extra = home.read_repo("claude.json.age");
        assert_eq!(
            ccsync_crypto::decrypt_bytes(&identity, &extra).unwrap(),
            br#"{"numStartups":3}"#
        );

        let manifest = String::from_utf8(home.read_repo(".sync-manifest")).unwrap();
        assert!(manifest.contains("  CLAUDE.md\n"));
        assert!(manifest.contains("  settings.json.age\n"));
    }

    #[test]
    fn test_push_actions() {
        let (home, _) = prepared_home();
        let report = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap();

        let actions: Vec<(String, PushAction)> = report
            .files
            .iter()
            .map(|f| (f.rel.as_str().to_string(), f.action))
            .collect();
        assert_eq!(
            actions,
            vec![
                ("CLAUDE.md".to_string(), PushAction::Copy),
                ("settings.json".to_string(), PushAction::Encrypt),
            ]
        );
    }

    #[test]
    fn test_push_without_changes_does_not_commit() {
        let (home, _) = prepared_home();
        let engine = engine(&home, RecordingVcs::default());

        let report = engine.push(&PushOptions::default()).unwrap();

        assert_eq!(report.outcome, PushOutcome::NoChanges);
        assert!(!report.committed());
        assert_eq!(engine.vcs().calls(), vec!["add_all", "has_changes"]);
    }

    #[test]
    fn test_push_without_remote_commits_locally() {
        let (home, _) = prepared_home();
        let vcs = RecordingVcs {
            changes: true,
            ..RecordingVcs::default()
        };
        let engine = engine(&home, vcs);

        let report = engine.push(&PushOptions::default()).unwrap();

        assert_eq!(report.outcome, PushOutcome::CommittedLocalOnly);
        assert!(report.committed());
        assert!(!report.pushed());
        assert!(!engine.vcs().calls().contains(&"push"));
    }

    #[test]
    fn test_push_dry_run_touches_nothing() {
        let home = TestHome::new();
        install_key(&home);
        home.write_local("settings.json", "{}");
        home.write_local("CLAUDE.md", "hello");

        let engine = engine(&home, RecordingVcs::with_remote());
        let report = engine
            .push(&PushOptions {
                dry_run: true,
                ..PushOptions::default()
            })
            .unwrap();

        assert_eq!(report.outcome, PushOutcome::DryRun);
        assert_eq!(report.files_processed(), 2);
        assert!(engine.vcs().calls().is_empty());
        assert!(!home.repo_dir().exists());
    }

    #[test]
    fn test_push_normalizes_plugin_paths() {
        let (home, _) = prepared_home();
        let claude_dir = home.claude_dir().to_string_lossy().replace('\\', "/");
        home.write_repo(
            "plugins/installed_plugins.json",
            format!(r#"{{"path":"{claude_dir}/plugins/cache/x"}}"#),
        );

        let report = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap();

        assert_eq!(report.normalized.len(), 1);
        let payload = String::from_utf8(home.read_repo("plugins/installed_plugins.json")).unwrap();
        assert!(payload.contains("$CLAUDE_DIR/plugins/cache/x"), "got {payload}");
    }

    #[test]
    fn test_push_warns_about_missing_platform_variant() {
        let (home, _) = prepared_home();
        home.write_local("commands/deploy.md", "Run `chmod +x ./deploy.sh` first\n");

        let report = engine(&home, RecordingVcs::default())
            .push(&PushOptions::default())
            .unwrap();
        assert_eq!(report.platform_warnings.len(), 1);
        assert_eq!(report.platform_warnings[0].file.as_str(), "commands/deploy.md");

        let report = engine(&home, RecordingVcs::default())
            .push(&PushOptions {
                platform_check: false,
                ..PushOptions::default()
            })
            .unwrap();
        assert!(report.platform_warnings.is_empty());
    }
}

mod pull {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(strategy: ConflictStrategy) -> PullOptions {
        PullOptions {
            strategy,
            dry_run: false,
        }
    }

    #[rstest]
    #[case(true, true, false, false)]
    #[case(false, true, true, false)]
    #[case(true, false, true, false)]
    #[case(true, false, false, true)]
    #[case(false, false, true, true)]
    fn test_conflicting_flags_are_rejected(
        #[case] ours: bool,
        #[case] theirs: bool,
        #[case] diff: bool,
        #[case] dry_run: bool,
    ) {
        let err = PullOptions::from_flags(ours, theirs, diff, dry_run).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[rstest]
    #[case(false, false, false, false, ConflictStrategy::Theirs)]
    #[case(false, true, false, false, ConflictStrategy::Theirs)]
    #[case(false, true, false, true, ConflictStrategy::Theirs)]
    #[case(true, false, false, false, ConflictStrategy::Ours)]
    #[case(false, false, true, false, ConflictStrategy::DiffOnly)]
    fn test_flags_select_strategy(
        #[case] ours: bool,
        #[case] theirs: bool,
        #[case] diff: bool,
        #[case] dry_run: bool,
        #[case] expected: ConflictStrategy,
    ) {
        let options = PullOptions::from_flags(ours, theirs, diff, dry_run).unwrap();
        assert_eq!(options.strategy, expected);
        assert_eq!(options.dry_run, dry_run);
    }

    #[test]
    fn test_pull_rejects_dry_run_with_strategy() {
        let (home, _) = prepared_home();
        let err = engine(&home, RecordingVcs::default())
            .pull(&PullOptions {
                strategy: ConflictStrategy::Ours,
                dry_run: true,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn test_pull_requires_repo() {
        let home = TestHome::new();
        install_key(&home);

        let err = engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NoRepo { .. }), "got {err:?}");
    }

    #[test]
    fn test_pull_theirs_backs_up_divergent_file() {
        let (home, _) = prepared_home();
        push_all(&home);
        home.write_local("CLAUDE.md", "edited locally");
        home.write_local("settings.json", r#"{"key":"local"}"#);

        let report = engine(&home, RecordingVcs::default())
            .pull(&options(ConflictStrategy::Theirs))
            .unwrap();

        assert_eq!(home.read_local("CLAUDE.md"), "hello");
        assert_eq!(home.read_local("settings.json"), r#"{"key":"v"}"#);
        assert_eq!(report.files_processed(), 2);
        for file in &report.files {
            let FileAction::Updated { backup } = &file.action else {
                panic!("expected an update for {}, got {:?}", file.rel, file.action);
            };
            assert!(backup.is_file());
        }

        let backups: Vec<String> = fs::read_dir(home.claude_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with("CLAUDE.md.local-backup-"))
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_pull_theirs_leaves_identical_files_alone() {
        let (home, _) = prepared_home();
        push_all(&home);

        let report = engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap();

        assert!(report.files.iter().all(|f| f.action == FileAction::Unchanged));
        let names: Vec<_> = fs::read_dir(home.claude_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert!(names.iter().all(|n| !n.contains(".local-backup-")), "{names:?}");
    }

    #[test]
    fn test_pull_ours_preserves_local() {
        let (home, _) = prepared_home();
        push_all(&home);
        home.write_local("CLAUDE.md", "mine");
        fs::remove_file(home.claude_dir().join("settings.json")).unwrap();

        let report = engine(&home, RecordingVcs::default())
            .pull(&options(ConflictStrategy::Ours))
            .unwrap();

        assert_eq!(home.read_local("CLAUDE.md"), "mine");
        assert_eq!(home.read_local("settings.json"), r#"{"key":"v"}"#);
        let actions: Vec<_> = report.files.iter().map(|f| f.action.clone()).collect();
        assert_eq!(actions, vec![FileAction::KeptLocal, FileAction::Created]);
    }

    #[test]
    fn test_pull_diff_only_mutates_nothing() {
        let (home, _) = prepared_home();
        home.write_local("notes.md", "one\ntwo\nthree");
        push_all(&home);
        home.write_local("notes.md", "one\nTWO\nthree\nfour");
        fs::remove_file(home.claude_dir().join("CLAUDE.md")).unwrap();

        let report = engine(&home, RecordingVcs::default())
            .pull(&options(ConflictStrategy::DiffOnly))
            .unwrap();

        home.assert_local_not_exists("CLAUDE.md");
        assert_eq!(home.read_local("notes.md"), "one\nTWO\nthree\nfour");
        assert_eq!(report.changed(), 2);

        let notes = report
            .files
            .iter()
            .find(|f| f.rel.as_str() == "notes.md")
            .unwrap();
        let FileAction::DiffChanged {
            preview: Some(preview),
        } = &notes.action
        else {
            panic!("expected a preview, got {:?}", notes.action);
        };
        assert_eq!(preview.local_lines, 4);
        assert_eq!(preview.remote_lines, 3);
        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.lines[0].number, 2);
        assert_eq!(preview.lines[0].local, "TWO");
        assert_eq!(preview.lines[0].remote, "two");

        let settings = report
            .files
            .iter()
            .find(|f| f.rel.as_str() == "settings.json")
            .unwrap();
        assert_eq!(settings.action, FileAction::DiffUnchanged);
    }

    #[test]
    fn test_pull_diff_only_stages_decrypted_content_beside_destination() {
        let (home, _) = prepared_home();
        push_all(&home);
        home.write_local("settings.json", r#"{"key":"local"}"#);
        let mut before: Vec<_> = fs::read_dir(home.claude_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        let report = engine(&home, RecordingVcs::default())
            .pull(&options(ConflictStrategy::DiffOnly))
            .unwrap();

        let settings = report
            .files
            .iter()
            .find(|f| f.rel.as_str() == "settings.json")
            .unwrap();
        assert_eq!(settings.action, FileAction::DiffChanged { preview: None });
        assert_eq!(home.read_local("settings.json"), r#"{"key":"local"}"#);
        let mut after: Vec<_> = fs::read_dir(home.claude_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        before.sort();
        after.sort();
        assert_eq!(after, before);
    }

    #[test]
    fn test_pull_dry_run_plans_only() {
        let (home, _) = prepared_home();
        push_all(&home);
        fs::remove_dir_all(home.claude_dir()).unwrap();

        let engine = engine(&home, RecordingVcs::with_remote());
        let report = engine
            .pull(&PullOptions {
                strategy: ConflictStrategy::Theirs,
                dry_run: true,
            })
            .unwrap();

        assert!(report.files.iter().all(|f| f.action == FileAction::Planned));
        assert_eq!(report.files_processed(), 2);
        assert!(!home.claude_dir().exists());
        assert!(home.backup_names().is_empty());
        assert!(engine.vcs().calls().is_empty());
    }

    #[test]
    fn test_pull_failure_is_a_warning() {
        let (home, _) = prepared_home();
        push_all(&home);
        let vcs = RecordingVcs {
            remote: true,
            fail_pull: true,
            ..RecordingVcs::default()
        };

        let report = engine(&home, vcs).pull(&PullOptions::default()).unwrap();

        assert!(report.pull_error.as_deref().unwrap().contains("could not resolve host"));
        assert!(report.staleness.as_deref().unwrap().contains("day(s) ago"));
        assert_eq!(report.files_processed(), 2);
    }

    #[test]
    fn test_pull_skips_reserved_excluded_and_foreign_platform_files() {
        let (home, _) = prepared_home();
        push_all(&home);
        home.write_repo("README.md", "# docs");
        home.write_repo("plans/foo.md", "draft");
        home.write_repo("commands/setup.windows.md", "dir");
        home.write_repo("commands/setup.unix.md", "ls");

        let report = engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap();

        let rels: Vec<&str> = report.files.iter().map(|f| f.rel.as_str()).collect();
        assert_eq!(rels, vec!["CLAUDE.md", "commands/setup.unix.md", "settings.json"]);
        home.assert_local_not_exists("README.md");
        home.assert_local_not_exists("plans/foo.md");
        home.assert_local_not_exists("commands/setup.windows.md");
    }

    #[test]
    fn test_pull_restores_extra_config_file() {
        let (home, _) = prepared_home();
        fs::write(home.claude_json(), r#"{"numStartups":3}"#).unwrap();
        push_all(&home);
        fs::remove_file(home.claude_json()).unwrap();

        engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap();

        assert_eq!(
            fs::read_to_string(home.claude_json()).unwrap(),
            r#"{"numStartups":3}"#
        );
        home.assert_local_not_exists("claude.json");
    }

    #[test]
    fn test_pull_with_wrong_key_aborts() {
        let (home, _) = prepared_home();
        push_all(&home);
        install_key(&home);

        let err = engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap_err();
        match err {
            Error::Crypto { path, .. } => assert_eq!(path, "settings.json"),
            other => panic!("expected a crypto error, got {other:?}"),
        }
    }

    #[test]
    fn test_pull_keeps_backup_count_bounded() {
        let (home, _) = prepared_home();
        push_all(&home);
        fs::create_dir_all(home.backup_dir()).unwrap();
        for day in 1..=6 {
            fs::write(
                home.backup_dir().join(format!("backup-2020010{day}-120000.zip")),
                "old",
            )
            .unwrap();
        }

        let mut config = SyncConfig::with_defaults();
        config.backup.max_count = 3;
        let engine = SyncEngine::with_vcs(
            ConfigPaths::from_home(home.root()),
            config,
            RecordingVcs::default(),
        );
        let report = engine.pull(&PullOptions::default()).unwrap();

        let names = home.backup_names();
        assert_eq!(names.len(), 3);
        assert_eq!(&names[..2], ["backup-20200105-120000.zip", "backup-20200106-120000.zip"]);
        assert_eq!(report.backup_archive.as_deref().map(|p| p.is_file()), Some(true));
        assert_eq!(report.pruned.len(), 4);
    }

    #[test]
    fn test_pull_expands_plugin_paths() {
        let (home, _) = prepared_home();
        home.write_local(
            "plugins/known_marketplaces.json",
            r#"{"installLocation":"$CLAUDE_DIR/plugins/marketplaces/x"}"#,
        );

        let report = engine(&home, RecordingVcs::default())
            .pull(&PullOptions::default())
            .unwrap();

        assert_eq!(report.expanded.len(), 1);
        assert_eq!(report.expanded[0].as_str(), "plugins/known_marketplaces.json");
        let payload = home.read_local("plugins/known_marketplaces.json");
        assert!(!payload.contains("$CLAUDE_DIR"), "got {payload}");
        assert!(payload.contains("plugins/marketplaces/x"), "got {payload}");
    }
}

mod verify {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_verify_after_push_is_intact() {
        let (home, _) = prepared_home();
        push_all(&home);

        let report = engine(&home, RecordingVcs::default()).verify().unwrap();

        assert!(report.is_intact());
        assert_eq!(report.ok_count(), 2);
        assert!(report.ensure_intact().is_ok());
    }

    #[test]
    fn test_verify_reports_tampering() {
        let (home, _) = prepared_home();
        push_all(&home);
        home.write_repo("CLAUDE.md", "tampered");

        let report = engine(&home, RecordingVcs::default()).verify().unwrap();

        assert_eq!(report.mismatch_count(), 1);
        assert_eq!(report.missing_count(), 0);
        assert!(matches!(
            report.ensure_intact(),
            Err(Error::Integrity { count: 1 })
        ));
    }

    #[test]
    fn test_verify_without_manifest() {
        let (home, _) = prepared_home();
        let err = engine(&home, RecordingVcs::default()).verify().unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }), "got {err:?}");
    }
}

mod status {
    use super::*;
    use pretty_assertions::assert_eq;
    use ccsync_core::{Classification, RemoteState};

    #[test]
    fn test_remote_state_out_of_sync() {
        let (home, _) = prepared_home();
        let engine = engine(&home, RecordingVcs::with_remote());

        assert_eq!(
            engine.remote_state(),
            RemoteState::OutOfSync {
                local: "a".repeat(40),
                remote: "b".repeat(40),
            }
        );
        assert_eq!(engine.vcs().calls(), vec!["fetch"]);
    }

    #[test]
    fn test_remote_state_not_configured() {
        let (home, _) = prepared_home();
        let engine = engine(&home, RecordingVcs::default());
        assert_eq!(engine.remote_state(), RemoteState::NotConfigured);
    }

    #[test]
    fn test_status_inventories() {
        let (home, _) = prepared_home();
        home.write_local("todos/1.json", "[]");
        push_all(&home);

        let report = engine(&home, RecordingVcs::default()).status().unwrap();

        let local: Vec<(&str, Classification)> = report
            .local_files
            .iter()
            .map(|f| (f.rel.as_str(), f.classification))
            .collect();
        assert_eq!(
            local,
            vec![
                ("CLAUDE.md", Classification::Plain),
                ("settings.json", Classification::Encrypted),
                ("todos/1.json", Classification::Excluded),
            ]
        );
        assert!(!report.claude_json_present);
        assert_eq!(report.last_commit.as_deref(), Some("aaaaaaa"));

        let repo: Vec<(&str, bool)> = report
            .repo_files
            .iter()
            .map(|f| (f.rel.as_str(), f.encrypted))
            .collect();
        assert_eq!(
            repo,
            vec![
                (".sync-manifest", false),
                ("CLAUDE.md", false),
                ("settings.json.age", true),
            ]
        );
    }
}
