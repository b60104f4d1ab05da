// tests/create_release_test.rs
use k8s_repo_tools::cli::create_release::{get_or_create_release, release_notes_range};
use k8s_repo_tools::cli::{
    run_create_release, CreateReleaseArgs, NotesSource, ReleaseOutcome, WorkflowOptions,
};
use k8s_repo_tools::domain::{Ref, RepoSlug};
use k8s_repo_tools::github::{MockGitHub, Operation};
use k8s_repo_tools::ui::FixedPrompt;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn dest() -> RepoSlug {
    RepoSlug::new("org", "dest")
}

fn options(dry_run: bool) -> WorkflowOptions {
    WorkflowOptions {
        dry_run,
        force: true,
        ..WorkflowOptions::default()
    }
}

fn args(tag: &str) -> CreateReleaseArgs {
    CreateReleaseArgs {
        dest: dest(),
        release_tag: tag.to_string(),
        notes: NotesSource::None,
        build_command: None,
        assets: BTreeMap::new(),
        token: None,
    }
}

fn github_with_tags() -> MockGitHub {
    let github = MockGitHub::new();
    github.add_refs(
        &dest(),
        vec![
            Ref::tag("v1.16.0", "sha-1.16.0"),
            Ref::tag("v1.17.0-rc.0", "sha-1.17.0-rc.0"),
            Ref::tag("v1.17.0", "sha-1.17.0"),
            Ref::branch("master", "sha-master"),
        ],
    );
    github
}

fn asset_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"binary").unwrap();
    path
}

#[test]
fn test_release_notes_range() {
    let github = github_with_tags();
    let (start, end) = release_notes_range(&github, &dest(), "v1.17.0").unwrap();
    assert_eq!(start.sha, "sha-1.16.0");
    assert_eq!(end.sha, "sha-1.17.0");
}

#[test]
fn test_release_notes_range_requires_tag() {
    let github = github_with_tags();
    let err = release_notes_range(&github, &dest(), "v1.18.0").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_creates_release_with_notes_from_file() {
    let github = github_with_tags();
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.md");
    fs::write(&notes, "## Changelog\n").unwrap();

    let mut args = args("v1.17.0");
    args.notes = NotesSource::File(notes);
    let outcome = run_create_release(&github, &FixedPrompt(true), &options(false), &args).unwrap();

    match outcome {
        ReleaseOutcome::Published { release, uploaded } => {
            assert_eq!(release.tag_name, "v1.17.0");
            assert_eq!(release.body.as_deref(), Some("## Changelog\n"));
            assert!(uploaded.is_empty());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(github.releases(&dest()).len(), 1);
}

#[test]
fn test_dry_run_does_not_create_release() {
    let github = github_with_tags();
    let dir = TempDir::new().unwrap();
    let mut args = args("v1.17.0");
    args.assets
        .insert("kinder".to_string(), asset_file(&dir, "kinder"));

    let outcome = run_create_release(&github, &FixedPrompt(true), &options(true), &args).unwrap();
    match outcome {
        ReleaseOutcome::Published { release, uploaded } => {
            assert_eq!(release.id, 0);
            assert_eq!(uploaded, vec!["kinder".to_string()]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(github.releases(&dest()).is_empty());
}

#[test]
fn test_missing_tag_is_error() {
    for dry_run in [false, true] {
        let github = github_with_tags();
        let err = run_create_release(&github, &FixedPrompt(true), &options(dry_run), &args("v1.99.0"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

#[test]
fn test_existing_release_is_reused() {
    let github = github_with_tags();
    let existing = github.add_release(&dest(), "v1.17.0", &[]);
    let release = get_or_create_release(&github, &dest(), "v1.17.0", "ignored", false).unwrap();
    assert_eq!(release, existing);
    assert_eq!(github.releases(&dest()).len(), 1);
}

#[test]
fn test_only_new_assets_are_uploaded() {
    let github = github_with_tags();
    let release = github.add_release(&dest(), "v1.17.0", &["kinder"]);
    let dir = TempDir::new().unwrap();

    let mut args = args("v1.17.0");
    args.assets
        .insert("kinder".to_string(), asset_file(&dir, "kinder"));
    args.assets
        .insert("kinder.sha256".to_string(), asset_file(&dir, "kinder.sha256"));

    let outcome = run_create_release(&github, &FixedPrompt(true), &options(false), &args).unwrap();
    match outcome {
        ReleaseOutcome::Published { uploaded, .. } => {
            assert_eq!(uploaded, vec!["kinder.sha256".to_string()])
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(
        github.asset_names(release.id),
        vec!["kinder".to_string(), "kinder.sha256".to_string()]
    );
}

#[test]
fn test_upload_failure_is_error() {
    let github = github_with_tags();
    github.fail_on(Operation::UploadAsset);
    let dir = TempDir::new().unwrap();
    let mut args = args("v1.17.0");
    args.assets
        .insert("kinder".to_string(), asset_file(&dir, "kinder"));
    assert!(run_create_release(&github, &FixedPrompt(true), &options(false), &args).is_err());
}

#[test]
fn test_declined_prompt_writes_nothing() {
    let github = github_with_tags();
    let options = WorkflowOptions {
        dry_run: false,
        force: false,
        ..WorkflowOptions::default()
    };
    let outcome = run_create_release(&github, &FixedPrompt(false), &options, &args("v1.17.0")).unwrap();
    assert_eq!(outcome, ReleaseOutcome::Declined);
    assert!(github.releases(&dest()).is_empty());
}

#[test]
fn test_notes_tool_in_dry_run() {
    let github = github_with_tags();
    let mut args = args("v1.17.0");
    args.notes = NotesSource::Tool(PathBuf::from("/nonexistent/release-notes"));

    let outcome = run_create_release(&github, &FixedPrompt(true), &options(true), &args).unwrap();
    match outcome {
        ReleaseOutcome::Published { release, .. } => {
            assert_eq!(release.body.as_deref(), Some("dry-run-release-notes"))
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_notes_tool_and_build_command() {
    use std::os::unix::fs::PermissionsExt;

    let github = github_with_tags();
    github.add_refs(&dest(), vec![Ref::branch("release-1.17", "sha-branch")]);
    let dir = TempDir::new().unwrap();

    // Writes its arguments as the release notes.
    let tool = dir.path().join("release-notes");
    fs::write(
        &tool,
        "#!/bin/sh\nfor a in \"$@\"; do case \"$a\" in --output=*) out=\"${a#--output=}\";; esac; done\necho \"$@\" > \"$out\"\n",
    )
    .unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let marker = dir.path().join("built");
    let mut args = args("v1.17.0");
    args.notes = NotesSource::Tool(tool);
    args.build_command = Some(format!("touch {}", marker.display()));

    let outcome = run_create_release(&github, &FixedPrompt(true), &options(false), &args).unwrap();
    let body = match outcome {
        ReleaseOutcome::Published { release, .. } => release.body.unwrap_or_default(),
        other => panic!("unexpected outcome {:?}", other),
    };
    assert!(body.contains("--start-sha=sha-1.16.0"));
    assert!(body.contains("--end-sha=sha-1.17.0"));
    assert!(body.contains("--github-org=org"));
    assert!(body.contains("--branch=release-1.17"));
    assert!(marker.exists());
}

#[cfg(unix)]
#[test]
fn test_failing_build_command_is_error() {
    let github = github_with_tags();
    let mut args = args("v1.17.0");
    args.build_command = Some("false".to_string());
    assert!(run_create_release(&github, &FixedPrompt(true), &options(false), &args).is_err());
}
