// tests/sync_test.rs
use k8s_repo_tools::cli::output::write_refs;
use k8s_repo_tools::cli::{run_sync, SyncArgs, WorkflowOptions};
use k8s_repo_tools::domain::{Ref, RepoSlug};
use k8s_repo_tools::github::{GitHub, MockGitHub, Operation};
use k8s_repo_tools::ui::FixedPrompt;
use semver::Version;
use tempfile::TempDir;

fn source() -> RepoSlug {
    RepoSlug::new("org", "source")
}

fn dest() -> RepoSlug {
    RepoSlug::new("org", "dest")
}

fn args() -> SyncArgs {
    SyncArgs {
        source: source(),
        dest: dest(),
        min_version: Version::new(1, 16, 0),
    }
}

fn options(dry_run: bool) -> WorkflowOptions {
    WorkflowOptions {
        dry_run,
        force: true,
        ..WorkflowOptions::default()
    }
}

fn populated() -> MockGitHub {
    let github = MockGitHub::new();
    github.add_refs(
        &source(),
        vec![
            Ref::tag("v1.15.0", "s0"),
            Ref::tag("v1.16.0", "s1"),
            Ref::tag("v1.17.0", "s2"),
            Ref::tag("v1.18.0-alpha.0", "s3"),
            Ref::tag("not-a-version", "s4"),
            Ref::branch("master", "sm"),
            Ref::branch("release-1.15", "sb0"),
            Ref::branch("release-1.16", "sb1"),
            Ref::branch("release-1.17", "sb2"),
        ],
    );
    github.add_refs(
        &dest(),
        vec![
            Ref::tag("v1.16.0", "d1"),
            Ref::branch("master", "dm"),
            Ref::branch("release-1.16", "db1"),
        ],
    );
    github
}

#[test]
fn test_sync_creates_missing_refs() {
    let github = populated();
    let refs = run_sync(&github, &FixedPrompt(true), &options(false), &args()).unwrap();

    // Sorted by name; tags take the SHA of their release branch or trunk.
    assert_eq!(
        refs,
        vec![
            Ref::branch("release-1.17", "dm"),
            Ref::tag("v1.17.0", "dm"),
            Ref::tag("v1.18.0-alpha.0", "dm"),
        ]
    );
    let created: Vec<String> = github.created_refs().into_iter().map(|r| r.name).collect();
    assert_eq!(
        created,
        vec![
            "refs/heads/release-1.17",
            "refs/tags/v1.17.0",
            "refs/tags/v1.18.0-alpha.0"
        ]
    );
}

#[test]
fn test_new_tag_uses_existing_release_branch() {
    let github = populated();
    github.add_refs(&source(), vec![Ref::tag("v1.16.1", "s5")]);
    let refs = run_sync(&github, &FixedPrompt(true), &options(false), &args()).unwrap();
    let tag = refs.iter().find(|r| r.name == "refs/tags/v1.16.1").unwrap();
    assert_eq!(tag.sha, "db1");
}

#[test]
fn test_dry_run_matches_write_mode_without_writing() {
    let written = run_sync(&populated(), &FixedPrompt(true), &options(false), &args()).unwrap();

    let github = populated();
    let dry = run_sync(&github, &FixedPrompt(true), &options(true), &args()).unwrap();

    assert_eq!(dry, written);
    assert!(github.created_refs().is_empty());
    assert_eq!(github.get_tags(&dest()).unwrap().len(), 1);
}

#[test]
fn test_nothing_to_sync() {
    let github = MockGitHub::new();
    github.add_refs(&source(), vec![Ref::tag("v1.16.0", "s1")]);
    github.add_refs(&dest(), vec![Ref::tag("v1.16.0", "d1")]);
    let refs = run_sync(&github, &FixedPrompt(true), &options(false), &args()).unwrap();
    assert!(refs.is_empty());
}

#[test]
fn test_declined_prompt_returns_source_refs() {
    let github = populated();
    let options = WorkflowOptions {
        dry_run: false,
        force: false,
        ..WorkflowOptions::default()
    };
    let refs = run_sync(&github, &FixedPrompt(false), &options, &args()).unwrap();
    assert_eq!(refs.len(), 3);
    assert_eq!(refs[0], Ref::branch("release-1.17", "sb2"));
    assert!(github.created_refs().is_empty());
}

#[test]
fn test_missing_trunk_is_error() {
    let github = MockGitHub::new();
    github.add_refs(&source(), vec![Ref::tag("v1.17.0", "s2")]);
    github.add_refs(&dest(), vec![Ref::branch("main", "x")]);
    let err = run_sync(&github, &FixedPrompt(true), &options(true), &args()).unwrap_err();
    assert!(err.to_string().contains("master"));
}

#[test]
fn test_missing_destination_lists_as_empty() {
    let github = MockGitHub::new();
    github.add_refs(&source(), vec![Ref::tag("v1.17.0", "s2")]);
    // Destination has no refs at all, so there is no trunk to branch from.
    assert!(run_sync(&github, &FixedPrompt(true), &options(true), &args()).is_err());
}

#[test]
fn test_create_failure_is_error() {
    let github = populated();
    github.fail_on(Operation::CreateRef);
    assert!(run_sync(&github, &FixedPrompt(true), &options(false), &args()).is_err());
    // Dry-run never calls the write endpoint.
    assert!(run_sync(&github, &FixedPrompt(true), &options(true), &args()).is_ok());
}

#[test]
fn test_sync_output_file() {
    let github = populated();
    let refs = run_sync(&github, &FixedPrompt(true), &options(true), &args()).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("refs.json");
    write_refs(&path, &refs).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
    assert_eq!(value[0]["ref"], "refs/heads/release-1.17");
    assert_eq!(value[0]["sha"], "dm");
}
