//! GitHub collaborator
//!
//! The workflows talk to GitHub only through the [GitHub] trait, so that they
//! can run against the REST API or against an in-memory double.
//!
//! - [client::RestClient]: blocking REST implementation built on `reqwest`
//! - [mock::MockGitHub]: in-memory implementation with failure injection for tests
//!
//! Dry-run handling lives in the workflows. Implementations always perform the
//! operation they are asked for.

pub mod client;
pub mod mock;

pub use client::RestClient;
pub use mock::{MockGitHub, Operation};

use crate::domain::{Ref, RepoSlug};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Namespace of tag refs, as passed to [GitHub::get_refs]
pub const TAGS_NAMESPACE: &str = "refs/tags";
/// Namespace of branch refs, as passed to [GitHub::get_refs]
pub const BRANCHES_NAMESPACE: &str = "refs/heads";

/// Status of `head` relative to `base` reported by the compare API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Ahead,
    Behind,
    Identical,
    Diverged,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonStatus::Ahead => "ahead",
            ComparisonStatus::Behind => "behind",
            ComparisonStatus::Identical => "identical",
            ComparisonStatus::Diverged => "diverged",
            ComparisonStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
}

/// Result of comparing two branches or commits
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub status: ComparisonStatus,
    pub total_commits: u64,
    pub commits: Vec<CommitSummary>,
    pub html_url: String,
}

/// Commit created by a merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeCommit {
    pub sha: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub html_url: Option<String>,
}

/// Outcome of a merge request.
///
/// The HTTP status is kept as-is: 201 means a merge commit was created, 204
/// that there was nothing to merge, 409 a conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub status: u16,
    pub commit: Option<MergeCommit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
}

/// Payload for creating a release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl NewRelease {
    /// A published, non pre-release release named after its tag
    pub fn for_tag(tag: &str, body: impl Into<String>) -> Self {
        NewRelease {
            tag_name: tag.to_string(),
            name: tag.to_string(),
            body: body.into(),
            draft: false,
            prerelease: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
}

/// Repository operations used by the workflows.
///
/// ## Error Handling
///
/// Absence is reported the way each caller needs it: listing refs of a missing
/// repository yields an empty list, a missing single ref is
/// [crate::error::RepoToolsError::NotFound], and a missing release is `None`.
/// Any other unexpected status is [crate::error::RepoToolsError::GitHub].
pub trait GitHub {
    /// List refs under a namespace such as `refs/tags`
    fn get_refs(&self, repo: &RepoSlug, namespace: &str) -> Result<Vec<Ref>>;

    /// Get a single fully qualified ref such as `refs/tags/v1.17.0`
    fn get_ref(&self, repo: &RepoSlug, name: &str) -> Result<Ref>;

    fn create_ref(&self, repo: &RepoSlug, reference: &Ref) -> Result<Ref>;

    /// Compare `head` against `base`
    fn compare(&self, repo: &RepoSlug, base: &str, head: &str) -> Result<Comparison>;

    /// Merge `head` into `base` with a merge commit
    fn merge(&self, repo: &RepoSlug, base: &str, head: &str, message: &str) -> Result<MergeResult>;

    fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> Result<Option<Release>>;

    fn create_release(&self, repo: &RepoSlug, release: &NewRelease) -> Result<Release>;

    fn list_release_assets(&self, repo: &RepoSlug, release_id: u64) -> Result<Vec<ReleaseAsset>>;

    /// Upload the file at `path` as asset `name` of a release
    fn upload_release_asset(
        &self,
        repo: &RepoSlug,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> Result<ReleaseAsset>;

    fn get_tags(&self, repo: &RepoSlug) -> Result<Vec<Ref>> {
        log::info!("getting {:?} from repository {:?}", TAGS_NAMESPACE, repo.to_string());
        self.get_refs(repo, TAGS_NAMESPACE)
    }

    fn get_branches(&self, repo: &RepoSlug) -> Result<Vec<Ref>> {
        log::info!("getting {:?} from repository {:?}", BRANCHES_NAMESPACE, repo.to_string());
        self.get_refs(repo, BRANCHES_NAMESPACE)
    }
}
