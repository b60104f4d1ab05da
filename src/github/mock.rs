use crate::domain::{Ref, RepoSlug};
use crate::error::{RepoToolsError, Result};
use crate::github::{
    Comparison, GitHub, MergeCommit, MergeResult, NewRelease, Release, ReleaseAsset,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Operations of [GitHub] that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetRefs,
    GetRef,
    CreateRef,
    Compare,
    Merge,
    GetRelease,
    CreateRelease,
    ListAssets,
    UploadAsset,
}

#[derive(Default)]
struct MockState {
    refs: HashMap<String, Vec<Ref>>,
    comparisons: HashMap<String, Comparison>,
    merge_status: Option<u16>,
    releases: HashMap<String, Vec<Release>>,
    assets: HashMap<u64, Vec<ReleaseAsset>>,
    failures: HashSet<Operation>,
    created_refs: Vec<Ref>,
    merges: Vec<(String, String, String)>,
    next_id: u64,
}

/// In-memory GitHub for testing without network access.
///
/// Repositories spring into existence on first use. Writes are recorded so
/// tests can assert on them.
#[derive(Default)]
pub struct MockGitHub {
    state: Mutex<MockState>,
}

impl MockGitHub {
    /// Create a new empty mock
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.state().failures.contains(&operation) {
            return Err(RepoToolsError::github(format!(
                "injected failure for {:?}",
                operation
            )));
        }
        Ok(())
    }

    /// Add refs to a repository
    pub fn add_refs(&self, repo: &RepoSlug, refs: impl IntoIterator<Item = Ref>) {
        self.state()
            .refs
            .entry(repo.to_string())
            .or_default()
            .extend(refs);
    }

    /// Set the comparison returned for `base...head`
    pub fn set_comparison(&self, repo: &RepoSlug, base: &str, head: &str, comparison: Comparison) {
        self.state()
            .comparisons
            .insert(comparison_key(repo, base, head), comparison);
    }

    /// Force the HTTP status returned by merges; defaults to 201
    pub fn set_merge_status(&self, status: u16) {
        self.state().merge_status = Some(status);
    }

    pub fn add_release(&self, repo: &RepoSlug, tag: &str, asset_names: &[&str]) -> Release {
        let mut state = self.state();
        state.next_id += 1;
        let release = Release {
            id: state.next_id,
            tag_name: tag.to_string(),
            name: Some(tag.to_string()),
            body: None,
            html_url: format!("https://github.com/{}/releases/tag/{}", repo, tag),
        };
        let mut assets = Vec::new();
        for name in asset_names {
            state.next_id += 1;
            assets.push(ReleaseAsset {
                id: state.next_id,
                name: name.to_string(),
            });
        }
        state.assets.insert(release.id, assets);
        state
            .releases
            .entry(repo.to_string())
            .or_default()
            .push(release.clone());
        release
    }

    /// Make every later call of `operation` fail
    pub fn fail_on(&self, operation: Operation) {
        self.state().failures.insert(operation);
    }

    /// Refs created so far, in creation order
    pub fn created_refs(&self) -> Vec<Ref> {
        self.state().created_refs.clone()
    }

    /// Merges performed so far as `(base, head, message)`
    pub fn merges(&self) -> Vec<(String, String, String)> {
        self.state().merges.clone()
    }

    pub fn releases(&self, repo: &RepoSlug) -> Vec<Release> {
        self.state()
            .releases
            .get(&repo.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub fn asset_names(&self, release_id: u64) -> Vec<String> {
        self.state()
            .assets
            .get(&release_id)
            .map(|assets| assets.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }
}

fn comparison_key(repo: &RepoSlug, base: &str, head: &str) -> String {
    format!("{}:{}...{}", repo, base, head)
}

impl GitHub for MockGitHub {
    fn get_refs(&self, repo: &RepoSlug, namespace: &str) -> Result<Vec<Ref>> {
        self.check(Operation::GetRefs)?;
        let prefix = format!("{}/", namespace.trim_end_matches('/'));
        Ok(self
            .state()
            .refs
            .get(&repo.to_string())
            .map(|refs| {
                refs.iter()
                    .filter(|r| r.name.starts_with(&prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_ref(&self, repo: &RepoSlug, name: &str) -> Result<Ref> {
        self.check(Operation::GetRef)?;
        self.state()
            .refs
            .get(&repo.to_string())
            .and_then(|refs| refs.iter().find(|r| r.name == name).cloned())
            .ok_or_else(|| {
                RepoToolsError::not_found(format!("ref {:?} in repository {:?}", name, repo.to_string()))
            })
    }

    fn create_ref(&self, repo: &RepoSlug, reference: &Ref) -> Result<Ref> {
        self.check(Operation::CreateRef)?;
        let mut state = self.state();
        let refs = state.refs.entry(repo.to_string()).or_default();
        if refs.iter().any(|r| r.name == reference.name) {
            return Err(RepoToolsError::github(format!(
                "reference {:?} already exists",
                reference.name
            )));
        }
        refs.push(reference.clone());
        state.created_refs.push(reference.clone());
        Ok(reference.clone())
    }

    fn compare(&self, repo: &RepoSlug, base: &str, head: &str) -> Result<Comparison> {
        self.check(Operation::Compare)?;
        self.state()
            .comparisons
            .get(&comparison_key(repo, base, head))
            .cloned()
            .ok_or_else(|| RepoToolsError::not_found(format!("comparison {}...{}", base, head)))
    }

    fn merge(&self, repo: &RepoSlug, base: &str, head: &str, message: &str) -> Result<MergeResult> {
        self.check(Operation::Merge)?;
        let mut state = self.state();
        state
            .merges
            .push((base.to_string(), head.to_string(), message.to_string()));
        let status = state.merge_status.unwrap_or(201);
        if status != 201 {
            return Ok(MergeResult {
                status,
                commit: None,
            });
        }
        state.next_id += 1;
        let sha = format!("merge-{}", state.next_id);
        let base_ref = format!("refs/heads/{}", base.trim_start_matches("refs/heads/"));
        if let Some(branch) = state
            .refs
            .get_mut(&repo.to_string())
            .and_then(|refs| refs.iter_mut().find(|r| r.name == base_ref))
        {
            branch.sha = sha.clone();
        }
        Ok(MergeResult {
            status,
            commit: Some(MergeCommit {
                sha,
                message: message.to_string(),
                html_url: None,
            }),
        })
    }

    fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> Result<Option<Release>> {
        self.check(Operation::GetRelease)?;
        Ok(self
            .releases(repo)
            .into_iter()
            .find(|release| release.tag_name == tag))
    }

    fn create_release(&self, repo: &RepoSlug, release: &NewRelease) -> Result<Release> {
        self.check(Operation::CreateRelease)?;
        let created = self.add_release(repo, &release.tag_name, &[]);
        let mut state = self.state();
        let stored = state
            .releases
            .get_mut(&repo.to_string())
            .and_then(|releases| releases.iter_mut().find(|r| r.id == created.id));
        match stored {
            Some(stored) => {
                stored.name = Some(release.name.clone());
                stored.body = Some(release.body.clone());
                Ok(stored.clone())
            }
            None => Ok(created),
        }
    }

    fn list_release_assets(&self, _repo: &RepoSlug, release_id: u64) -> Result<Vec<ReleaseAsset>> {
        self.check(Operation::ListAssets)?;
        Ok(self
            .state()
            .assets
            .get(&release_id)
            .cloned()
            .unwrap_or_default())
    }

    fn upload_release_asset(
        &self,
        _repo: &RepoSlug,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> Result<ReleaseAsset> {
        self.check(Operation::UploadAsset)?;
        if !path.is_file() {
            return Err(RepoToolsError::not_found(format!("asset file {:?}", path)));
        }
        let mut state = self.state();
        state.next_id += 1;
        let asset = ReleaseAsset {
            id: state.next_id,
            name: name.to_string(),
        };
        state.assets.entry(release_id).or_default().push(asset.clone());
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::ComparisonStatus;

    fn repo() -> RepoSlug {
        RepoSlug::new("org", "repo")
    }

    #[test]
    fn test_get_refs_by_namespace() {
        let github = MockGitHub::new();
        github.add_refs(
            &repo(),
            vec![Ref::tag("v1.0.0", "a"), Ref::branch("master", "b")],
        );
        assert_eq!(github.get_tags(&repo()).unwrap(), vec![Ref::tag("v1.0.0", "a")]);
        assert_eq!(
            github.get_branches(&repo()).unwrap(),
            vec![Ref::branch("master", "b")]
        );
        assert!(github.get_tags(&RepoSlug::new("org", "missing")).unwrap().is_empty());
    }

    #[test]
    fn test_get_ref_not_found() {
        let github = MockGitHub::new();
        assert!(github.get_ref(&repo(), "refs/tags/v1.0.0").unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_ref_twice_fails() {
        let github = MockGitHub::new();
        let tag = Ref::tag("v1.0.0", "a");
        github.create_ref(&repo(), &tag).unwrap();
        assert!(github.create_ref(&repo(), &tag).is_err());
        assert_eq!(github.created_refs(), vec![tag]);
    }

    #[test]
    fn test_failure_injection() {
        let github = MockGitHub::new();
        github.fail_on(Operation::GetRefs);
        assert!(github.get_tags(&repo()).is_err());
    }

    #[test]
    fn test_merge_updates_base_branch() {
        let github = MockGitHub::new();
        github.add_refs(&repo(), vec![Ref::branch("release-1.17", "old")]);
        let result = github
            .merge(&repo(), "release-1.17", "master", "message")
            .unwrap();
        assert_eq!(result.status, 201);
        let sha = result.commit.unwrap().sha;
        assert_eq!(
            github.get_ref(&repo(), "refs/heads/release-1.17").unwrap().sha,
            sha
        );
    }

    #[test]
    fn test_comparison_lookup() {
        let github = MockGitHub::new();
        let comparison = Comparison {
            status: ComparisonStatus::Identical,
            total_commits: 0,
            commits: vec![],
            html_url: String::new(),
        };
        github.set_comparison(&repo(), "release-1.17", "master", comparison.clone());
        assert_eq!(github.compare(&repo(), "release-1.17", "master").unwrap(), comparison);
        assert!(github.compare(&repo(), "release-1.18", "master").is_err());
    }

    #[test]
    fn test_release_assets() {
        let github = MockGitHub::new();
        let release = github.add_release(&repo(), "v1.0.0", &["kinder"]);
        assert_eq!(github.asset_names(release.id), vec!["kinder".to_string()]);
        assert_eq!(
            github.get_release_by_tag(&repo(), "v1.0.0").unwrap(),
            Some(release)
        );
    }
}
