use crate::config::GitHubConfig;
use crate::domain::{Ref, RepoSlug};
use crate::error::{RepoToolsError, Result};
use crate::github::{
    CommitSummary, Comparison, ComparisonStatus, GitHub, MergeCommit, MergeResult, NewRelease,
    Release, ReleaseAsset,
};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const PER_PAGE: usize = 100;

#[derive(Deserialize)]
struct WireObject {
    sha: String,
}

#[derive(Deserialize)]
struct WireRef {
    #[serde(rename = "ref")]
    name: String,
    object: WireObject,
}

impl From<WireRef> for Ref {
    fn from(wire: WireRef) -> Self {
        Ref::new(wire.name, wire.object.sha)
    }
}

#[derive(Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    name: &'a str,
    sha: &'a str,
}

#[derive(Deserialize)]
struct WireComparison {
    status: ComparisonStatus,
    #[serde(default)]
    total_commits: u64,
    #[serde(default)]
    commits: Vec<CommitSummary>,
    #[serde(default)]
    html_url: String,
}

#[derive(Serialize)]
struct MergeRequest<'a> {
    base: &'a str,
    head: &'a str,
    commit_message: &'a str,
}

#[derive(Deserialize)]
struct WireCommitDetail {
    message: String,
}

#[derive(Deserialize)]
struct WireMergeCommit {
    sha: String,
    commit: WireCommitDetail,
    #[serde(default)]
    html_url: Option<String>,
}

/// Blocking client for the GitHub REST API
pub struct RestClient {
    http: Client,
    api_url: String,
    upload_url: String,
}

impl RestClient {
    /// Build a client from the `[github]` configuration and an optional token.
    ///
    /// Every request is bounded by the configured timeout.
    pub fn new(config: &GitHubConfig, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| RepoToolsError::config("the GitHub token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(concat!("k8s-repo-tools/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(RestClient {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            upload_url: config.upload_url.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, repo: &RepoSlug, path: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, repo.owner, repo.name, path)
    }

    // A 404 on the first page lists as empty.
    fn get_paginated<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .http
                .get(url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()?;
            if page == 1 && response.status() == StatusCode::NOT_FOUND {
                return Ok(items);
            }
            let batch: Vec<T> = expect_success(response, context)?.json()?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                return Ok(items);
            }
            page += 1;
        }
    }
}

fn expect_success(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(RepoToolsError::github(format!(
        "{}: unexpected status {}: {}",
        context, status, body
    )))
}

fn strip_refs(name: &str) -> &str {
    name.strip_prefix("refs/").unwrap_or(name)
}

impl GitHub for RestClient {
    fn get_refs(&self, repo: &RepoSlug, namespace: &str) -> Result<Vec<Ref>> {
        let url = self.repo_url(repo, &format!("git/matching-refs/{}", strip_refs(namespace)));
        let context = format!("listing {} of {}", namespace, repo);
        let refs = self.get_paginated::<WireRef>(&url, &context)?;
        Ok(refs.into_iter().map(Ref::from).collect())
    }

    fn get_ref(&self, repo: &RepoSlug, name: &str) -> Result<Ref> {
        let url = self.repo_url(repo, &format!("git/ref/{}", strip_refs(name)));
        let response = self.http.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoToolsError::not_found(format!(
                "ref {:?} in repository {:?}",
                name,
                repo.to_string()
            )));
        }
        let wire: WireRef = expect_success(response, &format!("getting {}", name))?.json()?;
        Ok(wire.into())
    }

    fn create_ref(&self, repo: &RepoSlug, reference: &Ref) -> Result<Ref> {
        log::info!(
            "creating ref {:?} from commit {:?} in repository {:?}",
            reference.name,
            reference.sha,
            repo.to_string()
        );
        let body = CreateRefRequest {
            name: &reference.name,
            sha: &reference.sha,
        };
        let response = self.http.post(self.repo_url(repo, "git/refs")).json(&body).send()?;
        let wire: WireRef =
            expect_success(response, &format!("creating {}", reference.name))?.json()?;
        Ok(wire.into())
    }

    fn compare(&self, repo: &RepoSlug, base: &str, head: &str) -> Result<Comparison> {
        let url = self.repo_url(repo, &format!("compare/{}...{}", base, head));
        let response = self.http.get(&url).send()?;
        let wire: WireComparison =
            expect_success(response, &format!("comparing {}...{}", base, head))?.json()?;
        Ok(Comparison {
            status: wire.status,
            total_commits: wire.total_commits,
            commits: wire.commits,
            html_url: wire.html_url,
        })
    }

    fn merge(&self, repo: &RepoSlug, base: &str, head: &str, message: &str) -> Result<MergeResult> {
        log::info!("merging {:?} into {:?} for repository {:?}", head, base, repo.to_string());
        let body = MergeRequest {
            base,
            head,
            commit_message: message,
        };
        let response = self.http.post(self.repo_url(repo, "merges")).json(&body).send()?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Ok(MergeResult {
                status: status.as_u16(),
                commit: None,
            });
        }
        let wire: WireMergeCommit = response.json()?;
        Ok(MergeResult {
            status: status.as_u16(),
            commit: Some(MergeCommit {
                sha: wire.sha,
                message: wire.commit.message,
                html_url: wire.html_url,
            }),
        })
    }

    fn get_release_by_tag(&self, repo: &RepoSlug, tag: &str) -> Result<Option<Release>> {
        let url = self.repo_url(repo, &format!("releases/tags/{}", tag));
        let response = self.http.get(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let release = expect_success(response, &format!("getting release {}", tag))?.json()?;
        Ok(Some(release))
    }

    fn create_release(&self, repo: &RepoSlug, release: &NewRelease) -> Result<Release> {
        log::info!("creating release for tag {:?}", release.tag_name);
        let response = self.http.post(self.repo_url(repo, "releases")).json(release).send()?;
        let created =
            expect_success(response, &format!("creating release {}", release.tag_name))?.json()?;
        Ok(created)
    }

    fn list_release_assets(&self, repo: &RepoSlug, release_id: u64) -> Result<Vec<ReleaseAsset>> {
        let url = self.repo_url(repo, &format!("releases/{}/assets", release_id));
        self.get_paginated(&url, &format!("listing assets of release {}", release_id))
    }

    fn upload_release_asset(
        &self,
        repo: &RepoSlug,
        release_id: u64,
        name: &str,
        path: &Path,
    ) -> Result<ReleaseAsset> {
        log::info!("uploading asset {:?} from {:?}", name, path);
        let content = fs::read(path)?;
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.upload_url, repo.owner, repo.name, release_id
        );
        let response = self
            .http
            .post(&url)
            .query(&[("name", name)])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()?;
        let asset = expect_success(response, &format!("uploading asset {}", name))?.json()?;
        Ok(asset)
    }
}
