use crate::domain::version::{BRANCH_REF_PREFIX, TAG_REF_PREFIX};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Git reference (tag or branch) and the SHA it points to.
///
/// Refs are compared by `name` for diffing; the SHA is carried along for writes
/// and output only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

impl Ref {
    /// Create a ref from a fully qualified name and SHA
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Ref {
            name: name.into(),
            sha: sha.into(),
        }
    }

    /// Create a tag ref, e.g. `Ref::tag("v1.17.0", sha)` -> "refs/tags/v1.17.0"
    pub fn tag(tag: &str, sha: impl Into<String>) -> Self {
        Ref::new(format!("{}{}", TAG_REF_PREFIX, tag), sha)
    }

    /// Create a branch ref, e.g. `Ref::branch("master", sha)` -> "refs/heads/master"
    pub fn branch(branch: &str, sha: impl Into<String>) -> Self {
        Ref::new(format!("{}{}", BRANCH_REF_PREFIX, branch), sha)
    }

    /// Name without the `refs/tags/` or `refs/heads/` namespace
    pub fn short_name(&self) -> &str {
        self.name
            .strip_prefix(TAG_REF_PREFIX)
            .or_else(|| self.name.strip_prefix(BRANCH_REF_PREFIX))
            .unwrap_or(&self.name)
    }

    pub fn is_tag(&self) -> bool {
        self.name.starts_with(TAG_REF_PREFIX)
    }

    pub fn is_branch(&self) -> bool {
        self.name.starts_with(BRANCH_REF_PREFIX)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.sha)
    }
}

/// A GitHub repository in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoSlug {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = crate::error::RepoToolsError;

    fn from_str(s: &str) -> Result<Self> {
        crate::validation::validate_repo("repository", s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
