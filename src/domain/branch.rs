use crate::domain::reference::Ref;
use crate::domain::version::BRANCH_REF_PREFIX;
use semver::Version;

/// Default prefix of versioned release branches
pub const DEFAULT_BRANCH_PREFIX: &str = "release-";

/// Default trunk branch, exempt from version parsing
pub const DEFAULT_TRUNK_BRANCH: &str = "master";

/// Branch naming convention: `<prefix><MAJOR>.<MINOR>` plus a trunk branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNaming {
    pub prefix: String,
    pub trunk: String,
}

impl BranchNaming {
    pub fn new(prefix: impl Into<String>, trunk: impl Into<String>) -> Self {
        BranchNaming {
            prefix: prefix.into(),
            trunk: trunk.into(),
        }
    }

    /// Release branch name for a version, e.g. 1.17.3 -> "release-1.17"
    pub fn branch_for(&self, version: &Version) -> String {
        format!("{}{}.{}", self.prefix, version.major, version.minor)
    }

    /// Check if a branch (qualified or not) is the trunk branch
    pub fn is_trunk(&self, branch: &str) -> bool {
        branch.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(branch) == self.trunk
    }

    /// SHA of the trunk branch among `branches`, if present
    pub fn trunk_sha<'a>(&self, branches: &'a [Ref]) -> Option<&'a str> {
        branches
            .iter()
            .find(|b| self.is_trunk(&b.name))
            .map(|b| b.sha.as_str())
    }
}

impl Default for BranchNaming {
    fn default() -> Self {
        BranchNaming::new(DEFAULT_BRANCH_PREFIX, DEFAULT_TRUNK_BRANCH)
    }
}

/// Commit message for merging `head` into `base`
pub fn format_merge_commit_message(base: &str, head: &str) -> String {
    let base = base.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(base);
    let head = head.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(head);
    format!("Merge branch {:?} into {}", head, base)
}
