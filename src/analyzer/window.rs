use crate::domain::cmp_precedence;
use semver::{Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;

const WINDOW_START: &str = "beta.0";
const WINDOW_END: &str = "rc.1";

/// Versions during which a release branch may be fast-forwarded to trunk.
///
/// Given the latest tag x for release branch y:
/// - x must be >= y.MAJOR.y.MINOR.0-beta.0
/// - x must be <  y.MAJOR.y.MINOR.0-rc.1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastForwardWindow {
    pub min: Version,
    pub max: Version,
}

impl FastForwardWindow {
    /// Window for the MAJOR.MINOR of a release branch
    pub fn for_branch(branch_version: &Version) -> Self {
        FastForwardWindow {
            min: window_bound(branch_version, WINDOW_START),
            max: window_bound(branch_version, WINDOW_END),
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        cmp_precedence(version, &self.min) != Ordering::Less
            && cmp_precedence(version, &self.max) == Ordering::Less
    }
}

impl fmt::Display for FastForwardWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <= VER < {}", self.min, self.max)
    }
}

/// True if `latest_tag` lies in the fast-forward window of `branch_version`
pub fn in_fast_forward_window(latest_tag: &Version, branch_version: &Version) -> bool {
    FastForwardWindow::for_branch(branch_version).contains(latest_tag)
}

fn window_bound(branch_version: &Version, pre: &str) -> Version {
    Version {
        major: branch_version.major,
        minor: branch_version.minor,
        patch: 0,
        pre: Prerelease::new(pre).expect("window bounds are valid pre-release identifiers"),
        build: semver::BuildMetadata::EMPTY,
    }
}
