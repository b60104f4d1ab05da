use std::fmt;

/// Warnings raised while skipping refs that cannot take part in selection.
/// These are non-fatal: the offending ref is dropped and processing continues.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Ref cannot be parsed as a semantic version
    UnparsableRef { reference: String, reason: String },
    /// Tag parses but is older than the minimum version
    BelowMinimumVersion { reference: String, minimum: String },
    /// Branch MAJOR.MINOR is older than the minimum version
    BranchBelowMinimum { reference: String, minimum: String },
    /// No prior tag bounds the release notes range; the tag itself is used
    NoRangeReference { tag: String },
    /// No release branch matches the tag; the trunk SHA is used
    NoMatchingBranch { tag: String, trunk: String },
}

impl BoundaryWarning {
    /// Build an `UnparsableRef` warning from a parse error
    pub fn unparsable(err: &crate::error::RepoToolsError, fallback: &str) -> Self {
        match err {
            crate::error::RepoToolsError::Parse { reference, reason } => {
                BoundaryWarning::UnparsableRef {
                    reference: reference.clone(),
                    reason: reason.clone(),
                }
            }
            other => BoundaryWarning::UnparsableRef {
                reference: fallback.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Emit this warning through the log facade
    pub fn emit(&self) {
        log::warn!("{}", self);
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnparsableRef { reference, reason } => {
                write!(f, "skipping ref {:?}: {}", reference, reason)
            }
            BoundaryWarning::BelowMinimumVersion { reference, minimum } => {
                write!(
                    f,
                    "skipping ref {:?}; version is older than the minimum version {}",
                    reference, minimum
                )
            }
            BoundaryWarning::BranchBelowMinimum { reference, minimum } => {
                write!(
                    f,
                    "the MAJOR.MINOR in ref {:?} is older than the minimum version {}; skipping",
                    reference, minimum
                )
            }
            BoundaryWarning::NoRangeReference { tag } => {
                write!(
                    f,
                    "could not find a release notes range reference for {:?}; returning the same reference",
                    tag
                )
            }
            BoundaryWarning::NoMatchingBranch { tag, trunk } => {
                write!(f, "using the {:?} branch for new tag {:?}", trunk, tag)
            }
        }
    }
}
