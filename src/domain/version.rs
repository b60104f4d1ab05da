use crate::error::{RepoToolsError, Result};
use semver::Version;
use std::cmp::Ordering;

/// Ref namespace for tags
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Ref namespace for branches
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Parse a tag (e.g., "refs/tags/v1.18.0-rc.1" or "v1.18") into a semantic version.
///
/// The `refs/tags/` namespace and a leading `v` are optional. A version without a
/// PATCH component gets `.0` appended, so "v1.18" parses as 1.18.0.
///
/// # Returns
/// * `Ok(Version)` - Parsed version
/// * `Err(RepoToolsError::Parse)` - Carrying the original reference string
pub fn parse_tag_version(reference: &str) -> Result<Version> {
    let tag = reference.strip_prefix(TAG_REF_PREFIX).unwrap_or(reference);
    parse_lenient(tag, reference)
}

/// Parse a versioned branch (e.g., "refs/heads/release-1.17") into a semantic version.
///
/// The `refs/heads/` namespace is optional but the branch name must start with
/// `prefix`; anything else is rejected with a parse error.
pub fn parse_branch_version(reference: &str, prefix: &str) -> Result<Version> {
    let branch = reference
        .strip_prefix(BRANCH_REF_PREFIX)
        .unwrap_or(reference);
    let version = branch.strip_prefix(prefix).ok_or_else(|| {
        RepoToolsError::parse(
            reference,
            format!("branch is not prefixed with {:?}", prefix),
        )
    })?;
    parse_lenient(version, reference)
}

/// Order two versions by SemVer precedence: MAJOR, MINOR, PATCH, then
/// pre-release. Build metadata never takes part, so `1.2.3+a` and `1.2.3`
/// compare equal.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// True when both versions share MAJOR.MINOR
pub fn same_major_minor(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor
}

fn parse_lenient(raw: &str, reference: &str) -> Result<Version> {
    let raw = raw.strip_prefix('v').unwrap_or(raw);

    // a version without a .PATCH component
    let normalized = if raw.matches('.').count() < 2 {
        format!("{}.0", raw)
    } else {
        raw.to_string()
    };

    Version::parse(&normalized).map_err(|e| RepoToolsError::parse(reference, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Prerelease;

    #[test]
    fn test_parse_tag_ref() {
        let v = parse_tag_version("refs/tags/v1.17.3").unwrap();
        assert_eq!(v, Version::new(1, 17, 3));
    }

    #[test]
    fn test_parse_tag_without_namespace_or_v() {
        assert_eq!(parse_tag_version("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_tag_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_tag_elided_patch() {
        let v = parse_tag_version("refs/tags/v1.18").unwrap();
        assert_eq!(v, Version::new(1, 18, 0));
    }

    #[test]
    fn test_parse_tag_prerelease() {
        let v = parse_tag_version("refs/tags/v1.18.0-rc.1").unwrap();
        assert_eq!(v.pre, Prerelease::new("rc.1").unwrap());
    }

    #[test]
    fn test_parse_tag_invalid() {
        assert!(parse_tag_version("refs/tags/some-non-semver-ref").is_err());
        assert!(parse_tag_version("refs/tags/v11111").is_err());
        assert!(parse_tag_version("refs/tags/v1.23.0-alpha:0").is_err());
    }

    #[test]
    fn test_parse_error_keeps_original_reference() {
        match parse_tag_version("refs/tags/foo") {
            Err(RepoToolsError::Parse { reference, .. }) => assert_eq!(reference, "refs/tags/foo"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_branch() {
        let v = parse_branch_version("refs/heads/release-1.17", "release-").unwrap();
        assert_eq!(v, Version::new(1, 17, 0));
        let v = parse_branch_version("release-2.3", "release-").unwrap();
        assert_eq!(v, Version::new(2, 3, 0));
    }

    #[test]
    fn test_parse_branch_requires_prefix() {
        assert!(parse_branch_version("refs/heads/master", "release-").is_err());
        assert!(parse_branch_version("refs/heads/foo-1.17", "release-").is_err());
    }

    #[test]
    fn test_parse_branch_custom_prefix() {
        let v = parse_branch_version("refs/heads/rel/1.20", "rel/").unwrap();
        assert_eq!(v, Version::new(1, 20, 0));
    }

    #[test]
    fn test_canonical_form_round_trips() {
        for s in ["v1.17.0", "v1.18.0-alpha.1", "v2.0.0-rc.0", "0.1.0"] {
            let parsed = parse_tag_version(s).unwrap();
            assert_eq!(parse_tag_version(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn test_precedence_ignores_build_metadata() {
        let plain = Version::parse("1.23.0-beta.0").unwrap();
        let built = Version::parse("1.23.0-beta.0+build.1").unwrap();
        assert_ne!(plain, built);
        assert_eq!(cmp_precedence(&plain, &built), Ordering::Equal);
        let final_release = Version::parse("1.23.0+meta").unwrap();
        assert_eq!(cmp_precedence(&built, &final_release), Ordering::Less);
    }

    #[test]
    fn test_same_major_minor() {
        let a = Version::new(1, 17, 0);
        let b = Version::parse("1.17.4-rc.0").unwrap();
        let c = Version::new(1, 18, 0);
        assert!(same_major_minor(&a, &b));
        assert!(!same_major_minor(&a, &c));
    }
}
