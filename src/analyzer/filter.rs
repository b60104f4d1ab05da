use crate::analyzer::parsed_tags;
use crate::boundary::BoundaryWarning;
use crate::domain::{cmp_precedence, parse_branch_version, Ref};
use semver::Version;
use std::cmp::Ordering;

/// Keep the tags that are SemVer and newer than or equal to `min_version`.
///
/// Order of the surviving tags is preserved. Unparsable and older tags are
/// dropped with a warning.
pub fn trim_tags(refs: &[Ref], min_version: &Version) -> Vec<Ref> {
    parsed_tags(refs)
        .filter(|(tag, version)| {
            if cmp_precedence(version, min_version) == Ordering::Less {
                BoundaryWarning::BelowMinimumVersion {
                    reference: tag.name.clone(),
                    minimum: min_version.to_string(),
                }
                .emit();
                return false;
            }
            true
        })
        .map(|(tag, _)| tag.clone())
        .collect()
}

/// Keep the branches of the form `<prefix>MAJOR.MINOR` whose MAJOR.MINOR is
/// newer than or equal to that of `min_version`.
///
/// PATCH and pre-release of `min_version` do not take part in the comparison.
pub fn trim_branches(refs: &[Ref], min_version: &Version, prefix: &str) -> Vec<Ref> {
    let minimum = (min_version.major, min_version.minor);

    refs.iter()
        .filter(|branch| match parse_branch_version(&branch.name, prefix) {
            Ok(version) if (version.major, version.minor) < minimum => {
                BoundaryWarning::BranchBelowMinimum {
                    reference: branch.name.clone(),
                    minimum: min_version.to_string(),
                }
                .emit();
                false
            }
            Ok(_) => true,
            Err(e) => {
                BoundaryWarning::unparsable(&e, &branch.name).emit();
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<Ref> {
        names.iter().map(|n| Ref::tag(n, "sha")).collect()
    }

    fn names(refs: &[Ref]) -> Vec<&str> {
        refs.iter().map(|r| r.short_name()).collect()
    }

    #[test]
    fn test_trim_tags_drops_older_and_unparsable() {
        let refs = tags(&["v1.16.0", "v1.17.0", "not-a-version", "v1.18.0-alpha.1", "v1.17.0-rc.1"]);
        let min = Version::new(1, 17, 0);
        let trimmed = trim_tags(&refs, &min);
        assert_eq!(names(&trimmed), vec!["v1.17.0", "v1.18.0-alpha.1"]);
    }

    #[test]
    fn test_trim_tags_prerelease_minimum() {
        let refs = tags(&["v1.17.0-alpha.0", "v1.17.0-beta.0", "v1.17.0"]);
        let min = Version::parse("1.17.0-beta.0").unwrap();
        assert_eq!(names(&trim_tags(&refs, &min)), vec!["v1.17.0-beta.0", "v1.17.0"]);
    }

    #[test]
    fn test_trim_tags_minimum_with_build_metadata() {
        let refs = tags(&["v1.17.0", "v1.16.9"]);
        let min = Version::parse("1.17.0+build.3").unwrap();
        assert_eq!(names(&trim_tags(&refs, &min)), vec!["v1.17.0"]);
    }

    #[test]
    fn test_trim_tags_never_grows_and_respects_minimum() {
        let refs = tags(&["v0.1.0", "v1.0.0", "v2.3", "garbage", "v1.9.9"]);
        let min = Version::new(1, 5, 0);
        let trimmed = trim_tags(&refs, &min);
        assert!(trimmed.len() <= refs.len());
        for tag in &trimmed {
            let v = crate::domain::parse_tag_version(&tag.name).unwrap();
            assert!(v >= min);
        }
    }

    #[test]
    fn test_trim_tags_preserves_order() {
        let refs = tags(&["v1.19.0", "v1.17.0", "v1.18.0"]);
        let trimmed = trim_tags(&refs, &Version::new(1, 17, 0));
        assert_eq!(names(&trimmed), vec!["v1.19.0", "v1.17.0", "v1.18.0"]);
    }

    #[test]
    fn test_trim_branches_compares_major_minor_only() {
        let refs = vec![
            Ref::branch("master", "a"),
            Ref::branch("release-1.16", "b"),
            Ref::branch("release-1.17", "c"),
            Ref::branch("release-2.0", "d"),
            Ref::branch("feature-1.18", "e"),
        ];
        let min = Version::parse("1.17.5-rc.0").unwrap();
        let trimmed = trim_branches(&refs, &min, "release-");
        assert_eq!(names(&trimmed), vec!["release-1.17", "release-2.0"]);
    }

    #[test]
    fn test_trim_branches_empty_input() {
        assert!(trim_branches(&[], &Version::new(1, 0, 0), "release-").is_empty());
    }
}
