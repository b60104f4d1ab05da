//! Release notes range selection following the Kubernetes release train
//!
//! Given the tag a release is cut from, pick the tag that bounds the changelog:
//!
//! tag               | returned tag    | comment
//! ------------------|-----------------|---------------------
//! v1.17.0-alpha.0   | v1.17.0-alpha.0 | no changelog
//! v1.17.0-alpha.1   | v1.16.0         | previous MINOR
//! v1.17.0-<pre>     | v1.17.0-<pre-1> | previous pre-release
//! v1.17.0           | v1.16.0         | previous MINOR
//! v2.0.0            | v1.<latest>     | newest release of previous MAJOR
//! v1.17.1           | v1.17.0         | previous PATCH
//!
//! This table has to change together with the Kubernetes release process.

use crate::analyzer::parsed_tags;
use crate::boundary::BoundaryWarning;
use crate::domain::{cmp_precedence, parse_tag_version, same_major_minor, Ref};
use crate::error::{RepoToolsError, Result};
use semver::Version;
use std::cmp::Ordering;

/// Resolve the tag that starts the release notes range for `target`.
///
/// Falls back to `target` itself (an empty range) when no suitable prior tag
/// exists in `tags`. Only an unparsable `target`, or a pre-release that is not
/// of the form `<stage>.<n>`, is an error.
pub fn resolve_range_start<'a>(target: &'a Ref, tags: &'a [Ref]) -> Result<&'a Ref> {
    let version = parse_tag_version(&target.name)?;

    let found = if version.pre.is_empty() {
        if version.patch == 0 {
            previous_minor(&version, tags)
        } else {
            let previous_patch = Version::new(version.major, version.minor, version.patch - 1);
            find_exact(&previous_patch, tags)
        }
    } else {
        let (stage, iteration) = split_prerelease(&target.name, &version)?;
        match (stage, iteration) {
            ("alpha", "0") => None,
            ("alpha", "1") => previous_minor(&version, tags),
            // Kubernetes does not cut pre-releases for PATCH releases.
            _ => find_previous_prerelease(&version, tags),
        }
    };

    Ok(found.unwrap_or_else(|| {
        BoundaryWarning::NoRangeReference {
            tag: target.name.clone(),
        }
        .emit();
        target
    }))
}

fn split_prerelease<'v>(reference: &str, version: &'v Version) -> Result<(&'v str, &'v str)> {
    let mut parts = version.pre.as_str().split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(stage), Some(iteration), None) => Ok((stage, iteration)),
        _ => Err(RepoToolsError::parse(
            reference,
            format!(
                "pre-release {:?} is not of the form <stage>.<number>",
                version.pre.as_str()
            ),
        )),
    }
}

// Start of a MINOR cycle: the previous MINOR's .0, or across a MAJOR rollover
// the newest release of the previous MAJOR.
fn previous_minor<'a>(version: &Version, tags: &'a [Ref]) -> Option<&'a Ref> {
    if version.minor > 0 {
        let target = Version::new(version.major, version.minor - 1, 0);
        return find_exact(&target, tags);
    }
    if version.major == 0 {
        return None;
    }
    find_largest_for_major(version.major - 1, tags)
}

fn find_exact<'a>(target: &Version, tags: &'a [Ref]) -> Option<&'a Ref> {
    parsed_tags(tags)
        .find(|(_, version)| cmp_precedence(version, target) == Ordering::Equal)
        .map(|(tag, _)| tag)
}

fn find_largest_for_major(major: u64, tags: &[Ref]) -> Option<&Ref> {
    let mut largest = Version::new(major, 0, 0);
    let mut result = None;
    for (tag, version) in parsed_tags(tags) {
        if version.major == major && cmp_precedence(&version, &largest) == Ordering::Greater {
            largest = version;
            result = Some(tag);
        }
    }
    result
}

fn find_previous_prerelease<'a>(target: &Version, tags: &'a [Ref]) -> Option<&'a Ref> {
    let mut result: Option<(&Ref, Version)> = None;
    for (tag, version) in parsed_tags(tags) {
        if !same_major_minor(&version, target)
            || version.pre.is_empty()
            || cmp_precedence(&version, target) != Ordering::Less
        {
            continue;
        }
        let replace = match &result {
            Some((_, current)) => cmp_precedence(&version, current) == Ordering::Greater,
            None => true,
        };
        if replace {
            result = Some((tag, version));
        }
    }
    result.map(|(tag, _)| tag)
}
