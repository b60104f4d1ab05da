use crate::analyzer::parsed_tags;
use crate::boundary::BoundaryWarning;
use crate::domain::{cmp_precedence, parse_branch_version, parse_tag_version, same_major_minor, Ref};
use crate::error::{RepoToolsError, Result};
use semver::Version;
use std::cmp::Ordering;

/// Find the latest versioned branch of the form `<prefix>MAJOR.MINOR`.
///
/// Returns the branch together with its parsed version. When two branches parse
/// to the same version the first one in input order is kept.
///
/// # Returns
/// * `Ok((&Ref, Version))` - The latest release branch
/// * `Err(RepoToolsError::NotFound)` - If no branch follows the convention
pub fn find_latest_branch<'a>(refs: &'a [Ref], prefix: &str) -> Result<(&'a Ref, Version)> {
    let candidates = refs
        .iter()
        .filter_map(|branch| match parse_branch_version(&branch.name, prefix) {
            Ok(version) => Some((branch, version)),
            Err(e) => {
                BoundaryWarning::unparsable(&e, &branch.name).emit();
                None
            }
        });

    max_by_version(candidates).ok_or_else(|| {
        RepoToolsError::not_found(format!(
            "could not find any branches of the format {}MAJOR.MINOR",
            prefix
        ))
    })
}

/// Find the latest tag whose MAJOR.MINOR equals that of `branch_version`.
///
/// Pre-releases take part in the ordering, so v1.18.0 wins over v1.18.0-rc.1.
pub fn find_latest_tag<'a>(refs: &'a [Ref], branch_version: &Version) -> Result<(&'a Ref, Version)> {
    let candidates =
        parsed_tags(refs).filter(|(_, version)| same_major_minor(version, branch_version));

    max_by_version(candidates).ok_or_else(|| {
        RepoToolsError::not_found(format!(
            "could not find any SemVer tag that matches branch version {}.{}",
            branch_version.major, branch_version.minor
        ))
    })
}

/// Find the latest SemVer tag among plain tag names (e.g. `git tag` output),
/// optionally restricted to the MAJOR.MINOR of `branch_version`.
pub fn find_latest_tag_name<'a>(
    names: &'a [String],
    branch_version: Option<&Version>,
) -> Result<&'a str> {
    let candidates = names
        .iter()
        .filter_map(|name| match parse_tag_version(name) {
            Ok(version) => Some((name, version)),
            Err(e) => {
                BoundaryWarning::unparsable(&e, name).emit();
                None
            }
        })
        .filter(|(_, version)| branch_version.map_or(true, |b| same_major_minor(version, b)));

    match max_by_version(candidates) {
        Some((name, _)) => Ok(name.as_str()),
        None => match branch_version {
            Some(b) => Err(RepoToolsError::not_found(format!(
                "could not find any SemVer tag that matches branch version {}.{}",
                b.major, b.minor
            ))),
            None => Err(RepoToolsError::not_found(
                "could not find the latest tag from the given input",
            )),
        },
    }
}

// Strictly-greater replacement keeps the first of equal versions.
fn max_by_version<T>(candidates: impl Iterator<Item = (T, Version)>) -> Option<(T, Version)> {
    let mut best: Option<(T, Version)> = None;
    for (item, version) in candidates {
        let replace = match &best {
            Some((_, current)) => cmp_precedence(&version, current) == Ordering::Greater,
            None => true,
        };
        if replace {
            best = Some((item, version));
        }
    }
    best
}
