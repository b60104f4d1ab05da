use crate::analyzer::find_latest_tag_name;
use crate::domain::parse_branch_version;
use crate::error::{RepoToolsError, Result};
use crate::git::Repository;
use std::io::BufRead;

/// Read tag names, one per line
pub fn read_tag_lines(input: impl BufRead) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line.map_err(|e| {
            RepoToolsError::validation(format!("error scanning the given input: {}", e))
        })?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    log::info!("using the following input: {:?}", lines);
    Ok(lines)
}

/// Latest SemVer tag among `tags`.
///
/// With `branch` (e.g. "release-1.17") the search is restricted to tags with
/// the same MAJOR.MINOR. Lines that are not versions are skipped with a
/// warning.
pub fn run_latest_version(tags: &[String], branch: Option<&str>, prefix: &str) -> Result<String> {
    let branch_version = match branch {
        Some(branch) => Some(parse_branch_version(branch, prefix).map_err(|e| {
            RepoToolsError::validation(format!(
                "could not extract a SemVer from the given branch: {}",
                e
            ))
        })?),
        None => None,
    };

    let latest = find_latest_tag_name(tags, branch_version.as_ref())?;
    log::info!("found latest tag {:?}", latest);
    Ok(latest.to_string())
}

/// Latest SemVer tag among the tags of a local repository
pub fn latest_version_from_repository(
    repo: &dyn Repository,
    branch: Option<&str>,
    prefix: &str,
) -> Result<String> {
    let tags = repo.list_tags()?;
    log::info!("found {} tags in the repository", tags.len());
    run_latest_version(&tags, branch, prefix)
}
