//! Operator input validation for command-line options

use crate::domain::{parse_tag_version, RepoSlug};
use crate::error::{RepoToolsError, Result};
use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

const REPO_PATTERN: &str = r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$";
const TOKEN_PATTERN: &str = r"(v[0-9]\.)?[0-9a-f]{40}";

fn repo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REPO_PATTERN).expect("repository pattern compiles"))
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern compiles"))
}

/// Fails if an option value is empty
pub fn validate_empty_option(option: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(RepoToolsError::validation(format!(
            "the option {:?} cannot be empty",
            option
        )));
    }
    Ok(())
}

/// Validates an `org/repo` option and parses it into a [`RepoSlug`]
pub fn validate_repo(option: &str, value: &str) -> Result<RepoSlug> {
    let caps = repo_regex().captures(value).ok_or_else(|| {
        RepoToolsError::validation(format!(
            "the option {:?} must be of the format 'org/repo', got {:?}",
            option, value
        ))
    })?;
    Ok(RepoSlug::new(&caps[1], &caps[2]))
}

/// Validates a GitHub token: a 40 character hex string with an optional version prefix
pub fn validate_token(option: &str, value: &str) -> Result<()> {
    if !token_regex().is_match(value) {
        return Err(RepoToolsError::validation(format!(
            "the option {:?} must be a 40 character HEX string with an optional version prefix: {}",
            option, TOKEN_PATTERN
        )));
    }
    Ok(())
}

/// Validates that an option holds a semantic version (leading `v` and elided PATCH allowed)
pub fn validate_version(option: &str, value: &str) -> Result<Version> {
    parse_tag_version(value).map_err(|e| {
        RepoToolsError::validation(format!(
            "the option {:?} must be a valid semantic version: {}",
            option, e
        ))
    })
}

/// Validates a release tag such as `v1.17.0-rc.1`.
///
/// Unlike [validate_version] the tag must be a complete semantic version: an
/// elided PATCH or a `refs/tags/` namespace is rejected.
pub fn validate_release_tag(option: &str, value: &str) -> Result<Version> {
    let raw = value.strip_prefix('v').unwrap_or(value);
    Version::parse(raw).map_err(|e| {
        RepoToolsError::validation(format!(
            "the option {:?} must be a complete semantic version such as v1.17.0, got {:?}: {}",
            option, value, e
        ))
    })
}

/// Parses a release asset given as `name=path`.
///
/// Exactly one `=` is allowed and both sides must be non-empty.
pub fn parse_release_asset(value: &str) -> Result<(String, String)> {
    let invalid = || {
        RepoToolsError::validation(format!(
            "invalid asset format {:?}. Value must be formatted as 'name=path'",
            value
        ))
    };
    let mut parts = value.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(path), None) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), path.to_string()))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_option() {
        assert!(validate_empty_option("dest", "").is_err());
        assert!(validate_empty_option("dest", "x").is_ok());
    }

    #[test]
    fn test_validate_repo() {
        let slug = validate_repo("dest", "kubernetes/kube-deploy_1.x").unwrap();
        assert_eq!(slug.owner, "kubernetes");
        assert_eq!(slug.name, "kube-deploy_1.x");
        assert!(validate_repo("dest", "no-slash").is_err());
        assert!(validate_repo("dest", "org/").is_err());
        assert!(validate_repo("dest", "org/repo/extra").is_err());
        assert!(validate_repo("dest", "org/re po").is_err());
    }

    #[test]
    fn test_validate_token() {
        let hex = "0123456789abcdef0123456789abcdef01234567";
        assert!(validate_token("token", hex).is_ok());
        assert!(validate_token("token", &format!("v1.{}", hex)).is_ok());
        assert!(validate_token("token", "short").is_err());
        assert!(validate_token("token", &hex.to_uppercase()).is_err());
    }

    #[test]
    fn test_validate_version() {
        assert_eq!(validate_version("min-version", "v1.17").unwrap(), Version::new(1, 17, 0));
        assert!(validate_version("min-version", "latest").is_err());
    }

    #[test]
    fn test_validate_release_tag() {
        assert_eq!(
            validate_release_tag("release-tag", "v1.17.0-rc.1").unwrap(),
            Version::parse("1.17.0-rc.1").unwrap()
        );
        assert!(validate_release_tag("release-tag", "1.17.0").is_ok());
        assert!(validate_release_tag("release-tag", "v1.18").is_err());
        assert!(validate_release_tag("release-tag", "refs/tags/v1.18.0").is_err());
        assert!(validate_release_tag("release-tag", "latest").is_err());
    }

    #[test]
    fn test_parse_release_asset() {
        assert_eq!(
            parse_release_asset("binary=out/kinder").unwrap(),
            ("binary".to_string(), "out/kinder".to_string())
        );
        assert!(parse_release_asset("key2-value").is_err());
        assert!(parse_release_asset("=value").is_err());
        assert!(parse_release_asset("key=").is_err());
        assert!(parse_release_asset("foo=bar=z").is_err());
    }
}
