use crate::analyzer::resolve_range_start;
use crate::cli::command::{run_command, split_command_line};
use crate::cli::{WorkflowOptions, DRY_RUN_PREFIX};
use crate::domain::version::{BRANCH_REF_PREFIX, TAG_REF_PREFIX};
use crate::domain::{parse_tag_version, Ref, RepoSlug};
use crate::error::Result;
use crate::github::{GitHub, NewRelease, Release};
use crate::ui::{confirm_unless_forced, Confirmation, Prompt};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DRY_RUN_NOTES: &str = "dry-run-release-notes";

/// Where the release notes come from
#[derive(Debug, Clone, PartialEq)]
pub enum NotesSource {
    /// No release notes; the release body stays empty
    None,
    /// Read the notes from an existing file
    File(PathBuf),
    /// Generate the notes with an external release notes tool
    Tool(PathBuf),
}

/// Arguments for the create-release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReleaseArgs {
    pub dest: RepoSlug,
    /// Tag name without the `refs/tags/` namespace, e.g. "v1.17.0"
    pub release_tag: String,
    pub notes: NotesSource,
    /// Command line run after the release exists, split on whitespace
    pub build_command: Option<String>,
    /// Asset name to file path
    pub assets: BTreeMap<String, PathBuf>,
    /// Passed to the release notes tool as GITHUB_TOKEN
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Nothing was written
    Declined,
    /// The release exists but asset upload was declined
    ReleaseOnly(Release),
    /// The release exists and the listed assets were uploaded
    Published { release: Release, uploaded: Vec<String> },
}

/// Create a GitHub release for an existing tag and upload its assets.
///
/// 1. Obtain release notes from a file or generate them with the notes tool
/// 2. Confirm, then get or create the release for the tag
/// 3. Run the optional build command
/// 4. Confirm, then upload the assets the release does not have yet
pub fn run_create_release(
    github: &dyn GitHub,
    prompt: &dyn Prompt,
    options: &WorkflowOptions,
    args: &CreateReleaseArgs,
) -> Result<ReleaseOutcome> {
    let body = match &args.notes {
        NotesSource::None => String::new(),
        NotesSource::File(path) => read_release_notes(path, options.dry_run)?,
        NotesSource::Tool(tool) => generate_release_notes(github, options, args, tool)?,
    };

    let message = format!(
        "Do you want to create a release for tag {:?} if it does not exist already?",
        args.release_tag
    );
    if confirm_unless_forced(prompt, options.force, &message)? == Confirmation::Declined {
        return Ok(ReleaseOutcome::Declined);
    }

    let release = get_or_create_release(github, &args.dest, &args.release_tag, &body, options.dry_run)?;

    if let Some(command_line) = args.build_command.as_deref() {
        match split_command_line(command_line) {
            Some((program, build_args)) => run_command(&program, &build_args, &[], options.dry_run)?,
            None => log::warn!("empty --build-command value; skipping build"),
        }
    }

    let message = format!(
        "Do you want to upload the given assets to release {:?}?",
        args.release_tag
    );
    if confirm_unless_forced(prompt, options.force, &message)? == Confirmation::Declined {
        return Ok(ReleaseOutcome::ReleaseOnly(release));
    }

    if args.assets.is_empty() {
        log::warn!("no release assets were provided using --release-asset; skipping upload");
        return Ok(ReleaseOutcome::Published {
            release,
            uploaded: Vec::new(),
        });
    }
    let uploaded = upload_new_assets(github, &args.dest, &release, &args.assets, options.dry_run)?;
    Ok(ReleaseOutcome::Published { release, uploaded })
}

/// Start and end refs of the release notes range for `tag`.
///
/// The end is the tag itself, which must exist in `repo`. The start is picked
/// among all tags of `repo` by [resolve_range_start].
pub fn release_notes_range(github: &dyn GitHub, repo: &RepoSlug, tag: &str) -> Result<(Ref, Ref)> {
    log::info!("finding which commits to use for the release notes tool");
    let end = github.get_ref(repo, &format!("{}{}", TAG_REF_PREFIX, tag))?;
    let tags = github.get_tags(repo)?;
    let start = resolve_range_start(&end, &tags)?.clone();
    log::info!("found start SHA {} and end SHA {}", start.sha, end.sha);
    Ok((start, end))
}

fn generate_release_notes(
    github: &dyn GitHub,
    options: &WorkflowOptions,
    args: &CreateReleaseArgs,
    tool: &Path,
) -> Result<String> {
    let (start, end) = release_notes_range(github, &args.dest, &args.release_tag)?;

    // The tag's release branch, or trunk if it has not been cut yet.
    let version = parse_tag_version(&args.release_tag)?;
    let release_branch = options.naming.branch_for(&version);
    let branch = match github.get_ref(&args.dest, &format!("{}{}", BRANCH_REF_PREFIX, release_branch)) {
        Ok(_) => release_branch,
        Err(e) if e.is_not_found() => options.naming.trunk.clone(),
        Err(e) => return Err(e),
    };

    log::info!("will now run the release notes tool at {:?}", tool);
    let output = tempfile::Builder::new().prefix("release-notes").tempfile()?;
    log::info!("using output path {:?}", output.path());

    let tool_args = vec![
        format!("--start-sha={}", start.sha),
        format!("--end-sha={}", end.sha),
        format!("--output={}", output.path().display()),
        format!("--github-org={}", args.dest.owner),
        format!("--github-repo={}", args.dest.name),
        "--required-author=".to_string(),
        format!("--branch={}", branch),
        "--toc".to_string(),
    ];
    let env: Vec<(&str, &str)> = args
        .token
        .as_deref()
        .map(|token| vec![("GITHUB_TOKEN", token)])
        .unwrap_or_default();
    run_command(&tool.to_string_lossy(), &tool_args, &env, options.dry_run)?;

    // The temporary file is removed when `output` drops.
    read_release_notes(output.path(), options.dry_run)
}

fn read_release_notes(path: &Path, dry_run: bool) -> Result<String> {
    if dry_run {
        log::info!("{}: would read the release notes from {:?}", DRY_RUN_PREFIX, path);
        return Ok(DRY_RUN_NOTES.to_string());
    }
    log::info!("reading the release notes from {:?}", path);
    Ok(fs::read_to_string(path)?)
}

/// Get the release for `tag`, creating it when missing.
///
/// The tag must already exist. In dry-run mode a missing release is
/// synthesized locally with id 0.
pub fn get_or_create_release(
    github: &dyn GitHub,
    repo: &RepoSlug,
    tag: &str,
    body: &str,
    dry_run: bool,
) -> Result<Release> {
    log::info!("checking if tag {:?} exists", tag);
    github.get_ref(repo, &format!("{}{}", TAG_REF_PREFIX, tag))?;

    log::info!("getting release from tag {:?}", tag);
    if let Some(release) = github.get_release_by_tag(repo, tag)? {
        return Ok(release);
    }

    let new_release = NewRelease::for_tag(tag, body);
    if dry_run {
        log::info!("{}: would create release for tag {:?}", DRY_RUN_PREFIX, tag);
        return Ok(Release {
            id: 0,
            tag_name: new_release.tag_name,
            name: Some(new_release.name),
            body: Some(new_release.body),
            html_url: String::new(),
        });
    }
    github.create_release(repo, &new_release)
}

/// Upload the assets whose names the release does not have yet.
///
/// Returns the names of the uploaded assets (or the would-be uploads in
/// dry-run mode).
pub fn upload_new_assets(
    github: &dyn GitHub,
    repo: &RepoSlug,
    release: &Release,
    assets: &BTreeMap<String, PathBuf>,
    dry_run: bool,
) -> Result<Vec<String>> {
    log::info!("checking for existing assets in release {:?}", release.tag_name);
    // A synthesized dry-run release has no assets.
    let existing = if release.id == 0 {
        Vec::new()
    } else {
        github.list_release_assets(repo, release.id)?
    };
    log::info!("found {} assets", existing.len());

    let mut uploaded = Vec::new();
    for (name, path) in assets {
        if existing.iter().any(|asset| &asset.name == name) {
            log::info!("skipping existing asset {:?}", name);
            continue;
        }
        if dry_run {
            log::info!("{}: would upload asset {:?} from {:?}", DRY_RUN_PREFIX, name, path);
        } else {
            github.upload_release_asset(repo, release.id, name, path)?;
        }
        uploaded.push(name.clone());
    }
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_release_notes_dry_run() {
        let notes = read_release_notes(Path::new("/nonexistent/notes.md"), true).unwrap();
        assert_eq!(notes, "dry-run-release-notes");
    }

    #[test]
    fn test_read_release_notes_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "## Changes\n").unwrap();
        assert_eq!(read_release_notes(file.path(), false).unwrap(), "## Changes\n");
        assert!(read_release_notes(Path::new("/nonexistent/notes.md"), false).is_err());
    }
}
