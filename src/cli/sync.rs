use crate::analyzer::{find_branch_sha_for_tag, find_new_refs, trim_branches, trim_tags};
use crate::cli::{log_ref_list, WorkflowOptions, DRY_RUN_PREFIX};
use crate::domain::{Ref, RepoSlug};
use crate::error::{RepoToolsError, Result};
use crate::github::GitHub;
use crate::ui::{self, confirm_unless_forced, Confirmation, Prompt};
use semver::Version;

/// Arguments for the sync workflow
#[derive(Debug, Clone, PartialEq)]
pub struct SyncArgs {
    pub source: RepoSlug,
    pub dest: RepoSlug,
    /// Refs older than this are ignored on both sides
    pub min_version: Version,
}

/// Mirror release tags and branches from `source` into `dest`.
///
/// 1. Fetch and trim the tags and branches of both repositories
/// 2. Diff them by name and show the new refs
/// 3. Confirm, then create new branches at the destination trunk HEAD
/// 4. Create new tags at the HEAD of their release branch (or trunk)
///
/// # Returns
/// The new refs sorted by name. After writing they carry the SHAs from the
/// destination; when the prompt is declined they carry the source SHAs.
pub fn run_sync(
    github: &dyn GitHub,
    prompt: &dyn Prompt,
    options: &WorkflowOptions,
    args: &SyncArgs,
) -> Result<Vec<Ref>> {
    let prefix = options.naming.prefix.as_str();
    log::info!("using minimum version {:?}", args.min_version.to_string());
    log::info!("using branch prefix {:?}", prefix);

    let tags_src = trim_tags(&github.get_tags(&args.source)?, &args.min_version);
    let branches_src = trim_branches(&github.get_branches(&args.source)?, &args.min_version, prefix);
    log_ref_list("existing tags", &args.source, &tags_src);
    log_ref_list("existing branches", &args.source, &branches_src);

    let mut tags_dest = github.get_tags(&args.dest)?;
    let mut branches_dest = github.get_branches(&args.dest)?;
    let tags_dest_trimmed = trim_tags(&tags_dest, &args.min_version);
    let branches_dest_trimmed = trim_branches(&branches_dest, &args.min_version, prefix);
    log_ref_list("existing tags", &args.dest, &tags_dest_trimmed);
    log_ref_list("existing branches", &args.dest, &branches_dest_trimmed);

    let mut new_tags = find_new_refs(&tags_src, &tags_dest_trimmed);
    let mut new_branches = find_new_refs(&branches_src, &branches_dest_trimmed);
    if new_tags.is_empty() && new_branches.is_empty() {
        log::info!("no new branches and tags for repository {:?}", args.dest.to_string());
        return Ok(Vec::new());
    }

    let dest = args.dest.to_string();
    ui::display_separator();
    ui::display_ref_list("new tags", &dest, &new_tags);
    ui::display_ref_list("new branches", &dest, &new_branches);
    ui::display_separator();

    let message = format!("Do you want to write these changes to repository {:?}?", dest);
    if confirm_unless_forced(prompt, options.force, &message)? == Confirmation::Declined {
        return Ok(sorted(new_tags, new_branches));
    }

    let trunk_sha = options
        .naming
        .trunk_sha(&branches_dest)
        .map(str::to_string)
        .ok_or_else(|| {
            RepoToolsError::not_found(format!(
                "the repository {:?} does not have a branch called {:?}",
                dest, options.naming.trunk
            ))
        })?;

    // New branches always start at trunk.
    for branch in &new_branches {
        let reference = Ref::new(branch.name.clone(), trunk_sha.clone());
        create_ref(github, &args.dest, reference, options.dry_run, &mut branches_dest)?;
    }
    if !options.dry_run {
        branches_dest = github.get_branches(&args.dest)?;
    }
    refresh(&mut new_branches, &branches_dest);

    for tag in &new_tags {
        let sha = find_branch_sha_for_tag(tag, &branches_dest, &options.naming, &trunk_sha);
        let reference = Ref::new(tag.name.clone(), sha);
        create_ref(github, &args.dest, reference, options.dry_run, &mut tags_dest)?;
    }
    if !options.dry_run {
        tags_dest = github.get_tags(&args.dest)?;
    }
    refresh(&mut new_tags, &tags_dest);

    Ok(sorted(new_tags, new_branches))
}

// In dry-run mode the ref is recorded in `known` as if it had been created.
fn create_ref(
    github: &dyn GitHub,
    repo: &RepoSlug,
    reference: Ref,
    dry_run: bool,
    known: &mut Vec<Ref>,
) -> Result<()> {
    if dry_run {
        log::info!(
            "{}: would create ref {:?} from commit {:?} in repository {:?}",
            DRY_RUN_PREFIX,
            reference.name,
            reference.sha,
            repo.to_string()
        );
        known.push(reference);
        return Ok(());
    }
    github.create_ref(repo, &reference)?;
    Ok(())
}

fn refresh(refs: &mut [Ref], current: &[Ref]) {
    for reference in refs.iter_mut() {
        if let Some(found) = current.iter().find(|r| r.name == reference.name) {
            reference.sha = found.sha.clone();
        }
    }
}

fn sorted(tags: Vec<Ref>, branches: Vec<Ref>) -> Vec<Ref> {
    let mut refs = tags;
    refs.extend(branches);
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_updates_sha_by_name() {
        let mut refs = vec![Ref::tag("v1.0.0", "old"), Ref::tag("v1.1.0", "keep")];
        refresh(&mut refs, &[Ref::tag("v1.0.0", "new")]);
        assert_eq!(refs[0].sha, "new");
        assert_eq!(refs[1].sha, "keep");
    }

    #[test]
    fn test_sorted_merges_by_name() {
        let refs = sorted(
            vec![Ref::tag("v1.17.0", "a")],
            vec![Ref::branch("release-1.17", "b")],
        );
        assert_eq!(refs[0].name, "refs/heads/release-1.17");
        assert_eq!(refs[1].name, "refs/tags/v1.17.0");
    }
}
