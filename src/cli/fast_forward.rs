use crate::analyzer::{find_latest_branch, find_latest_tag, FastForwardWindow};
use crate::cli::{log_ref_list, WorkflowOptions, DRY_RUN_PREFIX};
use crate::domain::{format_merge_commit_message, Ref, RepoSlug};
use crate::error::{RepoToolsError, Result};
use crate::github::{ComparisonStatus, GitHub, MergeCommit, MergeResult};
use crate::ui::{confirm_unless_forced, Confirmation, Prompt};
use std::fmt;

const DRY_RUN_SHA: &str = "dry-run-sha";
const STATUS_CREATED: u16 = 201;

/// Arguments for the fast-forward workflow
#[derive(Debug, Clone, PartialEq)]
pub struct FastForwardArgs {
    pub dest: RepoSlug,
}

/// Why a fast-forward did not happen. None of these is a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoReleaseBranch { reason: String },
    OutsideWindow {
        tag: String,
        branch: String,
        window: FastForwardWindow,
    },
    IdenticalBranches { branch: String, trunk: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoReleaseBranch { reason } => write!(f, "{}", reason),
            SkipReason::OutsideWindow { tag, branch, window } => write!(
                f,
                "the latest versioned tag {:?} for branch {:?} does not fall within the fast-forward window: {}",
                tag, branch, window
            ),
            SkipReason::IdenticalBranches { branch, trunk } => {
                write!(f, "the branches {:?} and {:?} are identical", trunk, branch)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FastForwardOutcome {
    /// Trunk was merged into the release branch
    Merged { branch: Ref, commit: MergeCommit },
    Skipped(SkipReason),
    /// The operator declined the merge
    Declined,
}

/// Fast-forward the latest release branch of `dest` to its trunk.
///
/// The merge only happens while the latest tag of the branch lies in the
/// [FastForwardWindow] and trunk is strictly ahead of the branch.
///
/// # Returns
/// * `Ok(FastForwardOutcome)` - Merged, skipped with a reason, or declined
/// * `Err` - On API failures, an unexpected comparison or merge status, or a
///   release branch without any matching tag
pub fn run_fast_forward(
    github: &dyn GitHub,
    prompt: &dyn Prompt,
    options: &WorkflowOptions,
    args: &FastForwardArgs,
) -> Result<FastForwardOutcome> {
    let naming = &options.naming;
    let dest = args.dest.to_string();
    log::info!("using branch prefix {:?}", naming.prefix);

    let tags = github.get_tags(&args.dest)?;
    let branches = github.get_branches(&args.dest)?;
    log_ref_list("existing tags", &args.dest, &tags);
    log_ref_list("existing branches", &args.dest, &branches);

    let (branch, branch_version) = match find_latest_branch(&branches, &naming.prefix) {
        Ok(found) => found,
        Err(e) if e.is_not_found() => {
            return Ok(FastForwardOutcome::Skipped(SkipReason::NoReleaseBranch {
                reason: e.to_string(),
            }))
        }
        Err(e) => return Err(e),
    };
    log::info!("found {:?} as the latest versioned branch", branch.name);

    let (tag, tag_version) = find_latest_tag(&tags, &branch_version)?;
    log::info!(
        "found {:?} as the latest versioned tag for branch {:?}",
        tag.name,
        branch.name
    );

    let window = FastForwardWindow::for_branch(&branch_version);
    if !window.contains(&tag_version) {
        let reason = SkipReason::OutsideWindow {
            tag: tag.name.clone(),
            branch: branch.name.clone(),
            window,
        };
        log::info!("{}", reason);
        return Ok(FastForwardOutcome::Skipped(reason));
    }

    let base = branch.short_name();
    let head = naming.trunk.as_str();
    let comparison = github.compare(&args.dest, base, head)?;
    match comparison.status {
        ComparisonStatus::Ahead => {}
        ComparisonStatus::Identical => {
            let reason = SkipReason::IdenticalBranches {
                branch: branch.name.clone(),
                trunk: head.to_string(),
            };
            log::info!("{}", reason);
            return Ok(FastForwardOutcome::Skipped(reason));
        }
        status => {
            return Err(RepoToolsError::github(format!(
                "got unhandled status {:?} comparing branches {:?} and {:?}. Please check the state of the repository!",
                status.to_string(),
                head,
                branch.name
            )))
        }
    }
    if comparison.commits.is_empty() {
        return Err(RepoToolsError::github(format!(
            "branch {:?} was reported with status {:?}, but there are no new commits",
            head,
            comparison.status.to_string()
        )));
    }

    log::info!(
        "branch {:?} is ahead of {:?} by {} commits",
        head,
        branch.name,
        comparison.total_commits
    );
    let mut commit_urls = String::from("list of commits:");
    for commit in &comparison.commits {
        commit_urls.push('\n');
        commit_urls.push_str(&commit.html_url);
    }
    log::info!("{}", commit_urls);
    log::info!("comparison URL:\n{}", comparison.html_url);

    let message = format!(
        "Do you want to fast-forward branch {:?} of repository {:?}?",
        branch.name, dest
    );
    if confirm_unless_forced(prompt, options.force, &message)? == Confirmation::Declined {
        return Ok(FastForwardOutcome::Declined);
    }

    let commit_message = format_merge_commit_message(base, head);
    let result = if options.dry_run {
        log::info!(
            "{}: would create a merge commit in repository {:?}",
            DRY_RUN_PREFIX,
            dest
        );
        MergeResult {
            status: STATUS_CREATED,
            commit: Some(MergeCommit {
                sha: DRY_RUN_SHA.to_string(),
                message: commit_message,
                html_url: None,
            }),
        }
    } else {
        github.merge(&args.dest, base, head, &commit_message)?
    };

    if result.status != STATUS_CREATED {
        return Err(RepoToolsError::github(format!(
            "unexpected status {} when merging branch {:?} into {:?}. Please verify if the branch is mergeable!",
            result.status, head, branch.name
        )));
    }
    let commit = result.commit.ok_or_else(|| {
        RepoToolsError::github("the merge was reported as created, but no commit was returned")
    })?;
    log::info!("created commit with SHA {:?} in repository {:?}", commit.sha, dest);

    Ok(FastForwardOutcome::Merged {
        branch: branch.clone(),
        commit,
    })
}
