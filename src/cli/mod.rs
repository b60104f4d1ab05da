//! Workflow orchestration
//!
//! Each subcommand of the binary is a workflow here. Workflows take their
//! collaborators as arguments (a [GitHub] implementation and a [Prompt]) so
//! they can be driven programmatically and tested against the in-memory mock.
//!
//! [GitHub]: crate::github::GitHub
//! [Prompt]: crate::ui::Prompt

pub mod command;
pub mod create_release;
pub mod fast_forward;
pub mod gomod_diff;
pub mod latest_version;
pub mod output;
pub mod sync;

pub use create_release::{run_create_release, CreateReleaseArgs, NotesSource, ReleaseOutcome};
pub use fast_forward::{run_fast_forward, FastForwardArgs, FastForwardOutcome, SkipReason};
pub use gomod_diff::{format_gomod_diff, run_gomod_diff, GoModDiff, GoModDiffArgs};
pub use latest_version::{latest_version_from_repository, read_tag_lines, run_latest_version};
pub use sync::{run_sync, SyncArgs};

use crate::config::Config;
use crate::domain::{BranchNaming, Ref, RepoSlug};

/// Log prefix for actions skipped in dry-run mode
pub const DRY_RUN_PREFIX: &str = "DRY-RUN";

/// Settings shared by the repository-writing workflows
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOptions {
    pub naming: BranchNaming,
    /// Log writes instead of performing them
    pub dry_run: bool,
    /// Skip confirmation prompts
    pub force: bool,
}

impl WorkflowOptions {
    pub fn from_config(config: &Config) -> Self {
        WorkflowOptions {
            naming: config.branches.naming(),
            dry_run: config.behavior.dry_run,
            force: config.behavior.force,
        }
    }
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        WorkflowOptions::from_config(&Config::default())
    }
}

pub(crate) fn log_ref_list(title: &str, repo: &RepoSlug, refs: &[Ref]) {
    let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
    log::info!("{} for repository {:?}: {:?}", title, repo.to_string(), names);
}
