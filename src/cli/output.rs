//! JSON output files written by the workflows

use crate::cli::gomod_diff::GoModDiff;
use crate::cli::FastForwardOutcome;
use crate::domain::Ref;
use crate::error::Result;
use crate::github::MergeCommit;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Output of the fast-forward workflow.
///
/// `outputError` carries the reason when no merge happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastForwardOutput {
    #[serde(rename = "outputError")]
    pub output_error: Option<String>,
    pub reference: Option<Ref>,
    pub commit: Option<MergeCommit>,
}

impl FastForwardOutput {
    pub fn from_outcome(outcome: &FastForwardOutcome) -> Self {
        match outcome {
            FastForwardOutcome::Merged { branch, commit } => FastForwardOutput {
                output_error: None,
                reference: Some(branch.clone()),
                commit: Some(commit.clone()),
            },
            FastForwardOutcome::Skipped(reason) => FastForwardOutput::from_error(reason),
            FastForwardOutcome::Declined => FastForwardOutput {
                output_error: None,
                reference: None,
                commit: None,
            },
        }
    }

    pub fn from_error(error: &dyn std::fmt::Display) -> Self {
        FastForwardOutput {
            output_error: Some(error.to_string()),
            reference: None,
            commit: None,
        }
    }
}

/// Write a list of refs as a JSON array of `{ "ref", "sha" }` objects
pub fn write_refs(path: &Path, refs: &[Ref]) -> Result<()> {
    log::info!("writing the resulted tags and branches to the file {:?}", path);
    write_json(path, &refs)
}

pub fn write_fast_forward(path: &Path, output: &FastForwardOutput) -> Result<()> {
    log::info!("writing the resulted output to the file {:?}", path);
    write_json(path, output)
}

pub fn write_gomod_diff(path: &Path, diff: &GoModDiff) -> Result<()> {
    log::info!("writing the dependency versions to the file {:?}", path);
    write_json(path, diff)
}

// Output may name private refs, so the file is only readable by the owner.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let buf = serde_json::to_string_pretty(value)?;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(buf.as_bytes())?;
    Ok(())
}
