use crate::cli::DRY_RUN_PREFIX;
use crate::error::{RepoToolsError, Result};
use std::process::Command;

/// Split a command line on whitespace into a program and its arguments
pub fn split_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Run an external program, inheriting stdout and stderr.
///
/// In dry-run mode the command is only logged.
///
/// # Arguments
/// * `program` - Path or name of the program
/// * `args` - Arguments passed to the program
/// * `env` - Extra environment variables on top of the current environment
/// * `dry_run` - Log instead of running
///
/// # Returns
/// * `Ok(())` if the program exits with code 0 or in dry-run mode
/// * `Err(RepoToolsError::Command)` if it cannot be started or exits non-zero
pub fn run_command(program: &str, args: &[String], env: &[(&str, &str)], dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!("{}: would run command: {}", DRY_RUN_PREFIX, program);
        log::info!("{}: using arguments: {:?}", DRY_RUN_PREFIX, args);
        return Ok(());
    }
    log::info!("running command: {}", program);
    log::info!("using arguments: {:?}", args);

    let status = Command::new(program)
        .args(args)
        .envs(env.iter().copied())
        .status()
        .map_err(|e| RepoToolsError::command(format!("failed to execute {}: {}", program, e)))?;

    if !status.success() {
        return Err(RepoToolsError::command(format!(
            "{} failed with exit code {}",
            program,
            status.code().unwrap_or(-1)
        )));
    }
    Ok(())
}
