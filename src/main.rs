use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use k8s_repo_tools::cli::output::{self, FastForwardOutput};
use k8s_repo_tools::cli::{
    self, CreateReleaseArgs, FastForwardArgs, FastForwardOutcome, GoModDiffArgs, NotesSource,
    ReleaseOutcome, SyncArgs, WorkflowOptions,
};
use k8s_repo_tools::config::{self, Config};
use k8s_repo_tools::git::Git2Repository;
use k8s_repo_tools::github::RestClient;
use k8s_repo_tools::ui::{self, ConsolePrompt};
use k8s_repo_tools::validation;

#[derive(Parser)]
#[command(
    name = "k8s-repo-tools",
    version,
    about = "Release engineering tools for Kubernetes GitHub repositories"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct WriteArgs {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub token")]
    token: Option<String>,

    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        help = "Only log repository writes; pass --dry-run=false to write [default: true]"
    )]
    dry_run: Option<bool>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Prefix of versioned release branches")]
    branch_prefix: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Timeout for each GitHub API request")]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Sync release tags and branches from a source to a destination repository
    Sync {
        #[command(flatten)]
        write: WriteArgs,

        #[arg(long, help = "Source repository as org/repo")]
        source: String,

        #[arg(long, help = "Destination repository as org/repo")]
        dest: String,

        #[arg(long, help = "Ignore refs older than this version, e.g. v1.17.0")]
        min_version: String,

        #[arg(long, help = "Write the new refs as JSON to this file")]
        output: Option<PathBuf>,
    },

    /// Fast-forward the latest release branch to the default branch
    FastForward {
        #[command(flatten)]
        write: WriteArgs,

        #[arg(long, help = "Repository as org/repo")]
        dest: String,

        #[arg(long, help = "Write the result as JSON to this file")]
        output: Option<PathBuf>,
    },

    /// Create a GitHub release for an existing tag and upload assets
    CreateRelease {
        #[command(flatten)]
        write: WriteArgs,

        #[arg(long, help = "Repository as org/repo")]
        dest: String,

        #[arg(long, help = "Existing tag to create the release for, e.g. v1.17.0")]
        release_tag: String,

        #[arg(long, conflicts_with = "release_notes_tool_path", help = "Read release notes from this file")]
        release_notes_path: Option<PathBuf>,

        #[arg(long, help = "Generate release notes with this tool")]
        release_notes_tool_path: Option<PathBuf>,

        #[arg(long, help = "Command that builds the release assets")]
        build_command: Option<String>,

        #[arg(long, value_name = "NAME=PATH", help = "Asset to upload; can be repeated")]
        release_asset: Vec<String>,
    },

    /// Compare the direct dependency versions of two go.mod files
    GomodDiff {
        #[arg(long, help = "Local go.mod file or URL")]
        source: String,

        #[arg(long, help = "Remote go.mod file or URL")]
        dest: String,

        #[arg(long, value_name = "SECONDS", help = "Timeout for downloading a go.mod")]
        timeout: Option<u64>,

        #[arg(long, help = "Write all dependency versions as JSON to this file")]
        output: Option<PathBuf>,
    },

    /// Print the latest SemVer tag from stdin (one per line) or a local repository
    LatestVersion {
        #[arg(long, help = "Only consider tags of this release branch, e.g. release-1.17")]
        branch: Option<String>,

        #[arg(long, help = "Prefix of versioned release branches")]
        branch_prefix: Option<String>,

        #[arg(long, help = "Read tags from this Git repository instead of stdin")]
        repo: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args.command, config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    log::info!("done!");
    Ok(())
}

fn run(command: Command, mut config: Config) -> Result<()> {
    match command {
        Command::Sync {
            write,
            source,
            dest,
            min_version,
            output,
        } => {
            let args = SyncArgs {
                source: validation::validate_repo("source", &source)?,
                dest: validation::validate_repo("dest", &dest)?,
                min_version: validation::validate_version("min-version", &min_version)?,
            };
            let (options, client) = prepare(&write, &mut config)?;
            let refs = cli::run_sync(&client, &ConsolePrompt::new(), &options, &args)?;
            if let Some(path) = output {
                output::write_refs(&path, &refs)?;
            }
            Ok(())
        }

        Command::FastForward {
            write,
            dest,
            output,
        } => {
            let args = FastForwardArgs {
                dest: validation::validate_repo("dest", &dest)?,
            };
            let (options, client) = prepare(&write, &mut config)?;
            let result = cli::run_fast_forward(&client, &ConsolePrompt::new(), &options, &args);
            if let Some(path) = output {
                let out = match &result {
                    Ok(outcome) => FastForwardOutput::from_outcome(outcome),
                    Err(e) => FastForwardOutput::from_error(e),
                };
                output::write_fast_forward(&path, &out)?;
            }
            match result? {
                FastForwardOutcome::Merged { branch, commit } => ui::display_success(&format!(
                    "fast-forwarded {} with commit {}",
                    branch.name, commit.sha
                )),
                FastForwardOutcome::Skipped(reason) => ui::display_status(&reason.to_string()),
                FastForwardOutcome::Declined => {}
            }
            Ok(())
        }

        Command::CreateRelease {
            write,
            dest,
            release_tag,
            release_notes_path,
            release_notes_tool_path,
            build_command,
            release_asset,
        } => {
            validation::validate_release_tag("release-tag", &release_tag)?;
            let notes = match (release_notes_path, release_notes_tool_path) {
                (Some(path), _) => NotesSource::File(path),
                (None, Some(tool)) => NotesSource::Tool(tool),
                (None, None) => NotesSource::None,
            };
            // Later duplicates override earlier ones.
            let mut assets = BTreeMap::new();
            for value in &release_asset {
                let (name, path) = validation::parse_release_asset(value)?;
                assets.insert(name, PathBuf::from(path));
            }
            let args = CreateReleaseArgs {
                dest: validation::validate_repo("dest", &dest)?,
                release_tag,
                notes,
                build_command: build_command.filter(|c| !c.trim().is_empty()),
                assets,
                token: write.token.clone(),
            };
            let (options, client) = prepare(&write, &mut config)?;
            match cli::run_create_release(&client, &ConsolePrompt::new(), &options, &args)? {
                ReleaseOutcome::Published { release, uploaded } => ui::display_success(&format!(
                    "release {} is ready with {} new assets",
                    release.tag_name,
                    uploaded.len()
                )),
                ReleaseOutcome::ReleaseOnly(release) => {
                    ui::display_success(&format!("release {} is ready", release.tag_name))
                }
                ReleaseOutcome::Declined => {}
            }
            Ok(())
        }

        Command::GomodDiff {
            source,
            dest,
            timeout,
            output,
        } => {
            validation::validate_empty_option("source", &source)?;
            validation::validate_empty_option("dest", &dest)?;
            if let Some(timeout) = timeout {
                config.github.timeout_secs = timeout;
            }
            let args = GoModDiffArgs {
                source,
                dest,
                timeout: config.github.timeout(),
            };
            let diff = cli::run_gomod_diff(&args)?;
            if let Some(path) = output {
                output::write_gomod_diff(&path, &diff)?;
            }
            cli::format_gomod_diff(&mut io::stdout().lock(), &diff, &args.source, &args.dest)?;
            Ok(())
        }

        Command::LatestVersion {
            branch,
            branch_prefix,
            repo,
        } => {
            let prefix = branch_prefix.unwrap_or(config.branches.prefix);
            let latest = match repo {
                Some(path) => {
                    let repo = Git2Repository::open(&path)
                        .with_context(|| format!("opening repository {}", path.display()))?;
                    cli::latest_version_from_repository(&repo, branch.as_deref(), &prefix)?
                }
                None => {
                    let tags = cli::read_tag_lines(io::stdin().lock())?;
                    cli::run_latest_version(&tags, branch.as_deref(), &prefix)?
                }
            };
            println!("{}", latest);
            Ok(())
        }
    }
}

/// Apply write flags over the configuration and build the GitHub client
fn prepare(write: &WriteArgs, config: &mut Config) -> Result<(WorkflowOptions, RestClient)> {
    if let Some(prefix) = &write.branch_prefix {
        validation::validate_empty_option("branch-prefix", prefix)?;
        config.branches.prefix = prefix.clone();
    }
    if let Some(timeout) = write.timeout {
        config.github.timeout_secs = timeout;
    }
    if let Some(dry_run) = write.dry_run {
        config.behavior.dry_run = dry_run;
    }
    config.behavior.force |= write.force;

    let token = write.token.as_deref().filter(|t| !t.is_empty());
    match token {
        Some(token) => validation::validate_token("token", token)?,
        None if !config.behavior.dry_run => {
            anyhow::bail!("a GitHub token is required; pass --token or set GITHUB_TOKEN")
        }
        None => log::warn!("no GitHub token given; API rate limits are low"),
    }

    let options = WorkflowOptions::from_config(config);
    if options.dry_run {
        ui::display_dry_run_notice("dry-run");
    }
    let client = RestClient::new(&config.github, token)?;
    Ok((options, client))
}
