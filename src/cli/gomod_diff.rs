use crate::domain::{parse_gomod, GoModFile};
use crate::error::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::time::Duration;

/// Key under which the `go` directive versions are reported
pub const GO_VERSION_KEY: &str = "Golang";

const MIN_COLUMN_WIDTH: usize = 12;
const COLUMN_PADDING: usize = 2;

/// Arguments for the gomod-diff workflow
#[derive(Debug, Clone, PartialEq)]
pub struct GoModDiffArgs {
    /// Local go.mod, a file path or an http(s) URL
    pub source: String,
    /// Remote go.mod, a file path or an http(s) URL
    pub dest: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VersionPair {
    pub local: String,
    /// Empty when the remote file does not require the module
    pub remote: String,
}

/// Versions of every direct dependency of the local go.mod, plus the Go version
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoModDiff {
    pub dependencies: BTreeMap<String, VersionPair>,
}

impl GoModDiff {
    /// Entries whose remote version is known and differs from the local one
    pub fn differences(&self) -> impl Iterator<Item = (&String, &VersionPair)> {
        self.dependencies
            .iter()
            .filter(|(_, pair)| !pair.remote.is_empty() && pair.local != pair.remote)
    }
}

/// Pair the direct requirements of `local` with their versions in `remote`.
///
/// Indirect requirements are ignored on both sides. Modules only `remote`
/// requires are not reported.
pub fn diff_gomod(local: &GoModFile, remote: &GoModFile) -> GoModDiff {
    let mut dependencies: BTreeMap<String, VersionPair> = local
        .direct_requirements()
        .map(|r| {
            (
                r.path.clone(),
                VersionPair {
                    local: r.version.clone(),
                    remote: String::new(),
                },
            )
        })
        .collect();

    for requirement in remote.direct_requirements() {
        if let Some(pair) = dependencies.get_mut(&requirement.path) {
            pair.remote = requirement.version.clone();
        }
    }

    dependencies.insert(
        GO_VERSION_KEY.to_string(),
        VersionPair {
            local: local.go.clone().unwrap_or_default(),
            remote: remote.go.clone().unwrap_or_default(),
        },
    );
    GoModDiff { dependencies }
}

/// Parse two go.mod contents and compare them
pub fn compare_gomod(local: &str, remote: &str) -> Result<GoModDiff> {
    let local = parse_gomod(local)?;
    let remote = parse_gomod(remote)?;
    Ok(diff_gomod(&local, &remote))
}

/// Write the differing versions as an aligned `PATH LOCAL REMOTE` table.
///
/// Nothing is written when no version differs.
pub fn format_gomod_diff(
    w: &mut impl Write,
    diff: &GoModDiff,
    local_name: &str,
    remote_name: &str,
) -> io::Result<()> {
    let mut rows: Vec<[&str; 3]> = diff
        .differences()
        .map(|(path, pair)| [path.as_str(), pair.local.as_str(), pair.remote.as_str()])
        .collect();
    if rows.is_empty() {
        return Ok(());
    }
    rows.insert(0, ["PATH", "LOCAL", "REMOTE"]);

    let width = |column: usize| {
        rows.iter()
            .map(|row| row[column].chars().count() + COLUMN_PADDING)
            .max()
            .unwrap_or(0)
            .max(MIN_COLUMN_WIDTH)
    };
    let (path_width, local_width) = (width(0), width(1));

    writeln!(
        w,
        "Comparing Go module files, local: {}, remote: {}",
        local_name, remote_name
    )?;
    writeln!(w, "The following dependency versions differ:")?;
    for [path, local, remote] in rows {
        writeln!(
            w,
            "{:<pw$}{:<lw$}{}",
            path,
            local,
            remote,
            pw = path_width,
            lw = local_width
        )?;
    }
    Ok(())
}

/// Read a go.mod from an http(s) URL or a local file
pub fn read_gomod_source(source: &str, timeout: Duration) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        log::info!("downloading {:?}", source);
        let client = Client::builder().timeout(timeout).build()?;
        let response = client.get(source).send()?.error_for_status()?;
        return Ok(response.text()?);
    }
    log::info!("reading {:?}", source);
    Ok(fs::read_to_string(source)?)
}

/// Compare the direct dependency versions of two go.mod files
pub fn run_gomod_diff(args: &GoModDiffArgs) -> Result<GoModDiff> {
    let local = read_gomod_source(&args.source, args.timeout)?;
    let remote = read_gomod_source(&args.dest, args.timeout)?;
    compare_gomod(&local, &remote)
}
