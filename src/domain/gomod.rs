//! Minimal go.mod reader
//!
//! Only the directives needed to compare dependency versions are kept: the
//! module path, the `go` directive and `require` entries. `replace`,
//! `exclude`, `retract`, `toolchain` and `godebug` are accepted and skipped.

use crate::error::{RepoToolsError, Result};

const INDIRECT_MARKER: &str = "indirect";

/// A `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Marked with a trailing `// indirect` comment
    pub indirect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoModFile {
    pub module: Option<String>,
    /// Version from the `go` directive, e.g. "1.13"
    pub go: Option<String>,
    pub require: Vec<Requirement>,
}

impl GoModFile {
    /// Requirements that are not marked indirect, in file order
    pub fn direct_requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.require.iter().filter(|r| !r.indirect)
    }
}

/// Parse the content of a go.mod file.
///
/// Both the single line (`require a v1`) and the block form
/// (`require ( ... )`) are supported.
///
/// # Returns
/// * `Ok(GoModFile)` - Parsed directives
/// * `Err(RepoToolsError::GoMod)` - Unknown directive, wrong argument count or
///   an unterminated block, with the 1-based line number
pub fn parse_gomod(content: &str) -> Result<GoModFile> {
    let mut file = GoModFile::default();
    let mut block: Option<(String, usize)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_number = index + 1;
        let (code, comment) = split_comment(raw);
        let tokens: Vec<&str> = code.split_whitespace().collect();

        if let Some(verb) = block.as_ref().map(|(verb, _)| verb.clone()) {
            match tokens.as_slice() {
                [] => {}
                [")"] => block = None,
                args => apply(&mut file, &verb, args, comment, line_number)?,
            }
            continue;
        }

        match tokens.as_slice() {
            [] => {}
            [verb, "("] => {
                check_known(verb, line_number)?;
                block = Some((verb.to_string(), line_number));
            }
            [verb, args @ ..] => apply(&mut file, verb, args, comment, line_number)?,
        }
    }

    if let Some((verb, line)) = block {
        return Err(RepoToolsError::gomod(
            line,
            format!("{} block is never closed", verb),
        ));
    }
    Ok(file)
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(i) => (&line[..i], Some(line[i + 2..].trim())),
        None => (line, None),
    }
}

fn check_known(verb: &str, line: usize) -> Result<()> {
    match verb {
        "module" | "go" | "toolchain" | "godebug" | "require" | "replace" | "exclude"
        | "retract" => Ok(()),
        _ => Err(RepoToolsError::gomod(
            line,
            format!("unknown directive {:?}", verb),
        )),
    }
}

fn apply(
    file: &mut GoModFile,
    verb: &str,
    args: &[&str],
    comment: Option<&str>,
    line: usize,
) -> Result<()> {
    check_known(verb, line)?;
    let wrong_arity = |expected: &str| {
        RepoToolsError::gomod(
            line,
            format!("{} expects {}, got {:?}", verb, expected, args.join(" ")),
        )
    };

    match verb {
        "module" => match args {
            [path] => file.module = Some(unquote(path)),
            _ => return Err(wrong_arity("a module path")),
        },
        "go" => match args {
            [version] => file.go = Some(version.to_string()),
            _ => return Err(wrong_arity("a Go version")),
        },
        "require" => match args {
            [path, version] => file.require.push(Requirement {
                path: unquote(path),
                version: unquote(version),
                indirect: is_indirect(comment),
            }),
            _ => return Err(wrong_arity("a module path and a version")),
        },
        _ => {
            if args.is_empty() {
                return Err(wrong_arity("arguments"));
            }
        }
    }
    Ok(())
}

fn is_indirect(comment: Option<&str>) -> bool {
    match comment {
        Some(c) => c == INDIRECT_MARKER || c.starts_with("indirect;"),
        None => false,
    }
}

fn unquote(token: &str) -> String {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
        .to_string()
}
