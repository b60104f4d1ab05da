//! Pure formatting functions for UI output.
//!
//! Human-facing summaries go to stdout, errors to stderr. Diagnostics go
//! through the `log` facade instead.

use console::style;

use crate::domain::Ref;

const SEPARATOR_WIDTH: usize = 80;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_separator() {
    println!("{}", style("-".repeat(SEPARATOR_WIDTH)).dim());
}

/// Warn that no repository writes will happen.
///
/// # Arguments
/// * `flag` - The flag that disables dry-run mode
pub fn display_dry_run_notice(flag: &str) {
    display_separator();
    println!(
        "{} running in DRY-RUN mode. To enable repository writing operations pass --{}=false",
        style("⚠").yellow(),
        flag
    );
    display_separator();
}

/// Format a titled list of refs, one `name@sha` per line.
pub fn format_ref_list(title: &str, repo: &str, refs: &[Ref]) -> String {
    let mut out = format!("{} for repository {:?} ({}):", title, repo, refs.len());
    for reference in refs {
        out.push_str(&format!("\n  - {}", reference));
    }
    out
}

/// Display a titled list of refs for a repository.
///
/// # Arguments
/// * `title` - What the refs are, e.g. "new tags"
/// * `repo` - The `owner/name` of the repository
/// * `refs` - The refs to list
pub fn display_ref_list(title: &str, repo: &str, refs: &[Ref]) {
    println!("{}", style(format_ref_list(title, repo, refs)).bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ref_list() {
        let refs = vec![Ref::tag("v1.17.0", "abc"), Ref::branch("release-1.17", "def")];
        let out = format_ref_list("new refs", "org/repo", &refs);
        assert_eq!(
            out,
            "new refs for repository \"org/repo\" (2):\n  - refs/tags/v1.17.0@abc\n  - refs/heads/release-1.17@def"
        );
    }

    #[test]
    fn test_format_empty_ref_list() {
        assert_eq!(
            format_ref_list("new tags", "org/repo", &[]),
            "new tags for repository \"org/repo\" (0):"
        );
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }
}
