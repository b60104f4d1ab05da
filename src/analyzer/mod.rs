//! Release rule engine - pure selection logic over tag and branch refs
//!
//! Every function here is deterministic and free of I/O apart from warnings
//! emitted through the log facade when a ref has to be skipped.

pub mod diff;
pub mod filter;
pub mod latest;
pub mod release_notes;
pub mod window;

pub use diff::{find_branch_sha_for_tag, find_new_refs};
pub use filter::{trim_branches, trim_tags};
pub use latest::{find_latest_branch, find_latest_tag, find_latest_tag_name};
pub use release_notes::resolve_range_start;
pub use window::{in_fast_forward_window, FastForwardWindow};

use crate::boundary::BoundaryWarning;
use crate::domain::{parse_tag_version, Ref};
use semver::Version;

/// Tags that parse as semantic versions, paired with their version.
/// Unparsable tags are skipped with a warning.
pub(crate) fn parsed_tags<'a>(tags: &'a [Ref]) -> impl Iterator<Item = (&'a Ref, Version)> + 'a {
    tags.iter().filter_map(|tag| match parse_tag_version(&tag.name) {
        Ok(version) => Some((tag, version)),
        Err(e) => {
            BoundaryWarning::unparsable(&e, &tag.name).emit();
            None
        }
    })
}
