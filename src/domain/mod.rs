//! Domain values - refs, repositories, branch naming, version parsing and go.mod files

pub mod branch;
pub mod gomod;
pub mod reference;
pub mod version;

pub use branch::{format_merge_commit_message, BranchNaming};
pub use gomod::{parse_gomod, GoModFile, Requirement};
pub use reference::{Ref, RepoSlug};
pub use version::{cmp_precedence, parse_branch_version, parse_tag_version, same_major_minor};
