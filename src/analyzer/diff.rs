use crate::boundary::BoundaryWarning;
use crate::domain::{parse_branch_version, parse_tag_version, same_major_minor, BranchNaming, Ref};
use std::collections::HashSet;

/// Refs of `src` whose name does not appear in `dest`, in `src` order.
/// SHAs are ignored.
pub fn find_new_refs(src: &[Ref], dest: &[Ref]) -> Vec<Ref> {
    let existing: HashSet<&str> = dest.iter().map(|r| r.name.as_str()).collect();
    src.iter()
        .filter(|r| !existing.contains(r.name.as_str()))
        .cloned()
        .collect()
}

/// SHA to create a new tag at: the HEAD of the release branch with the same
/// MAJOR.MINOR as the tag, or `trunk_sha` when no such branch exists.
///
/// The trunk branch and branches that do not parse are skipped; the first
/// matching branch in input order wins.
pub fn find_branch_sha_for_tag(
    tag: &Ref,
    branches: &[Ref],
    naming: &BranchNaming,
    trunk_sha: &str,
) -> String {
    let tag_version = match parse_tag_version(&tag.name) {
        Ok(version) => version,
        Err(e) => {
            BoundaryWarning::unparsable(&e, &tag.name).emit();
            return trunk_sha.to_string();
        }
    };
    log::info!("finding branch for tag {:?}", tag.short_name());

    for branch in branches {
        if naming.is_trunk(&branch.name) {
            continue;
        }
        let branch_version = match parse_branch_version(&branch.name, &naming.prefix) {
            Ok(version) => version,
            Err(e) => {
                BoundaryWarning::unparsable(&e, &branch.name).emit();
                continue;
            }
        };
        if same_major_minor(&tag_version, &branch_version) {
            log::info!(
                "found matching destination branch {:?} for tag {:?} with HEAD {:?}",
                branch.name,
                tag.name,
                branch.sha
            );
            return branch.sha.clone();
        }
    }

    BoundaryWarning::NoMatchingBranch {
        tag: tag.name.clone(),
        trunk: naming.trunk.clone(),
    }
    .emit();
    trunk_sha.to_string()
}
