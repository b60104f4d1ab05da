//! Local Git repository access
//!
//! `latest-version` can read tag names from a local clone instead of stdin.
//! The [Repository] trait keeps that source swappable:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a mock implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-only tag access on a local repository
pub trait Repository {
    /// Get all tag names in the repository, sorted alphabetically
    fn list_tags(&self) -> Result<Vec<String>>;
}
