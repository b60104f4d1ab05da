use crate::error::{RepoToolsError, Result};
use crate::git::Repository;
use std::collections::BTreeSet;

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    tags: BTreeSet<String>,
    broken: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.insert(name.into());
    }

    /// Make tag listing fail as an unreadable repository would
    pub fn set_broken(&mut self) {
        self.broken = true;
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        if self.broken {
            return Err(RepoToolsError::Git(git2::Error::from_str(
                "could not read the tag list",
            )));
        }
        Ok(self.tags.iter().cloned().collect())
    }
}
