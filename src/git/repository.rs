use crate::error::Result;
use git2::Repository as Git2Repo;
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    fn init_repo_with_tags(tags: &[&str]) -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        let oid = {
            let sig = git2::Signature::now("Test", "test@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap()
        };
        {
            let object = repo.find_object(oid, None).unwrap();
            for tag in tags {
                repo.tag_lightweight(tag, &object, false).unwrap();
            }
        }
        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_list_tags() {
        let (_dir, repo) = init_repo_with_tags(&["v1.17.0", "v1.16.2", "not-a-version"]);
        let tags = repo.list_tags().unwrap();
        assert_eq!(tags, vec!["not-a-version", "v1.16.2", "v1.17.0"]);
    }

    #[test]
    fn test_list_tags_empty_repository() {
        let (_dir, repo) = init_repo_with_tags(&[]);
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_open_discovers_from_subdirectory() {
        let (dir, _repo) = init_repo_with_tags(&[]);
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        assert!(Git2Repository::open(&nested).is_ok());
    }
}
