pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod github;
pub mod ui;
pub mod validation;

pub use error::{RepoToolsError, Result};
