use thiserror::Error;

/// Unified error type for k8s-repo-tools operations
#[derive(Error, Debug)]
pub enum RepoToolsError {
    #[error("cannot parse reference {reference:?}: {reason}")]
    Parse { reference: String, reason: String },

    #[error("cannot parse go.mod line {line}: {reason}")]
    GoMod { line: usize, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in k8s-repo-tools
pub type Result<T> = std::result::Result<T, RepoToolsError>;

impl RepoToolsError {
    /// Create a parse error for a reference string
    pub fn parse(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        RepoToolsError::Parse {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a go.mod parse error for a 1-based line number
    pub fn gomod(line: usize, reason: impl Into<String>) -> Self {
        RepoToolsError::GoMod {
            line,
            reason: reason.into(),
        }
    }

    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        RepoToolsError::NotFound(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        RepoToolsError::Config(msg.into())
    }

    /// Create a validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        RepoToolsError::Validation(msg.into())
    }

    /// Create a GitHub API error with context
    pub fn github(msg: impl Into<String>) -> Self {
        RepoToolsError::GitHub(msg.into())
    }

    /// Create an external command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        RepoToolsError::Command(msg.into())
    }

    /// True for errors that reflect a legitimately absent ref or resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoToolsError::NotFound(_))
    }
}
