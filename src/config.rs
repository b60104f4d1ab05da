use crate::domain::branch::{DEFAULT_BRANCH_PREFIX, DEFAULT_TRUNK_BRANCH};
use crate::domain::BranchNaming;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const LOCAL_CONFIG_FILE: &str = "./k8s-repo-tools.toml";
const USER_CONFIG_FILE: &str = ".k8s-repo-tools.toml";

/// Represents the complete configuration for k8s-repo-tools.
///
/// Contains branch naming, GitHub API settings and default behavior flags.
/// Every value can be overridden from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_prefix() -> String {
    DEFAULT_BRANCH_PREFIX.to_string()
}

fn default_trunk() -> String {
    DEFAULT_TRUNK_BRANCH.to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upload_url() -> String {
    "https://uploads.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_true() -> bool {
    true
}

/// Branch naming convention: `<prefix>MAJOR.MINOR` release branches and a trunk branch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_trunk")]
    pub default: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            prefix: default_prefix(),
            default: default_trunk(),
        }
    }
}

impl BranchesConfig {
    pub fn naming(&self) -> BranchNaming {
        BranchNaming::new(self.prefix.clone(), self.default.clone())
    }
}

/// GitHub API endpoints and the per-request timeout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GitHubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default behavior when the matching flags are not given.
///
/// Dry-run is on unless explicitly disabled, so that writes are always opt-in.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub dry_run: bool,

    #[serde(default)]
    pub force: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            dry_run: true,
            force: false,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `k8s-repo-tools.toml` in current directory
/// 3. `.k8s-repo-tools.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
