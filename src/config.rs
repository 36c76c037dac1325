//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::Result;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository that pull requests are sent to
    #[serde(default)]
    pub target: TargetConfig,

    /// Where the GitHub token is stored (defaults to ~/.liferaft/liferaft.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    /// How many times to re-prompt for a two-factor code
    #[serde(default = "default_two_factor_retries")]
    pub two_factor_retries: u32,
}

/// Upstream repository owner and name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_target_owner")]
    pub owner: String,

    #[serde(default = "default_target_repository")]
    pub repository: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_target_owner() -> String {
    "laravel".to_string()
}

fn default_target_repository() -> String {
    "laravel".to_string()
}

fn default_two_factor_retries() -> u32 {
    1
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            owner: default_target_owner(),
            repository: default_target_repository(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            target: TargetConfig::default(),
            token_path: None,
            two_factor_retries: default_two_factor_retries(),
        }
    }
}

impl Config {
    /// Resolved location of the token file
    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| config_dir().join("liferaft.json"))
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".liferaft")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default location
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

/// Load configuration from a file, falling back to defaults when it is absent
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
