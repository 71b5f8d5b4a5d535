//! Configuration for branch-sweep
//!
//! Loads user configuration from `~/.config/branch-sweep/config.toml`.
//! Holds default repository coordinates and the API base URL so CI jobs
//! only have to pass branch names.

use serde::Deserialize;
use std::path::PathBuf;

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Configuration structure
///
/// Example config.toml:
/// ```toml
/// owner = "octo"
/// repo = "widgets"
///
/// # GitHub Enterprise installs serve the API under /api/v3
/// # api_url = "https://ghe.example.com/api/v3"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Default repository owner (user or organization)
    #[serde(default)]
    pub owner: Option<String>,

    /// Default repository name
    #[serde(default)]
    pub repo: Option<String>,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Get the config file path: ~/.config/branch-sweep/config.toml
    ///
    /// Uses XDG-style path (~/.config/) on all platforms for consistency
    /// with other CLI tools.
    ///
    /// If BRANCH_SWEEP_CONFIG environment variable is set, uses that path
    /// instead.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BRANCH_SWEEP_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|d| d.join(".config").join("branch-sweep").join("config.toml"))
    }

    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "branch-sweep: warning: config parse error ({}): {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!(
                    "branch-sweep: warning: cannot read config ({}): {}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
