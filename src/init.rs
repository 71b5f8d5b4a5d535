//! Configuration initialization for branch-sweep
//!
//! Generates a default config file at ~/.config/branch-sweep/config.toml

use crate::config::Config;
use std::fs;

/// Default config template
const CONFIG_TEMPLATE: &str = r#"# branch-sweep configuration
# Location: ~/.config/branch-sweep/config.toml
#
# Default repository coordinates, so CI jobs only pass branch names.
# CLI flags (--owner, --repo, --api-url) override these values.

# owner = "your-org"
# repo = "your-repo"

# GitHub Enterprise installs serve the API under /api/v3
# api_url = "https://ghe.example.com/api/v3"
"#;

/// Run the init subcommand
pub fn run_init() -> Result<(), String> {
    let config_path =
        Config::config_path().ok_or_else(|| "Cannot determine config directory".to_string())?;

    let config_dir = config_path
        .parent()
        .ok_or_else(|| "Cannot determine config directory".to_string())?;

    // Create config directory if needed
    if !config_dir.exists() {
        fs::create_dir_all(config_dir)
            .map_err(|e| format!("Cannot create directory {}: {}", config_dir.display(), e))?;
    }

    // Check if config already exists
    if config_path.exists() {
        eprintln!("Config file already exists: {}", config_path.display());
        eprintln!("To regenerate, delete the file first and run `branch-sweep init` again.");
        return Ok(());
    }

    // Write template
    fs::write(&config_path, CONFIG_TEMPLATE)
        .map_err(|e| format!("Cannot write config file: {}", e))?;

    println!("Created config file: {}", config_path.display());
    println!();
    println!("Edit the file to set your repository owner and name.");

    Ok(())
}

/// Get the config path for display purposes
pub fn config_path_display() -> String {
    Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/branch-sweep/config.toml".to_string())
}
