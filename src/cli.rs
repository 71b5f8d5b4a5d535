//! CLI argument parser for branch-sweep
//!
//! Provides type-safe argument parsing using clap derive.

use clap::{Parser, Subcommand};

use crate::error::SweepError;
use crate::github::Branch;

/// CLI arguments for branch-sweep
#[derive(Parser, Debug)]
#[command(
    name = "branch-sweep",
    version,
    about = "Branch protection filter for stale-branch cleanup",
    long_about = "A CLI tool that filters a list of candidate branches against GitHub's\n\
                  branch protection APIs (legacy protection and repository rules),\n\
                  printing only the branches that are safe to delete.",
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    /// Subcommand (e.g., init)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Candidate branches, as 'name' or 'name@sha'
    #[arg(required = true, value_name = "BRANCH")]
    pub branches: Vec<String>,

    /// Repository owner (user or organization)
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// API base URL (e.g. a GitHub Enterprise endpoint)
    #[arg(long)]
    pub api_url: Option<String>,

    /// API token (falls back to GITHUB_TOKEN / GH_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Print surviving branches as JSON instead of one name per line
    #[arg(long)]
    pub json: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file (~/.config/branch-sweep/config.toml)
    Init,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse the positional branch specs into `Branch` values
    pub fn parse_branches(&self) -> Result<Vec<Branch>, SweepError> {
        self.branches.iter().map(|s| parse_branch(s)).collect()
    }
}

/// Parse a single branch spec: `name` or `name@sha`
pub fn parse_branch(spec: &str) -> Result<Branch, SweepError> {
    let invalid = || SweepError::InvalidBranchSpec {
        spec: spec.to_string(),
    };

    match spec.split_once('@') {
        None => {
            if spec.is_empty() {
                Err(invalid())
            } else {
                Ok(Branch::new(spec))
            }
        }
        Some((name, sha)) => {
            if name.is_empty() || sha.is_empty() || sha.contains('@') {
                Err(invalid())
            } else {
                Ok(Branch::with_sha(name, sha))
            }
        }
    }
}
