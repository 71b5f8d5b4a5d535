//! branch-sweep: Branch protection filter for stale-branch cleanup
//!
//! Reads candidate branches, consults GitHub's branch protection APIs,
//! and prints only the branches that are safe to delete.

use std::process::ExitCode;

use branch_sweep::cli::{CliArgs, Commands};
use branch_sweep::config::Config;
use branch_sweep::error::SweepError;
use branch_sweep::github::{Branch, GithubClient};
use branch_sweep::init;
use branch_sweep::protection_checker::ProtectionChecker;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the filtered list
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("branch_sweep=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("branch-sweep: {}", e);
            e.exit_code().into()
        }
    }
}

/// Main execution logic
async fn run() -> Result<(), SweepError> {
    let args = CliArgs::parse_args();

    if let Some(Commands::Init) = args.command {
        return init::run_init().map_err(|msg| SweepError::IoError(std::io::Error::other(msg)));
    }

    let config = Config::load();

    let owner = args
        .owner
        .clone()
        .or(config.owner)
        .ok_or(SweepError::MissingRepo)?;
    let repo = args
        .repo
        .clone()
        .or(config.repo)
        .ok_or(SweepError::MissingRepo)?;
    let api_url = args.api_url.clone().unwrap_or(config.api_url);
    let token = resolve_token(&args);

    let mut branches = args.parse_branches()?;

    let client = GithubClient::new(&api_url, owner, repo, token)?;
    let checker = ProtectionChecker::new(&client);
    checker.retain_deletable(&mut branches).await;

    print_branches(&branches, args.json)
}

/// Token resolution order: --token flag, GITHUB_TOKEN, GH_TOKEN
fn resolve_token(args: &CliArgs) -> Option<String> {
    args.token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .or_else(|| std::env::var("GH_TOKEN").ok())
        .filter(|t| !t.is_empty())
}

/// Print the surviving (deletable) branches to stdout
fn print_branches(branches: &[Branch], json: bool) -> Result<(), SweepError> {
    if json {
        let rendered = serde_json::to_string_pretty(branches)
            .map_err(|e| SweepError::IoError(std::io::Error::other(e)))?;
        println!("{}", rendered);
    } else {
        for branch in branches {
            println!("{}", branch.name);
        }
    }
    Ok(())
}
