//! branch-sweep: Branch protection filter for stale-branch cleanup
//!
//! This library checks candidate branches against GitHub's branch
//! protection APIs (legacy protection and repository rules) and keeps
//! only the branches that are safe to delete.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod init;
pub mod protection_checker;
