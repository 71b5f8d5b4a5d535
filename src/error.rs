//! Error types for branch-sweep
//!
//! Defines SweepError and related types for handling all error states.

use std::fmt;

/// branch-sweep error type
#[derive(Debug)]
pub enum SweepError {
    // Usage/configuration errors (Exit 2)
    /// Repository coordinates missing (no --owner/--repo and no config)
    MissingRepo,
    /// Branch spec could not be parsed (`name` or `name@sha`)
    InvalidBranchSpec { spec: String },
    /// API base URL could not be parsed
    InvalidApiUrl { url: String },

    // Runtime errors (Exit 1)
    /// HTTP transport failure
    HttpError(reqwest::Error),
    /// API responded with an unexpected status code
    UnexpectedStatus { status: u16, url: String },
    /// I/O error
    IoError(std::io::Error),
}

impl SweepError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            // Blocked before any API work was attempted
            Self::MissingRepo | Self::InvalidBranchSpec { .. } | Self::InvalidApiUrl { .. } => 2,
            // Runtime failures
            Self::HttpError(_) | Self::UnexpectedStatus { .. } | Self::IoError(_) => 1,
        }
    }

    /// Error message for humans and CI logs
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingRepo => {
                "repository not specified: pass --owner/--repo or set them in the config file"
                    .to_string()
            }
            Self::InvalidBranchSpec { spec } => {
                format!(
                    "invalid branch spec '{}': expected 'name' or 'name@sha'",
                    spec
                )
            }
            Self::InvalidApiUrl { url } => {
                format!("invalid API base URL: {}", url)
            }
            Self::HttpError(e) => format!("HTTP error: {}", e),
            Self::UnexpectedStatus { status, url } => {
                format!("unexpected status {} from {}", status, url)
            }
            Self::IoError(e) => format!("I/O error: {}", e),
        }
    }
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpError(e) => Some(e),
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SweepError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err)
    }
}

impl From<std::io::Error> for SweepError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}
