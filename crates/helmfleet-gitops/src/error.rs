//! GitOps error types

use std::path::PathBuf;
use thiserror::Error;

/// Repository sync errors
#[derive(Error, Debug)]
pub enum GitOpsError {
    #[error("git executable not found")]
    GitNotFound,

    #[error("Failed to clone {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("Failed to pull into {path}: {stderr}")]
    PullFailed { path: PathBuf, stderr: String },

    /// The path is occupied by something that is not a working copy.
    /// Not retryable; requires operator cleanup.
    #[error("{0} exists but is not a git working copy")]
    NotARepository(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitOpsError>;
