//! Release error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from release application
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A referenced values file is absent. Not retryable; nothing is
    /// applied partially.
    #[error("Values file missing: {0}")]
    MissingValuesFile(PathBuf),

    /// Credential refresh failed. Retryable at the reconciliation level.
    #[error("Registry login failed: {0}")]
    RegistryLoginFailed(String),

    #[error("helmfile sync failed: {0}")]
    SyncFailed(String),

    #[error("helm secrets {op} failed: {message}")]
    SecretsFailed { op: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
