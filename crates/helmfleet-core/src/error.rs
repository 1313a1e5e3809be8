//! Core error types

use thiserror::Error;

/// Errors from the core record and values types
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse service values: {0}")]
    InvalidValues(#[from] serde_yaml::Error),

    #[error("Invalid resource key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
