//! Connectivity error types

use thiserror::Error;

/// Preflight check errors
#[derive(Error, Debug)]
pub enum ConnectivityError {
    #[error("Failed to connect to {service} ({address}): {reason}")]
    Unreachable {
        service: String,
        address: String,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConnectivityError>;
