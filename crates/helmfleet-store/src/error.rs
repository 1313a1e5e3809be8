//! Store error types

use thiserror::Error;

/// Errors surfaced by the resource store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    #[error("Config object {name} in {namespace} has no key {key}")]
    ConfigKeyMissing {
        namespace: String,
        name: String,
        key: String,
    },

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Failed to decode {kind}: {source}")]
    Decode {
        kind: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Record deletion is terminal for a pass, not a failure; callers
    /// branch on this.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
