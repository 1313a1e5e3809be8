//! Reconciler error types

use thiserror::Error;

/// Errors surfaced from a reconciliation pass. The trigger layer owns
/// retry timing for these; recoverable preconditions (connectivity) are
/// absorbed into a requeue instead and never reach this type.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Store error: {0}")]
    Store(#[from] helmfleet_store::StoreError),

    #[error("Invalid record data: {0}")]
    Core(#[from] helmfleet_core::CoreError),

    #[error("Repository sync failed: {0}")]
    GitOps(#[from] helmfleet_gitops::GitOpsError),

    #[error("Release apply failed: {0}")]
    Release(#[from] helmfleet_release::ReleaseError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
