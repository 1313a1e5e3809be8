//! HelmFleet reconciliation engine
//!
//! Two reconcilers drive the fleet toward its desired state. The
//! deployment reconciler runs one pass per trigger: fetch the record and
//! its values config, sync the config repository, gate on dependent
//! service connectivity, apply the release, persist status, and schedule
//! the next pass. The rollout propagator sweeps a namespace and retargets
//! every deployment matching a rollout's tag/category filters.
//!
//! All external systems sit behind traits (`ResourceStore`, `RepoSync`,
//! `ConnectivityCheck`, `ReleaseApplier`), so the state machines here are
//! testable with fakes. Reconciliations for different keys may run
//! concurrently; the dispatch layer serializes passes per key.

pub mod deployment;
pub mod error;
pub mod rollout;

// Re-exports
pub use deployment::{
    parse_sync_interval, DeploymentReconciler, Outcome, ReconcilerConfig, DEFAULT_REQUEUE,
};
pub use error::{ReconcileError, Result};
pub use rollout::RolloutReconciler;
