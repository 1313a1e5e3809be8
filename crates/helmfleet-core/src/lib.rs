//! HelmFleet core types
//!
//! Record types for the two resources the platform reconciles
//! (application deployments and fleet-wide rollouts), the status wire
//! contract, the tag/category selection rules used by rollouts, and the
//! typed projection of the platform values blob.

pub mod error;
pub mod record;
pub mod selector;
pub mod values;

// Re-exports
pub use error::{CoreError, Result};
pub use record::{
    ConfigRef, DeploymentRecord, DeploymentSpec, DeploymentStatus, ResourceKey, RolloutPhase,
    RolloutRecord, RolloutSpec, RolloutStatus, SyncStatus,
};
pub use values::{ProbeKind, ServiceEndpoint, ServiceValues};
