//! Resource store trait definition

use crate::error::Result;
use async_trait::async_trait;
use helmfleet_core::{
    DeploymentRecord, DeploymentStatus, ResourceKey, RolloutRecord, RolloutStatus,
};

/// External resource store abstraction
///
/// Get/list/update of the two record kinds plus the values config
/// objects they reference. Status updates go through their own methods
/// so a status write never clobbers a concurrent spec change.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get_deployment(&self, key: &ResourceKey) -> Result<DeploymentRecord>;

    /// All deployments in a namespace, in no particular order
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentRecord>>;

    /// Persist a spec change (the rollout propagator's only write)
    async fn update_deployment(&self, record: &DeploymentRecord) -> Result<()>;

    /// Persist the status subresource only
    async fn update_deployment_status(
        &self,
        key: &ResourceKey,
        status: &DeploymentStatus,
    ) -> Result<()>;

    async fn get_rollout(&self, key: &ResourceKey) -> Result<RolloutRecord>;

    async fn update_rollout_status(&self, key: &ResourceKey, status: &RolloutStatus)
        -> Result<()>;

    /// Fetch one entry of a values config object by (namespace, name, key)
    async fn get_config_value(&self, namespace: &str, name: &str, key: &str) -> Result<String>;
}
