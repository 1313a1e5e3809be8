//! Rollout propagator
//!
//! One pass is a complete, idempotent sweep: select deployments by tag
//! and category, retarget the ones not already at the rollout's version,
//! then mark the rollout completed. Per-deployment persist failures are
//! logged and the sweep continues; only the final status write can fail
//! the pass.

use crate::deployment::Outcome;
use crate::error::Result;
use helmfleet_core::{selector, DeploymentRecord, ResourceKey, RolloutPhase, RolloutStatus};
use helmfleet_store::ResourceStore;
use std::sync::Arc;

/// Propagates a fleet-wide version change to matching deployments
pub struct RolloutReconciler {
    store: Arc<dyn ResourceStore>,
}

impl RolloutReconciler {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub async fn reconcile(&self, key: &ResourceKey) -> Result<Outcome> {
        let rollout = match self.store.get_rollout(key).await {
            Ok(rollout) => rollout,
            Err(e) if e.is_not_found() => {
                tracing::debug!(%key, "rollout no longer exists, nothing to do");
                return Ok(Outcome::done());
            }
            Err(e) => return Err(e.into()),
        };
        let spec = &rollout.spec;

        let candidates = self.candidates(&rollout).await?;
        for mut deployment in candidates {
            let dkey = deployment.key();
            if !selector::matches(&deployment.spec, &spec.tags, &spec.category) {
                tracing::debug!(
                    deployment = %dkey,
                    "skipping deployment: tags or category do not match"
                );
                continue;
            }

            if deployment.spec.target_version == spec.target_version {
                // Idempotent no-op; nothing to persist
                tracing::info!(
                    deployment = %dkey,
                    version = %spec.target_version,
                    "deployment already at target version"
                );
                continue;
            }

            tracing::info!(
                deployment = %dkey,
                from = %deployment.spec.target_version,
                to = %spec.target_version,
                "retargeting deployment"
            );
            deployment.spec.target_version = spec.target_version.clone();
            // Best-effort sweep: one failed update must not starve the rest
            if let Err(e) = self.store.update_deployment(&deployment).await {
                tracing::error!(deployment = %dkey, error = %e, "failed to update deployment");
            }
        }

        let status = RolloutStatus {
            phase: Some(RolloutPhase::Completed),
        };
        self.store.update_rollout_status(key, &status).await?;

        Ok(Outcome::done())
    }

    /// Named deployments when the rollout lists them, the whole target
    /// namespace otherwise. A named deployment that cannot be fetched is
    /// logged and skipped.
    async fn candidates(
        &self,
        rollout: &helmfleet_core::RolloutRecord,
    ) -> Result<Vec<DeploymentRecord>> {
        let spec = &rollout.spec;
        if spec.environments.is_empty() {
            return Ok(self.store.list_deployments(&spec.namespace).await?);
        }

        let mut out = Vec::with_capacity(spec.environments.len());
        for name in &spec.environments {
            let dkey = ResourceKey::new(&spec.namespace, name);
            match self.store.get_deployment(&dkey).await {
                Ok(deployment) => out.push(deployment),
                Err(e) => {
                    tracing::warn!(deployment = %dkey, error = %e, "skipping rollout candidate");
                }
            }
        }
        Ok(out)
    }
}
