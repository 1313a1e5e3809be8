//! Deployment reconcile state machine
//!
//! One pass per trigger, steps strictly in order: fetch record, fetch
//! values config, repository sync, secrets precondition, connectivity
//! gate, release apply, status write, requeue. A deleted record ends the
//! pass silently. Every failure path writes a status before the pass
//! ends; only the success path yields a positive requeue from the
//! record's own sync interval.

use crate::error::Result;
use chrono::Utc;
use helmfleet_connectivity::ConnectivityCheck;
use helmfleet_core::{DeploymentRecord, ResourceKey, ServiceValues, SyncStatus};
use helmfleet_gitops::RepoSync;
use helmfleet_release::{ReleaseApplier, ReleaseLayout, ReleaseRequest};
use helmfleet_store::ResourceStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fallback requeue delay when a record's sync interval is unparsable
pub const DEFAULT_REQUEUE: Duration = Duration::from_secs(600);

/// Reconciler-wide settings
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Local working copy of the config repository
    pub repo_dir: PathBuf,

    /// Kube context override for out-of-cluster runs; None in-cluster
    pub kube_context: Option<String>,

    /// Delay before retrying after a recoverable precondition failure
    pub default_requeue: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("/tmp/helmfleet/repo"),
            kube_context: None,
            default_requeue: DEFAULT_REQUEUE,
        }
    }
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// When the next pass should run; None means no internal reschedule
    pub requeue_after: Option<Duration>,
}

impl Outcome {
    pub fn done() -> Self {
        Self {
            requeue_after: None,
        }
    }

    pub fn requeue(after: Duration) -> Self {
        Self {
            requeue_after: Some(after),
        }
    }
}

/// Drives one deployment record toward its desired state
pub struct DeploymentReconciler {
    store: Arc<dyn ResourceStore>,
    repo_sync: Arc<dyn RepoSync>,
    connectivity: Arc<dyn ConnectivityCheck>,
    applier: Arc<dyn ReleaseApplier>,
    config: ReconcilerConfig,
}

impl DeploymentReconciler {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        repo_sync: Arc<dyn RepoSync>,
        connectivity: Arc<dyn ConnectivityCheck>,
        applier: Arc<dyn ReleaseApplier>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            repo_sync,
            connectivity,
            applier,
            config,
        }
    }

    /// One reconciliation pass for `key`. Errors are surfaced to the
    /// trigger layer, which owns retry timing for them.
    pub async fn reconcile(&self, key: &ResourceKey) -> Result<Outcome> {
        let mut record = match self.store.get_deployment(key).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                // Deletion is terminal, not a failure
                tracing::debug!(%key, "deployment no longer exists, nothing to do");
                return Ok(Outcome::done());
            }
            Err(e) => return Err(e.into()),
        };
        let spec = record.spec.clone();

        let raw_values = match self
            .store
            .get_config_value(&key.namespace, &spec.values_from.name, &spec.values_from.key)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(%key, error = %e, "unable to fetch values ConfigMap");
                self.set_status(&mut record, SyncStatus::ConfigFetchFailed)
                    .await;
                return Err(e.into());
            }
        };
        let values = ServiceValues::parse(&raw_values)?;

        self.repo_sync
            .sync(&spec.repo_url, &self.config.repo_dir)
            .await?;

        let layout = ReleaseLayout::new(&self.config.repo_dir);
        let decrypted_secrets = layout.decrypted_secrets_file(&spec.project, &spec.environment);
        if !decrypted_secrets.exists() {
            // Configuration gap; retrying cannot fix it
            tracing::error!(
                %key,
                file = %decrypted_secrets.display(),
                "encrypted secrets file missing"
            );
            self.set_status(&mut record, SyncStatus::SecretsMissing)
                .await;
            return Ok(Outcome::done());
        }

        if let Err(e) = self.connectivity.check(&values).await {
            tracing::warn!(%key, error = %e, "connectivity check failed");
            self.set_status(&mut record, SyncStatus::Failed).await;
            return Ok(Outcome::requeue(self.config.default_requeue));
        }

        let request = ReleaseRequest {
            release_name: record.release_name(),
            chart: spec.chart.clone(),
            chart_version: spec.chart_version.clone(),
            helmfile_path: layout.helmfile(spec.helmfile_type.as_deref()),
            values_paths: vec![decrypted_secrets],
            kube_context: self.config.kube_context.clone(),
        };
        if let Err(e) = self.applier.apply(&request).await {
            tracing::error!(%key, error = %e, "release apply failed");
            self.set_status(&mut record, SyncStatus::HelmfileSyncFailed)
                .await;
            return Err(e.into());
        }

        // Success: advance versions and persist. A persist failure
        // surfaces; the next trigger re-runs the idempotent apply.
        let mut status = record.status.clone();
        if status.current_version.as_deref() != Some(spec.target_version.as_str()) {
            status.previous_version = status.current_version.take();
        }
        status.current_version = Some(spec.target_version.clone());
        status.sync_status = Some(SyncStatus::Synced);
        status.last_applied_config = Some(spec.values_from.name.clone());
        status.last_synced_at = Some(Utc::now());
        status.rollback_in_progress = false;
        self.store.update_deployment_status(key, &status).await?;

        tracing::info!(%key, version = %spec.target_version, "deployment synced");
        Ok(Outcome::requeue(parse_sync_interval(&spec.sync_interval)))
    }

    /// Best-effort status write; the pass outcome is decided by the
    /// caller, not by whether this write landed.
    async fn set_status(&self, record: &mut DeploymentRecord, status: SyncStatus) {
        record.status.sync_status = Some(status);
        if let Err(e) = self
            .store
            .update_deployment_status(&record.key(), &record.status)
            .await
        {
            tracing::warn!(
                key = %record.key(),
                error = %e,
                "failed to persist status \"{status}\""
            );
        }
    }
}

/// Parse a record's sync interval; unparsable values fall back to ten
/// minutes.
pub fn parse_sync_interval(raw: &str) -> Duration {
    humantime::parse_duration(raw).unwrap_or(DEFAULT_REQUEUE)
}
