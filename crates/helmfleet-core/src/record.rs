//! Record types for deployments and rollouts
//!
//! A `DeploymentRecord` describes one application instance (a chart
//! release in a project/environment pair) and carries the desired spec
//! plus the reconciler-owned status. A `RolloutRecord` is a fleet-wide
//! intent to retarget matching deployments to a new version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a record within the resource store (unique per cluster).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Reference to one entry of a values config object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRef {
    /// Name of the config object
    pub name: String,

    /// Key within the config object holding the values blob
    pub key: String,
}

/// One application instance under reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub namespace: String,
    pub name: String,
    pub spec: DeploymentSpec,
    #[serde(default)]
    pub status: DeploymentStatus,
}

impl DeploymentRecord {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.namespace, &self.name)
    }

    /// Deterministic release name, so repeated applies target the same
    /// release.
    pub fn release_name(&self) -> String {
        format!("{}-{}", self.spec.project, self.spec.environment)
    }
}

/// Desired state of a deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentSpec {
    /// Application version the deployment should run
    pub target_version: String,

    /// Chart reference (OCI or repository URL)
    pub chart: String,

    /// Chart version to apply
    pub chart_version: String,

    /// Where the service values blob lives
    pub values_from: ConfigRef,

    /// Names of secrets referenced by the release
    pub secret_refs: Vec<String>,

    pub project: String,
    pub environment: String,

    /// Config repository synced before each apply
    pub repo_url: String,

    /// Requeue interval between periodic reconciles ("10m", "1h", ...)
    pub sync_interval: String,

    /// Helmfile flavor directory; "gke" when unset
    pub helmfile_type: Option<String>,

    /// Free-form labels used by rollout selection
    pub tags: Vec<String>,

    /// Single grouping label; empty means unconstrained
    pub category: String,
}

/// Observed state, mutated only by the reconciler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentStatus {
    pub sync_status: Option<SyncStatus>,

    /// Version last applied successfully; never advanced by a failed pass
    pub current_version: Option<String>,

    /// Version that was current before the last successful apply
    pub previous_version: Option<String>,

    /// Name of the config object in effect at the last apply
    pub last_applied_config: Option<String>,

    pub last_synced_at: Option<DateTime<Utc>>,

    pub rollback_in_progress: bool,
}

/// Status values written to the record, readable via the store.
/// The strings are the wire contract and are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    Synced,
    Failed,
    #[serde(rename = "Failed to fetch ConfigMap")]
    ConfigFetchFailed,
    #[serde(rename = "Encrypted secrets file missing")]
    SecretsMissing,
    #[serde(rename = "Helmfile sync failed")]
    HelmfileSyncFailed,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "Synced"),
            SyncStatus::Failed => write!(f, "Failed"),
            SyncStatus::ConfigFetchFailed => write!(f, "Failed to fetch ConfigMap"),
            SyncStatus::SecretsMissing => write!(f, "Encrypted secrets file missing"),
            SyncStatus::HelmfileSyncFailed => write!(f, "Helmfile sync failed"),
        }
    }
}

/// Fleet-wide intent to move matching deployments to a new version
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloutRecord {
    pub namespace: String,
    pub name: String,
    pub spec: RolloutSpec,
    #[serde(default)]
    pub status: RolloutStatus,
}

impl RolloutRecord {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.namespace, &self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolloutSpec {
    /// Namespace holding the candidate deployments
    pub namespace: String,

    /// Deployment names to consider; empty means the whole namespace
    pub environments: Vec<String>,

    /// Required tags; a deployment matches when this is a subset of its
    /// tag set. Empty means wildcard.
    pub tags: Vec<String>,

    /// Required category, exact match; empty means wildcard
    pub category: String,

    /// Version matching deployments are retargeted to
    pub target_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolloutStatus {
    pub phase: Option<RolloutPhase>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloutPhase {
    Completed,
}

impl fmt::Display for RolloutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RolloutPhase::Completed => write!(f, "Completed"),
        }
    }
}
