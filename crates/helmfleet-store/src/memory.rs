//! In-memory resource store
//!
//! Backs the integration tests and the standalone daemon. Write counts
//! are tracked so idempotence (no write when nothing changed) can be
//! asserted.

use crate::error::{Result, StoreError};
use crate::store::ResourceStore;
use async_trait::async_trait;
use helmfleet_core::{
    DeploymentRecord, DeploymentStatus, ResourceKey, RolloutRecord, RolloutStatus,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    deployments: HashMap<ResourceKey, DeploymentRecord>,
    rollouts: HashMap<ResourceKey, RolloutRecord>,
    /// (namespace, name) -> key -> value
    configs: HashMap<(String, String), HashMap<String, String>>,
}

/// In-process store keyed by (namespace, name)
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    deployment_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_deployment(&self, record: DeploymentRecord) {
        let mut inner = self.inner.write().await;
        inner.deployments.insert(record.key(), record);
    }

    pub async fn insert_rollout(&self, record: RolloutRecord) {
        let mut inner = self.inner.write().await;
        inner.rollouts.insert(record.key(), record);
    }

    pub async fn insert_config_value(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let mut inner = self.inner.write().await;
        inner
            .configs
            .entry((namespace.into(), name.into()))
            .or_default()
            .insert(key.into(), value.into());
    }

    pub async fn remove_deployment(&self, key: &ResourceKey) {
        let mut inner = self.inner.write().await;
        inner.deployments.remove(key);
    }

    /// Number of spec writes that reached the store
    pub fn deployment_write_count(&self) -> usize {
        self.deployment_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn get_deployment(&self, key: &ResourceKey) -> Result<DeploymentRecord> {
        let inner = self.inner.read().await;
        inner
            .deployments
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "FleetDeployment",
                key: key.to_string(),
            })
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<DeploymentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .deployments
            .values()
            .filter(|d| d.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn update_deployment(&self, record: &DeploymentRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        let key = record.key();
        if !inner.deployments.contains_key(&key) {
            return Err(StoreError::NotFound {
                kind: "FleetDeployment",
                key: key.to_string(),
            });
        }
        inner.deployments.insert(key, record.clone());
        self.deployment_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_deployment_status(
        &self,
        key: &ResourceKey,
        status: &DeploymentStatus,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .deployments
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound {
                kind: "FleetDeployment",
                key: key.to_string(),
            })?;
        record.status = status.clone();
        Ok(())
    }

    async fn get_rollout(&self, key: &ResourceKey) -> Result<RolloutRecord> {
        let inner = self.inner.read().await;
        inner
            .rollouts
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "FleetRollout",
                key: key.to_string(),
            })
    }

    async fn update_rollout_status(
        &self,
        key: &ResourceKey,
        status: &RolloutStatus,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .rollouts
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound {
                kind: "FleetRollout",
                key: key.to_string(),
            })?;
        record.status = status.clone();
        Ok(())
    }

    async fn get_config_value(&self, namespace: &str, name: &str, key: &str) -> Result<String> {
        let inner = self.inner.read().await;
        let entries = inner
            .configs
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                kind: "ConfigMap",
                key: format!("{}/{}", namespace, name),
            })?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::ConfigKeyMissing {
                namespace: namespace.to_string(),
                name: name.to_string(),
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmfleet_core::DeploymentSpec;

    fn deployment(name: &str, namespace: &str) -> DeploymentRecord {
        DeploymentRecord {
            namespace: namespace.to_string(),
            name: name.to_string(),
            spec: DeploymentSpec::default(),
            status: DeploymentStatus::default(),
        }
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let store = MemoryStore::new();
        store.insert_deployment(deployment("a", "fleet")).await;
        store.insert_deployment(deployment("b", "fleet")).await;
        store.insert_deployment(deployment("c", "other")).await;

        let key = ResourceKey::new("fleet", "a");
        assert_eq!(store.get_deployment(&key).await.unwrap().name, "a");
        assert_eq!(store.list_deployments("fleet").await.unwrap().len(), 2);
        assert_eq!(store.list_deployments("empty").await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_missing_deployment_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .get_deployment(&ResourceKey::new("fleet", "ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_status_update_keeps_spec() {
        let store = MemoryStore::new();
        let mut record = deployment("a", "fleet");
        record.spec.target_version = "1.0.0".to_string();
        store.insert_deployment(record).await;

        let key = ResourceKey::new("fleet", "a");
        let status = DeploymentStatus {
            current_version: Some("1.0.0".to_string()),
            ..Default::default()
        };
        store.update_deployment_status(&key, &status).await.unwrap();

        let fetched = store.get_deployment(&key).await.unwrap();
        assert_eq!(fetched.spec.target_version, "1.0.0");
        assert_eq!(fetched.status.current_version.as_deref(), Some("1.0.0"));
        // Status writes do not count as spec writes
        assert_eq!(store.deployment_write_count(), 0);
    }

    #[tokio::test]
    async fn test_config_value_lookup() {
        let store = MemoryStore::new();
        store
            .insert_config_value("fleet", "platform-values", "values.yaml", "vault: {}")
            .await;

        let value = store
            .get_config_value("fleet", "platform-values", "values.yaml")
            .await
            .unwrap();
        assert_eq!(value, "vault: {}");

        let err = store
            .get_config_value("fleet", "platform-values", "missing.yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConfigKeyMissing { .. }));
    }
}
