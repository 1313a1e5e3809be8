//! Kind registry
//!
//! Maps the `kind` field of a manifest document to a decoder for the
//! corresponding record type. Built once during process initialization;
//! nothing mutates it afterwards.

use crate::error::{Result, StoreError};
use helmfleet_core::{DeploymentRecord, RolloutRecord};
use std::collections::HashMap;

pub const DEPLOYMENT_KIND: &str = "FleetDeployment";
pub const ROLLOUT_KIND: &str = "FleetRollout";

/// A decoded manifest document
#[derive(Debug, Clone)]
pub enum Resource {
    Deployment(DeploymentRecord),
    Rollout(RolloutRecord),
}

type Decoder = fn(serde_yaml::Value) -> Result<Resource>;

/// Registry of known record kinds
pub struct KindRegistry {
    decoders: HashMap<&'static str, Decoder>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with the two built-in kinds registered
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DEPLOYMENT_KIND, decode_deployment);
        registry.register(ROLLOUT_KIND, decode_rollout);
        registry
    }

    pub fn register(&mut self, kind: &'static str, decoder: Decoder) {
        self.decoders.insert(kind, decoder);
    }

    /// Decode one manifest document by its `kind` field
    pub fn decode(&self, doc: serde_yaml::Value) -> Result<Resource> {
        let kind = doc
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| StoreError::UnknownKind("<missing kind field>".to_string()))?
            .to_string();

        let decoder = self
            .decoders
            .get(kind.as_str())
            .ok_or_else(|| StoreError::UnknownKind(kind.clone()))?;

        decoder(doc)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn decode_deployment(doc: serde_yaml::Value) -> Result<Resource> {
    let record: DeploymentRecord = serde_yaml::from_value(doc).map_err(|e| StoreError::Decode {
        kind: DEPLOYMENT_KIND.to_string(),
        source: e,
    })?;
    Ok(Resource::Deployment(record))
}

fn decode_rollout(doc: serde_yaml::Value) -> Result<Resource> {
    let record: RolloutRecord = serde_yaml::from_value(doc).map_err(|e| StoreError::Decode {
        kind: ROLLOUT_KIND.to_string(),
        source: e,
    })?;
    Ok(Resource::Rollout(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_deployment() {
        let registry = KindRegistry::with_defaults();
        let doc: serde_yaml::Value = serde_yaml::from_str(
            r#"
            kind: FleetDeployment
            namespace: fleet
            name: acme-prod
            spec:
              targetVersion: "2.3.0"
              project: acme
              environment: prod
            "#,
        )
        .unwrap();

        match registry.decode(doc).unwrap() {
            Resource::Deployment(d) => {
                assert_eq!(d.name, "acme-prod");
                assert_eq!(d.spec.target_version, "2.3.0");
            }
            other => panic!("Expected deployment, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rollout() {
        let registry = KindRegistry::with_defaults();
        let doc: serde_yaml::Value = serde_yaml::from_str(
            r#"
            kind: FleetRollout
            namespace: fleet
            name: bump-prod
            spec:
              namespace: fleet
              tags: [prod]
              targetVersion: "2.3.0"
            "#,
        )
        .unwrap();

        match registry.decode(doc).unwrap() {
            Resource::Rollout(r) => {
                assert_eq!(r.spec.tags, vec!["prod".to_string()]);
            }
            other => panic!("Expected rollout, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind() {
        let registry = KindRegistry::with_defaults();
        let doc: serde_yaml::Value = serde_yaml::from_str("kind: Mystery\nname: x").unwrap();

        match registry.decode(doc) {
            Err(StoreError::UnknownKind(kind)) => assert_eq!(kind, "Mystery"),
            other => panic!("Expected UnknownKind, got {:?}", other),
        }
    }
}
