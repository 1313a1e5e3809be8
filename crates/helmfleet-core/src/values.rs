//! Typed projection of the platform values blob
//!
//! The values config object holds a YAML mapping with a fixed set of
//! recognized sections, one per dependent service. Only the host/address
//! fields matter here; everything else in the blob is chart input and is
//! ignored. Read-only input to the connectivity check, never persisted.

use crate::error::Result;
use serde::Deserialize;

/// Recognized service sections. Unknown keys are ignored, not errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceValues {
    pub midtier: HostSection,
    pub vault: AddressSection,
    pub rabbitmq: HostSection,
    pub timescaledb: HostSection,
    pub postgres: HostSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostSection {
    pub host: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressSection {
    pub address: String,
}

/// How a dependent service is probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// HTTP request following redirects, expecting a 200
    Http,
    /// Single echo request with a bounded timeout
    Icmp,
}

/// One dependent service address to verify
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    pub name: &'static str,
    pub address: String,
    pub probe: ProbeKind,
}

impl ServiceValues {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Endpoints in check order. Endpoints with an empty address are
    /// included; callers treat them as not configured and skip them.
    pub fn endpoints(&self) -> Vec<ServiceEndpoint> {
        vec![
            ServiceEndpoint {
                name: "vault",
                address: self.vault.address.clone(),
                probe: ProbeKind::Http,
            },
            ServiceEndpoint {
                name: "midtier",
                address: self.midtier.host.clone(),
                probe: ProbeKind::Http,
            },
            ServiceEndpoint {
                name: "rabbitmq",
                address: self.rabbitmq.host.clone(),
                probe: ProbeKind::Icmp,
            },
            ServiceEndpoint {
                name: "timescaledb",
                address: self.timescaledb.host.clone(),
                probe: ProbeKind::Icmp,
            },
            ServiceEndpoint {
                name: "postgres",
                address: self.postgres.host.clone(),
                probe: ProbeKind::Icmp,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_sections() {
        let values = ServiceValues::parse(
            r#"
            vault:
              address: https://vault.internal:8200
            midtier:
              host: midtier.example.com
            rabbitmq:
              host: mq.internal
            "#,
        )
        .unwrap();

        assert_eq!(values.vault.address, "https://vault.internal:8200");
        assert_eq!(values.midtier.host, "midtier.example.com");
        assert_eq!(values.rabbitmq.host, "mq.internal");
        // Absent sections default to empty, meaning "not configured"
        assert_eq!(values.postgres.host, "");
        assert_eq!(values.timescaledb.host, "");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let values = ServiceValues::parse(
            r#"
            vault:
              address: https://vault.internal
              namespace: extra
            replicaCount: 3
            image:
              tag: 2.3.0
            "#,
        )
        .unwrap();

        assert_eq!(values.vault.address, "https://vault.internal");
    }

    #[test]
    fn test_endpoint_classification() {
        let values = ServiceValues::parse(
            r#"
            vault:
              address: https://vault.internal
            postgres:
              host: db.internal
            "#,
        )
        .unwrap();

        let endpoints = values.endpoints();
        let vault = endpoints.iter().find(|e| e.name == "vault").unwrap();
        let postgres = endpoints.iter().find(|e| e.name == "postgres").unwrap();

        assert_eq!(vault.probe, ProbeKind::Http);
        assert_eq!(postgres.probe, ProbeKind::Icmp);
    }
}
