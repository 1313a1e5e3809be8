//! Probe implementations
//!
//! HTTP-checkable services get a GET following redirects and must answer
//! exactly 200. Network-checkable services get a single echo request via
//! the ping CLI with a bounded timeout.

use crate::error::{ConnectivityError, Result};
use crate::ConnectivityCheck;
use async_trait::async_trait;
use helmfleet_core::{ProbeKind, ServiceEndpoint, ServiceValues};
use reqwest::StatusCode;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe-based connectivity checker
pub struct ProbeChecker {
    http: reqwest::Client,
    ping_timeout: Duration,
}

impl ProbeChecker {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            ping_timeout: PING_TIMEOUT,
        })
    }

    async fn probe_http(&self, endpoint: &ServiceEndpoint) -> Result<()> {
        let url = ensure_http_scheme(&endpoint.address);
        tracing::debug!(service = endpoint.name, url = %url, "HTTP probe");

        let response =
            self.http
                .get(&url)
                .send()
                .await
                .map_err(|e| ConnectivityError::Unreachable {
                    service: endpoint.name.to_string(),
                    address: endpoint.address.clone(),
                    reason: e.to_string(),
                })?;

        if response.status() != StatusCode::OK {
            return Err(ConnectivityError::Unreachable {
                service: endpoint.name.to_string(),
                address: endpoint.address.clone(),
                reason: format!("received HTTP status {}", response.status().as_u16()),
            });
        }

        Ok(())
    }

    async fn probe_ping(&self, endpoint: &ServiceEndpoint) -> Result<()> {
        let host = strip_scheme(&endpoint.address);
        let timeout_secs = self.ping_timeout.as_secs().max(1).to_string();
        tracing::debug!(service = endpoint.name, host = host, "echo probe");

        let output = Command::new("ping")
            .args(["-c", "1", "-W", &timeout_secs, host])
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConnectivityError::Unreachable {
                service: endpoint.name.to_string(),
                address: endpoint.address.clone(),
                reason: if stderr.trim().is_empty() {
                    "no echo reply".to_string()
                } else {
                    stderr.trim().to_string()
                },
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ConnectivityCheck for ProbeChecker {
    async fn check(&self, values: &ServiceValues) -> Result<()> {
        for endpoint in values.endpoints() {
            if endpoint.address.is_empty() {
                tracing::debug!(
                    service = endpoint.name,
                    "skipping connectivity check: no address configured"
                );
                continue;
            }

            match endpoint.probe {
                ProbeKind::Http => self.probe_http(&endpoint).await?,
                ProbeKind::Icmp => self.probe_ping(&endpoint).await?,
            }

            tracing::debug!(
                service = endpoint.name,
                address = %endpoint.address,
                "service reachable"
            );
        }

        Ok(())
    }
}

/// HTTP probes need a scheme; bare hostnames get plain http
fn ensure_http_scheme(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

/// Echo probes want a bare host, with any scheme and path stripped
fn strip_scheme(address: &str) -> &str {
    let host = address
        .strip_prefix("https://")
        .or_else(|| address.strip_prefix("http://"))
        .unwrap_or(address);
    host.split(['/', ':']).next().unwrap_or(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_http_scheme() {
        assert_eq!(
            ensure_http_scheme("vault.internal"),
            "http://vault.internal"
        );
        assert_eq!(
            ensure_http_scheme("https://vault.internal"),
            "https://vault.internal"
        );
        assert_eq!(
            ensure_http_scheme("http://midtier.example.com"),
            "http://midtier.example.com"
        );
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("db.internal"), "db.internal");
        assert_eq!(strip_scheme("https://db.internal"), "db.internal");
        assert_eq!(strip_scheme("http://db.internal:5432"), "db.internal");
        assert_eq!(strip_scheme("https://db.internal/path"), "db.internal");
    }

    #[tokio::test]
    async fn test_unconfigured_services_are_skipped() {
        // No addresses configured at all: the check passes without
        // issuing a single probe
        let values = ServiceValues::parse("{}").unwrap();
        let checker = ProbeChecker::new().unwrap();
        assert!(checker.check(&values).await.is_ok());
    }
}
