//! Release applier
//!
//! One narrow contract: given a fully resolved release identity and
//! values paths, perform an idempotent create-or-update. Success and
//! failure come from the external tool's exit status alone; its output
//! is captured for diagnostics, never parsed.

use crate::auth::RegistryLogin;
use crate::error::{ReleaseError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Fully resolved input for one release apply
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    /// `{project}-{environment}`; doubles as the helmfile environment
    pub release_name: String,

    /// Chart reference (diagnostics; the helmfile pins the charts)
    pub chart: String,

    /// Chart version (diagnostics, as above)
    pub chart_version: String,

    /// Helmfile driving this environment's topology
    pub helmfile_path: PathBuf,

    /// Values files that must exist before anything runs
    pub values_paths: Vec<PathBuf>,

    /// Kube context override for out-of-cluster invocations
    pub kube_context: Option<String>,
}

/// Release application abstraction
#[async_trait]
pub trait ReleaseApplier: Send + Sync {
    async fn apply(&self, request: &ReleaseRequest) -> Result<()>;
}

/// Applier backed by the helmfile CLI
#[derive(Default)]
pub struct HelmfileCli {
    registry: Option<RegistryLogin>,
}

impl HelmfileCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh credentials against this registry before every apply
    pub fn with_registry_login(mut self, registry: RegistryLogin) -> Self {
        self.registry = Some(registry);
        self
    }
}

#[async_trait]
impl ReleaseApplier for HelmfileCli {
    async fn apply(&self, request: &ReleaseRequest) -> Result<()> {
        // Every referenced values file must exist up front; a partial
        // apply is worse than no apply
        for path in &request.values_paths {
            if !path.exists() {
                return Err(ReleaseError::MissingValuesFile(path.clone()));
            }
        }

        if let Some(registry) = &self.registry {
            registry.login().await?;
        }

        let helmfile_path = request.helmfile_path.to_string_lossy();
        let mut args = vec![
            "-f",
            helmfile_path.as_ref(),
            "--environment",
            &request.release_name,
            "sync",
        ];
        if let Some(context) = &request.kube_context {
            args.push("--kube-context");
            args.push(context);
        }

        tracing::info!(
            release = %request.release_name,
            chart = %request.chart,
            chart_version = %request.chart_version,
            "Running: helmfile {}",
            args.join(" ")
        );

        let output = Command::new("helmfile")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::error!(release = %request.release_name, stdout = %stdout, "helmfile sync failed");
            return Err(ReleaseError::SyncFailed(stderr.trim().to_string()));
        }

        tracing::debug!(
            release = %request.release_name,
            output = %String::from_utf8_lossy(&output.stdout),
            "helmfile sync succeeded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(values_paths: Vec<PathBuf>) -> ReleaseRequest {
        ReleaseRequest {
            release_name: "acme-prod".to_string(),
            chart: "oci://registry.example.com/charts/platform".to_string(),
            chart_version: "1.4.2".to_string(),
            helmfile_path: PathBuf::from("/repo/helmfiles/platform/gke/helmfile.yaml"),
            values_paths,
            kube_context: None,
        }
    }

    #[tokio::test]
    async fn test_missing_values_file_aborts_before_invocation() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("secrets.yaml.dec");

        let applier = HelmfileCli::new();
        let err = applier.apply(&request(vec![missing.clone()])).await.unwrap_err();

        match err {
            ReleaseError::MissingValuesFile(path) => assert_eq!(path, missing),
            other => panic!("Expected MissingValuesFile, got {:?}", other),
        }
    }
}
