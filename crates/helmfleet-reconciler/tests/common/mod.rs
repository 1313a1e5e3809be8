use async_trait::async_trait;
use helmfleet_connectivity::{ConnectivityCheck, ConnectivityError};
use helmfleet_core::{
    ConfigRef, DeploymentRecord, DeploymentSpec, DeploymentStatus, ServiceValues,
};
use helmfleet_gitops::{GitOpsError, RepoSync};
use helmfleet_release::{ReleaseApplier, ReleaseError, ReleaseRequest};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// A working-copy directory laid out the way the config repository is
pub struct TestRepo {
    pub root: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    /// Create the decrypted secrets file for a project/environment pair
    #[allow(dead_code)]
    pub fn write_decrypted_secrets(&self, project: &str, environment: &str) {
        let dir = self
            .root
            .path()
            .join("environments")
            .join(format!("{}-{}", project, environment))
            .join("secrets")
            .join("platform");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("secrets.yaml.dec"), "apiKey: test").unwrap();
    }

    /// Create a helmfile for the given flavor
    #[allow(dead_code)]
    pub fn write_helmfile(&self, helmfile_type: &str) {
        let dir = self
            .root
            .path()
            .join("helmfiles")
            .join("platform")
            .join(helmfile_type);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("helmfile.yaml"), "releases: []").unwrap();
    }
}

/// Repo sync fake: records calls, optionally fails
#[derive(Default)]
pub struct FakeRepoSync {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeRepoSync {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepoSync for FakeRepoSync {
    async fn sync(&self, repo_url: &str, local_path: &Path) -> helmfleet_gitops::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GitOpsError::PullFailed {
                path: local_path.to_path_buf(),
                stderr: format!("cannot reach {}", repo_url),
            });
        }
        Ok(())
    }
}

/// Connectivity fake
#[derive(Default)]
pub struct FakeConnectivity {
    pub fail: bool,
}

impl FakeConnectivity {
    pub fn reachable() -> Self {
        Self { fail: false }
    }

    #[allow(dead_code)]
    pub fn unreachable() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl ConnectivityCheck for FakeConnectivity {
    async fn check(&self, _values: &ServiceValues) -> helmfleet_connectivity::Result<()> {
        if self.fail {
            return Err(ConnectivityError::Unreachable {
                service: "vault".to_string(),
                address: "https://vault.internal".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

/// Applier fake: captures requests, optionally fails
#[derive(Default)]
pub struct FakeApplier {
    pub requests: Mutex<Vec<ReleaseRequest>>,
    pub fail: bool,
}

impl FakeApplier {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn applied(&self) -> Vec<ReleaseRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseApplier for FakeApplier {
    async fn apply(&self, request: &ReleaseRequest) -> helmfleet_release::Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(ReleaseError::SyncFailed("exit status 1".to_string()));
        }
        Ok(())
    }
}

/// A deployment record with sensible test defaults
pub fn deployment(namespace: &str, name: &str) -> DeploymentRecord {
    DeploymentRecord {
        namespace: namespace.to_string(),
        name: name.to_string(),
        spec: DeploymentSpec {
            target_version: "1.0.0".to_string(),
            chart: "oci://registry.example.com/charts/platform".to_string(),
            chart_version: "1.4.2".to_string(),
            values_from: ConfigRef {
                name: "platform-values".to_string(),
                key: "values.yaml".to_string(),
            },
            project: "acme".to_string(),
            environment: "prod".to_string(),
            repo_url: "https://example.com/config.git".to_string(),
            sync_interval: "30s".to_string(),
            ..Default::default()
        },
        status: DeploymentStatus::default(),
    }
}
