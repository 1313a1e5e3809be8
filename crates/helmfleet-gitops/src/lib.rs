//! Config repository synchronization
//!
//! Keeps a local working copy of the version-controlled configuration
//! tree up to date with its remote. Callers locate files inside the
//! working copy by convention after a sync completes; there is no other
//! output.

pub mod error;
pub mod git;
pub mod lock;

// Re-exports
pub use error::{GitOpsError, Result};
pub use git::GitCli;
pub use lock::PathLocks;

use async_trait::async_trait;
use std::path::Path;

/// Repository sync abstraction
///
/// One method: make `local_path` an up-to-date working copy of
/// `repo_url`. Implementations must serialize mutating operations per
/// working-copy path; reconciliations for different deployments may
/// share one path.
#[async_trait]
pub trait RepoSync: Send + Sync {
    async fn sync(&self, repo_url: &str, local_path: &Path) -> Result<()>;
}
