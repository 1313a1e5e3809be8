//! git CLI wrapper
//!
//! Clone-or-pull semantics: a missing path is cloned, an existing
//! working copy is pulled, and a path without `.git` metadata is
//! rejected outright. "Already up to date" exits zero and is success.

use crate::error::{GitOpsError, Result};
use crate::lock::PathLocks;
use crate::RepoSync;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Repository sync backed by the git CLI
#[derive(Default)]
pub struct GitCli {
    locks: PathLocks,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    async fn clone_repo(&self, repo_url: &str, local_path: &Path) -> Result<()> {
        tracing::info!(url = repo_url, path = %local_path.display(), "cloning repository");

        let output = run_git(&["clone", repo_url, &local_path.to_string_lossy()]).await?;
        match output {
            GitOutput::Ok(_) => Ok(()),
            GitOutput::Failed(stderr) => Err(GitOpsError::CloneFailed {
                url: repo_url.to_string(),
                stderr,
            }),
        }
    }

    async fn pull_repo(&self, repo_url: &str, local_path: &Path) -> Result<()> {
        tracing::info!(url = repo_url, path = %local_path.display(), "pulling latest changes");

        let path = local_path.to_string_lossy();
        let output = run_git(&["-C", &path, "pull", "origin"]).await?;
        match output {
            GitOutput::Ok(stdout) => {
                tracing::debug!(path = %local_path.display(), output = %stdout.trim(), "pull complete");
                Ok(())
            }
            GitOutput::Failed(stderr) => Err(GitOpsError::PullFailed {
                path: local_path.to_path_buf(),
                stderr,
            }),
        }
    }
}

#[async_trait]
impl RepoSync for GitCli {
    async fn sync(&self, repo_url: &str, local_path: &Path) -> Result<()> {
        let lock = self.locks.lock_for(local_path);
        let _guard = lock.lock().await;

        if !local_path.exists() {
            return self.clone_repo(repo_url, local_path).await;
        }

        if !local_path.join(".git").is_dir() {
            return Err(GitOpsError::NotARepository(local_path.to_path_buf()));
        }

        self.pull_repo(repo_url, local_path).await
    }
}

enum GitOutput {
    Ok(String),
    Failed(String),
}

async fn run_git(args: &[&str]) -> Result<GitOutput> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running: git {}", args.join(" "));

    let output = cmd.output().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GitOpsError::GitNotFound
        } else {
            GitOpsError::Io(e)
        }
    })?;

    if output.status.success() {
        Ok(GitOutput::Ok(
            String::from_utf8_lossy(&output.stdout).to_string(),
        ))
    } else {
        Ok(GitOutput::Failed(
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }
}
