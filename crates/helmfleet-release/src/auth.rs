//! Chart registry credential refresh
//!
//! Registry tokens are short-lived, so the login runs immediately before
//! every apply. The access token is piped to helm on stdin and never hits
//! the process argument list.

use crate::error::{ReleaseError, Result};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Logs into a private chart registry with a freshly minted access token
#[derive(Debug, Clone)]
pub struct RegistryLogin {
    host: String,
}

impl RegistryLogin {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub async fn login(&self) -> Result<()> {
        let token = Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await?;

        if !token.status.success() {
            let stderr = String::from_utf8_lossy(&token.stderr);
            return Err(ReleaseError::RegistryLoginFailed(format!(
                "failed to get access token: {}",
                stderr.trim()
            )));
        }

        let mut child = Command::new("helm")
            .args([
                "registry",
                "login",
                "-u",
                "oauth2accesstoken",
                "--password-stdin",
                &self.host,
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&token.stdout).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::RegistryLoginFailed(stderr.trim().to_string()));
        }

        tracing::info!(host = %self.host, "logged into chart registry");
        Ok(())
    }
}
