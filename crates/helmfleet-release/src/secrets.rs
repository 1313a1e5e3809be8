//! helm secrets plugin wrapper
//!
//! Encryption and decryption of values files go through the helm secrets
//! plugin (sops underneath); this process never touches key material
//! itself. The plugin writes to stdout, so the result is persisted here.

use crate::error::{ReleaseError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Wrapper over `helm secrets encrypt|decrypt`
#[derive(Debug, Default, Clone)]
pub struct SecretsCli;

impl SecretsCli {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt `plain` and write the ciphertext to `output`
    pub async fn encrypt(&self, plain: &Path, output: &Path) -> Result<()> {
        let encrypted = self.run("encrypt", plain).await?;
        tokio::fs::write(output, encrypted).await?;
        Ok(())
    }

    /// Decrypt `encrypted` and write the plaintext to `output`
    pub async fn decrypt(&self, encrypted: &Path, output: &Path) -> Result<()> {
        let plain = self.run("decrypt", encrypted).await?;
        tokio::fs::write(output, plain).await?;
        Ok(())
    }

    async fn run(&self, op: &'static str, file: &Path) -> Result<Vec<u8>> {
        tracing::debug!("Running: helm secrets {} {}", op, file.display());

        let output = Command::new("helm")
            .args(["secrets", op])
            .arg(file)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::SecretsFailed {
                op,
                message: stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
