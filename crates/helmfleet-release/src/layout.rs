//! Config repository layout conventions
//!
//! Secrets live under `environments/{project}-{environment}/secrets/`,
//! helmfiles under `helmfiles/<app>/<type>/helmfile.yaml`. Paths are
//! resolved against the synced working copy; no file content is read
//! here.

use std::path::{Path, PathBuf};

/// Helmfile flavor used when the record leaves it unset
pub const DEFAULT_HELMFILE_TYPE: &str = "gke";

/// Platform chart directory inside the config repository
const APP_DIR: &str = "platform";

const SECRETS_FILE: &str = "secrets.yaml";
const DECRYPTED_SUFFIX: &str = ".dec";

/// Path resolution rooted at a working copy
#[derive(Debug, Clone)]
pub struct ReleaseLayout {
    root: PathBuf,
}

impl ReleaseLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn secrets_dir(&self, project: &str, environment: &str) -> PathBuf {
        self.root
            .join("environments")
            .join(format!("{}-{}", project, environment))
            .join("secrets")
            .join(APP_DIR)
    }

    pub fn secrets_file(&self, project: &str, environment: &str) -> PathBuf {
        self.secrets_dir(project, environment).join(SECRETS_FILE)
    }

    /// The decrypted sibling of the secrets file. Its absence is a
    /// configuration gap requiring human action.
    pub fn decrypted_secrets_file(&self, project: &str, environment: &str) -> PathBuf {
        let mut name = SECRETS_FILE.to_string();
        name.push_str(DECRYPTED_SUFFIX);
        self.secrets_dir(project, environment).join(name)
    }

    pub fn helmfile(&self, helmfile_type: Option<&str>) -> PathBuf {
        self.root
            .join("helmfiles")
            .join(APP_DIR)
            .join(helmfile_type.unwrap_or(DEFAULT_HELMFILE_TYPE))
            .join("helmfile.yaml")
    }
}

/// Deterministic release name; repeated applies for the same deployment
/// target the same release.
pub fn release_name(project: &str, environment: &str) -> String {
    format!("{}-{}", project, environment)
}

/// `.yaml.dec` files are already decrypted and usable as plain values
/// files; plain `.yaml` secrets are still encrypted.
pub fn is_decrypted_values(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".yaml.dec")
}
