//! Release application
//!
//! Wraps the external release tooling: helmfile for the idempotent
//! create-or-update of a release, helm registry login for short-lived
//! chart registry credentials, and the helm secrets plugin for values
//! encryption. The filesystem conventions of the config repository live
//! in [`layout`].

pub mod applier;
pub mod auth;
pub mod error;
pub mod layout;
pub mod secrets;

// Re-exports
pub use applier::{HelmfileCli, ReleaseApplier, ReleaseRequest};
pub use auth::RegistryLogin;
pub use error::{ReleaseError, Result};
pub use layout::{is_decrypted_values, release_name, ReleaseLayout, DEFAULT_HELMFILE_TYPE};
pub use secrets::SecretsCli;
