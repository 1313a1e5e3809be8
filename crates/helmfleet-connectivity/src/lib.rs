//! Preflight connectivity checks
//!
//! Before a release is applied, every configured dependent service must
//! answer a probe. Services without a configured address are skipped;
//! absence of configuration is not unreachability. The check is
//! read-only and fails fast on the first unreachable service.

pub mod error;
pub mod probe;

// Re-exports
pub use error::{ConnectivityError, Result};
pub use probe::ProbeChecker;

use async_trait::async_trait;
use helmfleet_core::ServiceValues;

/// Connectivity check abstraction
#[async_trait]
pub trait ConnectivityCheck: Send + Sync {
    /// Verify every configured dependent service is reachable.
    /// Returns the first failure; performs no mutation.
    async fn check(&self, values: &ServiceValues) -> Result<()>;
}
