//! Resource store contract
//!
//! The records live in an external resource store; the reconcilers only
//! see this narrow get/list/update contract and never cache records
//! across passes. `MemoryStore` is the in-process implementation used by
//! tests and the daemon; a cluster-backed store plugs in behind the same
//! trait.

pub mod error;
pub mod memory;
pub mod registry;
pub mod store;

// Re-exports
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use registry::{KindRegistry, Resource, DEPLOYMENT_KIND, ROLLOUT_KIND};
pub use store::ResourceStore;
