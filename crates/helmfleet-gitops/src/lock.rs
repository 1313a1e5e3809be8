//! Per-path lock registry
//!
//! Hands out one async mutex per working-copy path so clone/pull
//! operations against a shared path never interleave. Read-only access
//! after a sync is not guarded here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `path`. The same path always yields the same
    /// mutex for the lifetime of this registry.
    pub fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_shares_lock() {
        let locks = PathLocks::new();
        let a = locks.lock_for(Path::new("/tmp/repo"));
        let b = locks.lock_for(Path::new("/tmp/repo"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_distinct_paths_get_distinct_locks() {
        let locks = PathLocks::new();
        let a = locks.lock_for(Path::new("/tmp/repo-a"));
        let b = locks.lock_for(Path::new("/tmp/repo-b"));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let locks = PathLocks::new();
        let lock = locks.lock_for(Path::new("/tmp/repo"));

        let guard = lock.lock().await;
        assert!(locks.lock_for(Path::new("/tmp/repo")).try_lock().is_err());
        drop(guard);
        assert!(locks.lock_for(Path::new("/tmp/repo")).try_lock().is_ok());
    }
}
