//! In-memory cache backend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CacheEntry, CacheStore, QueryKey, lock_error};
use crate::error::Result;

/// Thread-safe in-memory query cache.
///
/// Entries live for the lifetime of the value; use it for long-running
/// processes and tests.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    /// Entries behind a single mutex for thread-safe interior mutability.
    inner: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal lock is poisoned.
    #[inline]
    pub fn len(&self) -> Result<usize> {
        self.with_lock(|entries| entries.len())
    }

    /// Acquires the lock and runs `f` on the entries.
    fn with_lock<R>(&self, f: impl FnOnce(&mut HashMap<QueryKey, CacheEntry>) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

impl CacheStore for InMemoryCache {
    #[inline]
    fn get(&self, key: &QueryKey) -> Result<Option<CacheEntry>> {
        self.with_lock(|entries| entries.get(key).cloned())
    }

    #[inline]
    fn put(&self, key: QueryKey, entry: CacheEntry) -> Result<()> {
        self.with_lock(|entries| {
            drop(entries.insert(key, entry));
        })
    }

    #[inline]
    fn invalidate(&self, prefix: &QueryKey) -> Result<usize> {
        self.with_lock(|entries| {
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            before - entries.len()
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(HashMap::clear)
    }
}
