//! Query cache with a staleness window and explicit invalidation.
//!
//! List queries are stored under a [`QueryKey`] together with the time they
//! were fetched. A fresh entry is served without network I/O; a stale or
//! missing entry makes the caller refetch and replace it. Mutations
//! invalidate keys by prefix so the next read refetches. Cached collections
//! are only ever replaced, never patched.
//!
//! Backends implement [`CacheStore`]; [`InMemoryCache`] is process-local and
//! [`FileCache`] persists entries as JSON so consecutive CLI invocations
//! share them.

#[cfg(feature = "cache-file")]
mod file;
mod memory;

use core::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

#[cfg(feature = "cache-file")]
pub use file::FileCache;
pub use memory::InMemoryCache;

/// Default staleness window for list queries.
pub const DEFAULT_STALE_TIME: TimeDelta = TimeDelta::minutes(5);

/// Staleness window for notification statistics.
pub const NOTIFICATION_STATS_STALE_TIME: TimeDelta = TimeDelta::minutes(2);

// ── Well-known key roots ────────────────────────────────────────────────

/// Root of the business list key.
pub const BUSINESSES: &str = "businesses";
/// Root of the single-business keys.
pub const BUSINESS: &str = "business";
/// Root of the business documents key.
pub const BUSINESS_DOCUMENTS: &str = "business-documents";
/// Root of the client users key.
pub const CLIENTS: &str = "clients";
/// Root of the notification list key.
pub const NOTIFICATIONS: &str = "notifications";
/// Root of the notification statistics key.
pub const NOTIFICATION_STATS: &str = "notification-stats";
/// Root of the points configuration key.
pub const POINTS_CONFIG: &str = "points-config";

/// Hierarchical cache key, e.g. `["business", "<id>"]`.
///
/// Invalidation matches by prefix: invalidating `["business"]` drops every
/// single-business entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Creates a single-segment key.
    #[inline]
    #[must_use]
    pub fn root(segment: &str) -> Self {
        Self(vec![segment.to_owned()])
    }

    /// Creates a key from its segments.
    #[inline]
    #[must_use]
    pub const fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Appends a segment.
    #[inline]
    #[must_use]
    pub fn with<S: Into<String>>(mut self, segment: S) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Returns the key segments.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if `prefix` is a leading run of this key's segments.
    #[inline]
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns how long entries under this key stay fresh.
    #[inline]
    #[must_use]
    pub fn stale_time(&self) -> TimeDelta {
        if self.0.first().is_some_and(|root| root == NOTIFICATION_STATS) {
            NOTIFICATION_STATS_STALE_TIME
        } else {
            DEFAULT_STALE_TIME
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "\"{segment}\"")?;
        }
        f.write_str("]")
    }
}

/// A cached query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Serialized query result.
    pub value: serde_json::Value,
    /// When the result was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Returns `true` if the entry is still within `stale_time` at `now`.
    #[inline]
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, stale_time: TimeDelta) -> bool {
        now.signed_duration_since(self.fetched_at) < stale_time
    }
}

/// Backend storing cached query results.
///
/// All methods take `&self`; implementations use interior mutability
/// (e.g. `Mutex`) for thread-safe mutation.
pub trait CacheStore: fmt::Debug + Send + Sync {
    /// Returns the entry stored under `key`, fresh or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn get(&self, key: &QueryKey) -> Result<Option<CacheEntry>>;

    /// Stores `entry` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn put(&self, key: QueryKey, entry: CacheEntry) -> Result<()>;

    /// Removes every entry whose key starts with `prefix` and returns how
    /// many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn invalidate(&self, prefix: &QueryKey) -> Result<usize>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn clear(&self) -> Result<()>;
}

/// Returns the cached value under `key` if it is still fresh at `now`.
///
/// Entries that no longer deserialize into `T` are treated as missing.
///
/// # Errors
///
/// Returns an error if the backend fails to read.
#[tracing::instrument(skip_all, fields(key = %key))]
pub fn read_fresh<C: CacheStore + ?Sized, T: DeserializeOwned>(
    cache: &C,
    key: &QueryKey,
    now: DateTime<Utc>,
) -> Result<Option<T>> {
    let Some(entry) = cache.get(key)? else {
        tracing::trace!("cache miss");
        return Ok(None);
    };
    if !entry.is_fresh(now, key.stale_time()) {
        tracing::debug!(fetched_at = %entry.fetched_at, "cache entry is stale");
        return Ok(None);
    }
    match serde_json::from_value(entry.value) {
        Ok(value) => {
            tracing::trace!("cache hit");
            Ok(Some(value))
        }
        Err(err) => {
            tracing::warn!(error = %err, "discarding undecodable cache entry");
            Ok(None)
        }
    }
}

/// Serializes `value` and stores it under `key` as fetched at `now`.
///
/// # Errors
///
/// Returns an error if serialization fails or the backend fails to write.
#[tracing::instrument(skip_all, fields(key = %key))]
pub fn write<C: CacheStore + ?Sized, T: Serialize>(
    cache: &C,
    key: QueryKey,
    value: &T,
    now: DateTime<Utc>,
) -> Result<()> {
    let json = serde_json::to_value(value).map_err(AdminError::from)?;
    cache.put(
        key,
        CacheEntry {
            value: json,
            fetched_at: now,
        },
    )
}

/// Wraps a mutex poison error into an [`AdminError::Cache`].
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> AdminError {
    AdminError::Cache(err.to_string().into())
}
