//! JSON-file cache backend.
//!
//! Stores every entry in one JSON file under a configurable directory
//! (default: `$XDG_CACHE_HOME/marketplace-admin/`).

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{CacheEntry, CacheStore, QueryKey, lock_error};
use crate::error::{AdminError, Result};

/// Application name used for the cache directory.
const APP_NAME: &str = "marketplace-admin";

/// File holding the cached entries.
const ENTRIES_FILE: &str = "queries.json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "cache.lock";

/// One persisted entry.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    /// Query key.
    key: QueryKey,
    /// Cached value and fetch time.
    #[serde(flatten)]
    entry: CacheEntry,
}

/// File-backed query cache.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `cache.lock`: reads take a shared lock, writes an exclusive one.
///
/// # File layout
///
/// ```text
/// <dir>/
///   cache.lock     (cross-process lock sentinel)
///   queries.json
/// ```
#[derive(Debug)]
pub struct FileCache {
    /// Directory containing the cache files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileCache {
    /// Creates a file cache rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(cache_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(cache_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file cache");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the platform cache directory for this application.
    ///
    /// On Linux: `$XDG_CACHE_HOME/marketplace-admin/` (typically
    /// `~/.cache/marketplace-admin/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform cache directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::cache_dir()
            .map(|cache_path| cache_path.join(APP_NAME))
            .ok_or_else(|| AdminError::Cache("could not determine platform cache directory".into()))
    }

    /// Returns the directory this cache writes to.
    #[inline]
    #[must_use]
    pub const fn dir(&self) -> &PathBuf {
        &self.dir
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Runs `op` under the in-process mutex and a shared file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_error(&err))?;
        self.lock_file.lock_shared().map_err(cache_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(cache_io_error(err));
        }
        result
    }

    /// Runs `op` under the in-process mutex and an exclusive file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_error(&err))?;
        self.lock_file.lock().map_err(cache_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(cache_io_error(err));
        }
        result
    }

    /// Reads all records; a missing file is an empty cache.
    ///
    /// A corrupt file is also treated as empty so one bad write cannot
    /// wedge the console.
    fn read_records(&self) -> Result<Vec<Record>> {
        match fs::read_to_string(self.dir.join(ENTRIES_FILE)) {
            Ok(contents) => Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "ignoring corrupt cache file");
                Vec::new()
            })),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(cache_io_error(err)),
        }
    }

    /// Atomically writes all records (write-to-tmp then rename).
    fn write_records(&self, records: &[Record]) -> Result<()> {
        let path = self.dir.join(ENTRIES_FILE);
        let tmp_path = self.dir.join(format!("{ENTRIES_FILE}.tmp"));
        let json = serde_json::to_string_pretty(records).map_err(AdminError::from)?;
        fs::write(&tmp_path, json).map_err(cache_io_error)?;
        fs::rename(&tmp_path, &path).map_err(cache_io_error)?;
        Ok(())
    }
}

impl CacheStore for FileCache {
    #[inline]
    fn get(&self, key: &QueryKey) -> Result<Option<CacheEntry>> {
        self.with_shared_lock(|| {
            Ok(self
                .read_records()?
                .into_iter()
                .find(|record| &record.key == key)
                .map(|record| record.entry))
        })
    }

    #[inline]
    fn put(&self, key: QueryKey, entry: CacheEntry) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut records = self.read_records()?;
            records.retain(|record| record.key != key);
            records.push(Record { key, entry });
            self.write_records(&records)
        })
    }

    #[inline]
    fn invalidate(&self, prefix: &QueryKey) -> Result<usize> {
        self.with_exclusive_lock(|| {
            let mut records = self.read_records()?;
            let before = records.len();
            records.retain(|record| !record.key.starts_with(prefix));
            let removed = before - records.len();
            if removed > 0 {
                self.write_records(&records)?;
            }
            Ok(removed)
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_exclusive_lock(|| match fs::remove_file(self.dir.join(ENTRIES_FILE)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(cache_io_error(err)),
        })
    }
}

/// Wraps an I/O error into an [`AdminError::Cache`].
fn cache_io_error(err: std::io::Error) -> AdminError {
    AdminError::Cache(Box::new(err))
}
