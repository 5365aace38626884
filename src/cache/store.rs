//! Durable URL-to-content cache with expiry
//!
//! The whole mapping lives in memory and is mirrored to a single JSON file in
//! an XDG-compliant cache directory (`~/.cache/webfetch/` on Linux) or any
//! caller-supplied path. Every mutation rewrites that file before returning,
//! so the store survives process restarts without any teardown step.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Duration as TimeDelta, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;

/// File name of the persisted store inside the cache directory.
const CACHE_FILE: &str = "responses.json";

/// One cached response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Instant after which the entry no longer serves reads.
    pub expires_at: DateTime<Utc>,
    /// The cached response body.
    pub content: String,
}

/// Durable url → content mapping with expiry.
///
/// Expired entries are treated as absent by `get` but keep occupying storage
/// until overwritten or invalidated. Mutations rewrite the full file (not an
/// append), so concurrent writers are last-writer-wins; the store provides no
/// cross-process locking.
pub struct CacheStore {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    /// Opens the store backed by `path`, loading any persisted entries.
    ///
    /// A missing file is an empty store, not an error. A file that exists but
    /// cannot be read or parsed also yields an empty store, with a warning;
    /// the previous contents are only lost once the next mutation rewrites
    /// the file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "cache file does not parse, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "cache file could not be read, starting empty"
                );
                HashMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "cache store opened");
        Self { path, entries }
    }

    /// Opens the store at the platform cache directory.
    ///
    /// Fails only when no cache directory can be determined for the platform
    /// (e.g. no home directory).
    pub fn open_default() -> Result<Self, CacheError> {
        let dirs = ProjectDirs::from("", "", "webfetch").ok_or(CacheError::NoCacheDir)?;
        Ok(Self::open(dirs.cache_dir().join(CACHE_FILE)))
    }

    /// Path of the persisted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached content for `url` while it is still fresh.
    ///
    /// Expired and never-cached are indistinguishable to the caller.
    pub fn get(&self, url: &str) -> Option<&str> {
        let entry = self.entries.get(url)?;
        if Utc::now() < entry.expires_at {
            Some(&entry.content)
        } else {
            None
        }
    }

    /// Stores `content` under `url` for `ttl` and rewrites the persisted file.
    pub fn save(&mut self, url: &str, content: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry {
            expires_at: expiry_after(ttl),
            content: content.to_string(),
        };
        self.entries.insert(url.to_string(), entry);
        self.persist()?;
        debug!(url, ttl_secs = ttl.as_secs(), "cache entry saved");
        Ok(())
    }

    /// Drops the entry for `url` (no-op when absent) and rewrites the
    /// persisted file.
    pub fn invalidate(&mut self, url: &str) -> Result<(), CacheError> {
        self.entries.remove(url);
        self.persist()?;
        debug!(url, "cache entry invalidated");
        Ok(())
    }

    /// Serializes the full mapping to disk, creating the parent directory as
    /// needed.
    fn persist(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, raw).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Absolute expiry for an entry stored now, saturating on overflow.
fn expiry_after(ttl: Duration) -> DateTime<Utc> {
    let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
    Utc::now()
        .checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
