//! Orchestration: cache lookup, network fetch, output file
//!
//! The `Retriever` owns a `CacheStore` and a `Fetcher` and ties them together
//! per the configuration: force-invalidation, cache lookup, delegation to the
//! fetcher, cache write-back, and optional redirection of the body to a file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cache::CacheStore;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::fetcher::{FetchResult, Fetcher};

/// Ties the fetcher and the cache store together for one caller.
///
/// The store is loaded once at construction and owned here, so independent
/// retrievers over different store paths never share state.
pub struct Retriever {
    fetcher: Fetcher,
    store: CacheStore,
}

impl Retriever {
    /// Creates a retriever over the platform-default cache location.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_store(CacheStore::open_default()?))
    }

    /// Creates a retriever over an explicit store (e.g. a per-test one).
    pub fn with_store(store: CacheStore) -> Self {
        Self {
            fetcher: Fetcher::new(),
            store,
        }
    }

    /// Replaces the fetcher, keeping the store.
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Read-only view of the underlying store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Performs one configured retrieval.
    ///
    /// A cache hit skips the network entirely and reports status 200 by
    /// convention, since no request was made. A successful 200 fetch with a
    /// positive `cache_ttl` is written back to the store before returning.
    /// When `outfile` is set the body lives only in that file and the
    /// returned body is empty.
    pub async fn fetch(&mut self, config: &FetchConfig) -> Result<FetchResult, FetchError> {
        if config.force {
            self.store.invalidate(&config.url)?;
        }

        let cached = if config.force {
            None
        } else {
            self.store.get(&config.url).map(str::to_string)
        };

        let mut result = match cached {
            Some(body) => {
                debug!(url = %config.url, "cache hit, skipping network");
                FetchResult { body, status: 200 }
            }
            None => {
                let result = self.fetcher.fetch(config).await?;
                if !config.cache_ttl.is_zero() && result.status == 200 {
                    self.store.save(&config.url, &result.body, config.cache_ttl)?;
                }
                result
            }
        };

        if let Some(outfile) = &config.outfile {
            write_outfile(outfile, &result.body, result.status)?;
            debug!(url = %config.url, path = %outfile.display(), "body written to file");
            result.body = String::new();
        }

        Ok(result)
    }
}

/// Writes `body` verbatim to `path`, creating parent directories as needed.
fn write_outfile(path: &Path, body: &str, status: u16) -> Result<(), FetchError> {
    let io_err = |source| FetchError::Outfile {
        path: path.to_path_buf(),
        status,
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    fs::write(path, body).map_err(io_err)
}
