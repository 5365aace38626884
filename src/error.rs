//! Error types for the fetch pipeline
//!
//! Every failure is surfaced as a value; nothing in this crate terminates the
//! process. `FetchError::status` recovers the last HTTP status observed before
//! a failure, mirroring the (body, status, error) shape callers consume.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the HTTP transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client failed at the transport level (connect, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by a non-reqwest transport implementation.
    #[error("transport failed: {0}")]
    Other(String),
}

/// Errors raised by the cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the persisted cache file failed.
    #[error("cache file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The in-memory mapping could not be serialized.
    #[error("failed to serialize cache contents: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No platform cache directory could be determined (e.g. no home directory).
    #[error("no cache directory could be determined for this platform")]
    NoCacheDir,
}

/// Errors returned to the caller of a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The locator could not be parsed as a URL; surfaced before any request.
    #[error("invalid url {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The error budget ran out before a usable response arrived.
    #[error("gave up after {errors} failed attempt(s) (last status {status})")]
    BudgetExhausted {
        errors: u32,
        status: u16,
        #[source]
        source: Option<TransportError>,
    },

    /// A 429 response carried a `Retry-After` header that was not a number of
    /// seconds. Deliberate fail-fast instead of guessing a default pause.
    #[error("rate limited, but Retry-After header {value:?} is not a number of seconds")]
    RetryAfterUnparsable { value: Option<String> },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body (status {status})")]
    Body {
        status: u16,
        #[source]
        source: TransportError,
    },

    /// The cache store failed to persist a mutation.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The fetched body could not be written to the configured output file.
    #[error("failed to write output file {path} (status {status}): {source}")]
    Outfile {
        path: PathBuf,
        status: u16,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Last HTTP status observed before the failure; `0` when no response was
    /// ever received.
    pub fn status(&self) -> u16 {
        match self {
            FetchError::BudgetExhausted { status, .. }
            | FetchError::Body { status, .. }
            | FetchError::Outfile { status, .. } => *status,
            FetchError::RetryAfterUnparsable { .. } => 429,
            FetchError::InvalidUrl { .. } | FetchError::Cache(_) => 0,
        }
    }
}
