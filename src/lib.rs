//! webfetch - fetch a URL over HTTP with retries, rate-limit pacing, and an
//! on-disk response cache.
//!
//! The crate exposes three collaborating pieces: [`Fetcher`] runs the GET with
//! an exponential-backoff retry loop and `Retry-After` pacing on 429s,
//! [`CacheStore`] is a durable url → (content, expiry) mapping persisted to a
//! single JSON file, and [`Retriever`] ties the two together per a
//! [`FetchConfig`]. Argument parsing and CLI wiring are left to the caller.
//!
//! ```no_run
//! use std::time::Duration;
//! use webfetch::{FetchConfig, Retriever};
//!
//! # async fn demo() -> Result<(), webfetch::FetchError> {
//! let mut retriever = Retriever::new()?;
//! let config = FetchConfig::new("https://example.com")
//!     .with_cache_ttl(Duration::from_secs(3600))
//!     .with_max_errors(3);
//! let result = retriever.fetch(&config).await?;
//! println!("{} bytes (status {})", result.body.len(), result.status);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod retriever;
pub mod transport;

pub use cache::{CacheEntry, CacheStore};
pub use config::FetchConfig;
pub use error::{CacheError, FetchError, TransportError};
pub use fetcher::{FetchResult, Fetcher};
pub use retriever::Retriever;
pub use transport::{HttpTransport, Reply, Transport};
