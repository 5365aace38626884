//! On-disk response cache keyed by URL
//!
//! The store holds the full url → (content, expiry) mapping in memory,
//! mirrored to a single JSON file that is rewritten synchronously on every
//! mutation. A missing file is an empty cache, not a fault.

mod store;

pub use store::{CacheEntry, CacheStore};
