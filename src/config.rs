//! Request configuration
//!
//! A `FetchConfig` describes one request intent: what to fetch, how hard to
//! retry, and what to do with the result. It is built once and treated as
//! immutable by the rest of the crate.

use std::path::PathBuf;
use std::time::Duration;

/// Describes one request intent.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// URL to fetch.
    pub url: String,
    /// How long a successful response stays cached; zero disables caching.
    pub cache_ttl: Duration,
    /// Hit the network even if a fresh cache entry exists, dropping that entry.
    pub force: bool,
    /// Send a fixed browser user-agent instead of the client default.
    pub spoof_user_agent: bool,
    /// Retryable failures tolerated before giving up; `0` makes the very first
    /// failure terminal.
    pub max_errors: u32,
    /// Disable exponential backoff between retry attempts.
    pub no_backoff: bool,
    /// Write the body to this file and return an empty body instead.
    pub outfile: Option<PathBuf>,
    /// Treat any received status code as terminal instead of retrying non-200s.
    pub accept_any_status: bool,
}

impl FetchConfig {
    /// Creates a configuration for `url` with everything else off: no caching,
    /// no spoofing, no output file, zero error budget.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache_ttl: Duration::ZERO,
            force: false,
            spoof_user_agent: false,
            max_errors: 0,
            no_backoff: false,
            outfile: None,
            accept_any_status: false,
        }
    }

    /// Cache a successful response for `ttl`.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Bypass and invalidate any existing cache entry for the URL.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Send a fixed, realistic browser user-agent with the request.
    pub fn with_spoofed_user_agent(mut self, spoof: bool) -> Self {
        self.spoof_user_agent = spoof;
        self
    }

    /// Tolerate up to `max_errors` retryable failures before giving up.
    pub fn with_max_errors(mut self, max_errors: u32) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Retry immediately instead of backing off exponentially.
    pub fn with_no_backoff(mut self, no_backoff: bool) -> Self {
        self.no_backoff = no_backoff;
        self
    }

    /// Write the fetched body to `path` instead of returning it.
    pub fn with_outfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.outfile = Some(path.into());
        self
    }

    /// Return the first response regardless of its status code.
    pub fn with_accept_any_status(mut self, accept: bool) -> Self {
        self.accept_any_status = accept;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_are_all_off() {
        let config = FetchConfig::new("https://example.com");

        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert!(!config.force);
        assert!(!config.spoof_user_agent);
        assert_eq!(config.max_errors, 0);
        assert!(!config.no_backoff);
        assert!(config.outfile.is_none());
        assert!(!config.accept_any_status);
    }

    #[test]
    fn test_builder_methods_chain() {
        let config = FetchConfig::new("https://example.com/data")
            .with_cache_ttl(Duration::from_secs(3600))
            .with_force(true)
            .with_spoofed_user_agent(true)
            .with_max_errors(5)
            .with_no_backoff(true)
            .with_outfile("/tmp/out.html")
            .with_accept_any_status(true);

        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert!(config.force);
        assert!(config.spoof_user_agent);
        assert_eq!(config.max_errors, 5);
        assert!(config.no_backoff);
        assert_eq!(config.outfile, Some(PathBuf::from("/tmp/out.html")));
        assert!(config.accept_any_status);
    }
}
