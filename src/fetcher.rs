//! Retry/backoff fetch loop
//!
//! The `Fetcher` performs one logical GET against a configured URL, retrying
//! transport failures and bad statuses against an error budget, doubling a
//! backoff delay between attempts, and pacing itself on 429 responses via the
//! `Retry-After` header.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{FetchError, TransportError};
use crate::transport::{HttpTransport, Reply, Transport, SPOOFED_USER_AGENT};

/// Base delay for exponential backoff; doubled before every retry sleep.
const BASE_BACKOFF: Duration = Duration::from_millis(100);

/// Result of one logical fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Response body; empty when the body was written to an output file.
    pub body: String,
    /// HTTP status code; 200 by convention for cache hits.
    pub status: u16,
}

/// Executes one logical GET, retrying per the configured error budget.
///
/// Holds no per-request state; a single `Fetcher` can serve any number of
/// sequential calls.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Creates a fetcher over the production `reqwest` transport.
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
        }
    }

    /// Creates a fetcher over a custom transport (e.g. an instrumented one in
    /// tests).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches `config.url`, retrying until success, budget exhaustion, or an
    /// unusable `Retry-After` header.
    pub async fn fetch(&self, config: &FetchConfig) -> Result<FetchResult, FetchError> {
        // A malformed locator never reaches the transport.
        if let Err(e) = config.url.parse::<reqwest::Url>() {
            return Err(FetchError::InvalidUrl {
                url: config.url.clone(),
                message: e.to_string(),
            });
        }

        let user_agent = config.spoof_user_agent.then_some(SPOOFED_USER_AGENT);

        let mut backoff = if config.no_backoff {
            Duration::ZERO
        } else {
            BASE_BACKOFF
        };
        let mut errors = 0u32;
        let mut status = 0u16;
        let mut last_transport_error: Option<TransportError> = None;

        let reply: Reply = loop {
            match self.transport.get(&config.url, user_agent).await {
                Ok(reply) => {
                    status = reply.status;
                    // Success check comes first: accept_any_status wins even
                    // over a 429.
                    if reply.status == 200 || config.accept_any_status {
                        break reply;
                    }
                    if reply.status == 429 {
                        match parse_retry_after(reply.retry_after.as_deref()) {
                            Some(pause) => {
                                debug!(
                                    url = %config.url,
                                    seconds = pause.as_secs(),
                                    "rate limited, pacing before retry"
                                );
                                // Pacing retries consume neither the error
                                // budget nor the backoff doubling.
                                sleep(pause).await;
                                continue;
                            }
                            None => {
                                warn!(
                                    url = %config.url,
                                    header = ?reply.retry_after,
                                    "rate limited with unusable Retry-After, giving up"
                                );
                                return Err(FetchError::RetryAfterUnparsable {
                                    value: reply.retry_after,
                                });
                            }
                        }
                    }
                    // Bad status: counts against the budget, but there is no
                    // transport error to report.
                    last_transport_error = None;
                }
                Err(e) => {
                    warn!(url = %config.url, error = %e, "request attempt failed");
                    last_transport_error = Some(e);
                }
            }

            errors += 1;
            if errors >= config.max_errors {
                return Err(FetchError::BudgetExhausted {
                    errors,
                    status,
                    source: last_transport_error,
                });
            }
            backoff *= 2;
            sleep(backoff).await;
        };

        let body = match reply.body {
            Ok(body) => body,
            Err(source) => return Err(FetchError::Body { status, source }),
        };

        debug!(url = %config.url, status, bytes = body.len(), "fetch complete");
        Ok(FetchResult { body, status })
    }
}

/// Reads a `Retry-After` header as whole seconds; anything else is `None`.
fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value?.trim().parse::<u64>().ok().map(Duration::from_secs)
}
