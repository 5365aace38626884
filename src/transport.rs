//! HTTP transport seam
//!
//! The retry loop talks to the network through the `Transport` trait so tests
//! can substitute an instrumented implementation. The production transport is
//! a thin wrapper over `reqwest::Client`.

use async_trait::async_trait;
use reqwest::header;
use reqwest::Client;

use crate::error::TransportError;

/// User-agent sent when spoofing is enabled.
pub(crate) const SPOOFED_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.100 Safari/537.36";

/// One HTTP response as seen by the retry loop.
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Retry-After` header, when present.
    pub retry_after: Option<String>,
    /// Deferred body read; only inspected once the retry loop settles on this
    /// reply, so a read failure on a retried response is never surfaced.
    pub body: Result<String, TransportError>,
}

/// A single-attempt GET issuer.
///
/// `Err` means no response arrived at all (connect failure, timeout); a reply
/// with a non-200 status is still `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, user_agent: Option<&str>) -> Result<Reply, TransportError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport over a default `reqwest` client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a transport over a custom `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, user_agent: Option<&str>) -> Result<Reply, TransportError> {
        let mut request = self.client.get(url);
        if let Some(ua) = user_agent {
            request = request.header(header::USER_AGENT, ua);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(TransportError::from);

        Ok(Reply {
            status,
            retry_after,
            body,
        })
    }
}
