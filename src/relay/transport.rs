//! HTTP transport seam.
//!
//! The fetch pipeline never touches `reqwest` directly; it goes through the
//! [`RelayTransport`] trait so tests can substitute a double that records
//! calls or fails on demand.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::errors::QuoteError;

/// Default client-level timeout; per-request timeouts are usually tighter.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A GET-only transport returning the raw response body.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Issue a GET request with a bounded timeout.
    ///
    /// Implementations must map timeouts to [`QuoteError::Timeout`] and
    /// everything else transport-level (including non-2xx statuses) to
    /// [`QuoteError::RelayUnreachable`].
    async fn get(&self, url: &str, timeout: Duration) -> Result<String, QuoteError>;
}

/// Production transport over a shared `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<String, QuoteError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QuoteError::Timeout {
                        relay: url.to_string(),
                    }
                } else {
                    QuoteError::RelayUnreachable {
                        relay: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::RelayUnreachable {
                relay: url.to_string(),
                message: format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                ),
            });
        }
        // A 204 from a flaky relay yields an empty body; the shape decoder
        // rejects it as malformed, no special case needed here.
        response.text().await.map_err(|e| QuoteError::RelayUnreachable {
            relay: url.to_string(),
            message: format!("body read failed: {}", e),
        })
    }
}
