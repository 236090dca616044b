//! Service configuration.
//!
//! Everything the host may want to tune lives here: the relay endpoint set
//! (with response-shape tags assigned at configuration time, never probed)
//! and the pacing/probe intervals. The config is plain data, deserializable
//! from whatever layer the host uses, and is handed to
//! [`QuoteService::new`](crate::service::QuoteService::new) once at startup.

use std::time::Duration;

use serde::Deserialize;

use crate::relay::{RelayEndpoint, RelayShape};

/// Minimum spacing between any two upstream requests.
const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout for health-check probes, deliberately short.
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// One configured relay endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct RelayEndpointConfig {
    /// Base URL prefix the encoded target URL is appended to.
    pub base: String,
    /// How this relay wraps the upstream response.
    pub shape: RelayShape,
}

/// Tunables for the quote service.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Relay endpoints in priority order. At least two are recommended;
    /// the pool rotates by failure count.
    pub relays: Vec<RelayEndpointConfig>,

    /// Minimum inter-request pacing interval, shared by all callers.
    #[serde(with = "duration_ms", rename = "request_interval_ms")]
    pub request_interval: Duration,

    /// Timeout for health-check probes.
    #[serde(with = "duration_ms", rename = "health_timeout_ms")]
    pub health_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            relays: vec![
                RelayEndpointConfig {
                    base: "https://api.allorigins.win/get?url=".to_string(),
                    shape: RelayShape::Enveloped,
                },
                RelayEndpointConfig {
                    base: "https://api.codetabs.com/v1/proxy?quest=".to_string(),
                    shape: RelayShape::Passthrough,
                },
                RelayEndpointConfig {
                    base: "https://corsproxy.io/?".to_string(),
                    shape: RelayShape::Passthrough,
                },
                RelayEndpointConfig {
                    base: "https://api.allorigins.win/raw?url=".to_string(),
                    shape: RelayShape::Passthrough,
                },
            ],
            request_interval: DEFAULT_REQUEST_INTERVAL,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Materialize the configured relay endpoints.
    pub fn relay_endpoints(&self) -> Vec<RelayEndpoint> {
        self.relays
            .iter()
            .map(|r| RelayEndpoint::new(r.base.clone(), r.shape))
            .collect()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
