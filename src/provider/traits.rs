//! Quote provider trait definition.

use std::time::Duration;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::QuoteError;
use crate::models::{HistoryPoint, Instrument, QuoteParams, Quote};

/// Cache TTL for latest quotes.
pub const DEFAULT_QUOTE_TTL: Duration = Duration::from_secs(60);

/// Cache TTL for historical series.
pub const HISTORY_TTL: Duration = Duration::from_secs(300);

/// Request timeout for latest quotes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request timeout for historical-range queries, which are heavier.
pub const HISTORY_TIMEOUT: Duration = Duration::from_secs(15);

/// A third-party quote source.
///
/// Providers build upstream URLs and normalize raw payloads; they never do
/// transport. The fetch pipeline owns the relay wrapping, retries, and
/// caching, so `normalize` stays a pure function of the payload.
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier, used in request fingerprints and logs.
    fn id(&self) -> &'static str;

    /// Whether this provider can serve the given instrument.
    fn supports(&self, instrument: &Instrument) -> bool;

    /// The upstream URL for a request, before relay wrapping.
    fn quote_url(&self, instrument: &Instrument, params: &QuoteParams) -> String;

    /// Map a raw payload to a normalized quote.
    ///
    /// Change and change-percent are always recomputed from price and
    /// previous close, never trusted from the payload.
    fn normalize(&self, raw: &Value, instrument: &Instrument) -> Result<Quote, QuoteError>;

    /// Map a raw payload to a history series.
    fn normalize_history(&self, raw: &Value) -> Result<Vec<HistoryPoint>, QuoteError> {
        let _ = raw;
        Err(QuoteError::ProviderReportedError {
            provider: self.id().to_string(),
            message: "historical series not supported".to_string(),
        })
    }

    /// How long a successful response stays fresh in the cache.
    fn cache_ttl(&self, params: &QuoteParams) -> Duration {
        if params.is_range() {
            HISTORY_TTL
        } else {
            DEFAULT_QUOTE_TTL
        }
    }

    /// Bounded timeout for the network call.
    fn request_timeout(&self, params: &QuoteParams) -> Duration {
        if params.is_range() {
            HISTORY_TIMEOUT
        } else {
            DEFAULT_TIMEOUT
        }
    }
}

/// Convert an f64 payload field to a decimal, rejecting NaN/infinity.
///
/// Uses the shortest round-trip conversion so a payload literal like
/// `2650.10` stays exactly `2650.10` rather than picking up the float's
/// excess bits.
pub(crate) fn decimal_field(value: f64, field: &str) -> Result<Decimal, QuoteError> {
    if !value.is_finite() {
        return Err(QuoteError::MalformedPayload {
            detail: format!("non-finite value for {}", field),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| QuoteError::MalformedPayload {
        detail: format!("unrepresentable value for {}: {}", field, value),
    })
}
