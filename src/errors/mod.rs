//! Error types and fallback classification for quote retrieval.
//!
//! This module provides:
//! - [`QuoteError`]: the error enum for all quote operations
//! - [`FallbackClass`]: classification that determines how the fetch
//!   pipeline reacts (retry through another relay, degrade, or propagate)

mod fallback;

pub use fallback::FallbackClass;

use thiserror::Error;

use crate::store::StorageError;

/// Errors that can occur while retrieving quotes.
///
/// Every variant is classified into a [`FallbackClass`] via
/// [`fallback_class`](Self::fallback_class). Only caller programming errors
/// ever reach the public API as `Err`; everything transient is absorbed by
/// the degradation chain and shows up as quote provenance instead.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The relay endpoint could not be reached or answered with a
    /// non-success status. The relay gets a failure mark and the request
    /// is retried through the next-best relay.
    #[error("Relay unreachable: {relay} - {message}")]
    RelayUnreachable {
        /// Relay base URL that failed
        relay: String,
        /// Transport-level detail
        message: String,
    },

    /// The bounded request timeout elapsed. Treated like any other relay
    /// failure, not a crash.
    #[error("Timeout via relay: {relay}")]
    Timeout {
        /// Relay base URL that timed out
        relay: String,
    },

    /// The response body did not have the expected top-level shape, for
    /// either the relay envelope or the provider payload.
    #[error("Malformed payload: {detail}")]
    MalformedPayload {
        /// What was missing or unparseable
        detail: String,
    },

    /// The provider returned its own error envelope (e.g. unknown symbol
    /// upstream). Switching relays will not help.
    #[error("Provider error: {provider} - {message}")]
    ProviderReportedError {
        /// Provider that reported the error
        provider: String,
        /// The provider's error description
        message: String,
    },

    /// The requested symbol is not in the instrument catalog. This is a
    /// caller programming error and the only variant that propagates.
    #[error("Unsupported instrument: {0}")]
    UnsupportedInstrument(String),

    /// Session storage failed. Persistence is a durability aid, so this is
    /// absorbed by the cache rather than surfaced.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuoteError {
    /// Returns the fallback classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use goldpulse_quotes::errors::{FallbackClass, QuoteError};
    ///
    /// let error = QuoteError::Timeout { relay: "https://relay.example/?u=".to_string() };
    /// assert_eq!(error.fallback_class(), FallbackClass::NextRelay);
    ///
    /// let error = QuoteError::UnsupportedInstrument("BOGUS".to_string());
    /// assert_eq!(error.fallback_class(), FallbackClass::Propagate);
    /// ```
    pub fn fallback_class(&self) -> FallbackClass {
        match self {
            // Relay-attributable faults - rotate and retry
            Self::RelayUnreachable { .. } | Self::Timeout { .. } | Self::MalformedPayload { .. } => {
                FallbackClass::NextRelay
            }

            // Upstream said no; no relay will change that
            Self::ProviderReportedError { .. } | Self::Storage(_) => FallbackClass::Degrade,

            // Caller error
            Self::UnsupportedInstrument(_) => FallbackClass::Propagate,
        }
    }
}
