//! GoldPulse Quotes Crate
//!
//! This crate provides resilient quote retrieval for the GoldPulse
//! application: spot metal and equity prices fetched through untrusted
//! public CORS relays, with caching, deduplication, and graceful
//! degradation built in.
//!
//! # Overview
//!
//! The quotes crate supports:
//! - Spot metals (goldprice.org) and equities/ETFs/indices/futures (Yahoo
//!   v8 chart) over one normalized [`Quote`](models::Quote) shape
//! - A rotating pool of relay endpoints with per-endpoint failure counts
//! - Short-TTL response caching with session persistence and in-flight
//!   request deduplication
//! - A degradation chain (live, bundled static table, synthetic) so
//!   callers always get a value, tagged with its provenance
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |     Caller       | --> |   QuoteService   |  (orchestration)
//! +------------------+     +------------------+
//!                                  |
//!                   +--------------+--------------+
//!                   v              v              v
//!           +-------------+ +-------------+ +-----------+
//!           | ResponseCache| | InflightMap | | RelayPool |
//!           +-------------+ +-------------+ +-----------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  RelayTransport  |  (wrapped GET)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  QuoteProvider   |  (URL + normalize)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |      Quote       |  (with provenance)
//!                          +------------------+
//! ```
//!
//! Every failure short of an unknown symbol is absorbed by the degradation
//! chain; the provenance tag on the returned quote is the caller's only
//! signal that something upstream went wrong.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod provider;
pub mod relay;
pub mod service;
pub mod store;

pub use cache::ResponseCache;
pub use config::ServiceConfig;
pub use errors::{FallbackClass, QuoteError};
pub use models::{HistoryPoint, Instrument, Provenance, QuoteParams, Quote};
pub use service::{Health, QuoteService};
