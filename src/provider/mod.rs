//! Quote provider abstractions and implementations.
//!
//! Providers know how to build upstream URLs and how to normalize their
//! payload shape into a [`Quote`](crate::models::Quote); everything else
//! (relay wrapping, retries, caching, deduplication) lives in the service.
//!
//! Two providers cover the catalog:
//! - `gold_price`: goldprice.org spot rates for metal instruments
//! - `yahoo_chart`: Yahoo v8 chart data for everything else

mod traits;

pub mod gold_price;
pub mod yahoo_chart;

pub use traits::{
    QuoteProvider, DEFAULT_QUOTE_TTL, DEFAULT_TIMEOUT, HISTORY_TIMEOUT, HISTORY_TTL,
};

use std::sync::Arc;

/// The standard provider set covering the whole catalog.
pub fn default_providers() -> Vec<Arc<dyn QuoteProvider>> {
    vec![
        Arc::new(gold_price::GoldPriceProvider),
        Arc::new(yahoo_chart::YahooChartProvider),
    ]
}
