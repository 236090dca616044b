//! Core data types for quote retrieval
//!
//! - `instrument` - Static reference data (Instrument) and AssetClass enum
//! - `quote` - Normalized quote record (Quote), Provenance tag, HistoryPoint
//! - `params` - Request parameters that feed the cache fingerprint (QuoteParams)

mod instrument;
mod params;
mod quote;

pub use instrument::{AssetClass, Instrument};
pub use params::QuoteParams;
pub use quote::{HistoryPoint, Provenance, Quote};
