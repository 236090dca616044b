use serde::{Deserialize, Serialize};

/// Asset classification for catalog instruments.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Precious metal spot price (e.g. XAU-USD)
    Metal,
    /// Single listed equity
    Equity,
    /// Exchange-traded fund
    Etf,
    /// Market index (e.g. ^GSPC)
    Index,
    /// Futures contract (e.g. CL=F)
    Future,
}

/// A tradable symbol with its static reference data.
///
/// Instruments are immutable: the catalog is compiled in, loaded once, and
/// never mutated at runtime.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instrument {
    /// Unique symbol, also the lookup key (e.g. "QQQ", "XAU-USD")
    pub symbol: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Asset classification
    pub class: AssetClass,
    /// Native quote currency (ISO 4217)
    pub currency: &'static str,
}

impl Instrument {
    /// Whether this instrument is a metal spot price.
    pub fn is_metal(&self) -> bool {
        self.class == AssetClass::Metal
    }
}
