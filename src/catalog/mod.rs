//! Static instrument catalog.
//!
//! Reference data for every symbol the service knows how to fetch: metals,
//! indices, single equities, ETFs, and futures. Loaded once at startup and
//! never mutated. Requests for symbols outside the catalog fail with
//! [`QuoteError::UnsupportedInstrument`], the one error that propagates to
//! callers.

mod fallback;

pub use fallback::{fallback_for, StaticQuote};

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::errors::QuoteError;
use crate::models::{AssetClass, Instrument};

macro_rules! instrument {
    ($symbol:literal, $name:literal, $class:ident, $currency:literal) => {
        Instrument {
            symbol: $symbol,
            name: $name,
            class: AssetClass::$class,
            currency: $currency,
        }
    };
}

/// Every instrument the service supports.
pub const CATALOG: &[Instrument] = &[
    // Metals (goldprice.org spot rates)
    instrument!("XAU-USD", "Gold Spot (USD)", Metal, "USD"),
    instrument!("XAU-CNY", "Gold Spot (CNY)", Metal, "CNY"),
    // Major indices
    instrument!("^GSPC", "S&P 500", Index, "USD"),
    instrument!("^IXIC", "Nasdaq Composite", Index, "USD"),
    instrument!("^VIX", "CBOE Volatility Index", Index, "USD"),
    instrument!("^HSI", "Hang Seng Index", Index, "HKD"),
    instrument!("000001.SS", "SSE Composite", Index, "CNY"),
    // Futures
    instrument!("GC=F", "Gold Futures", Future, "USD"),
    instrument!("CL=F", "WTI Crude Oil Futures", Future, "USD"),
    // Tech equities
    instrument!("QQQ", "Invesco QQQ Trust", Etf, "USD"),
    instrument!("TEM", "Tempus AI", Equity, "USD"),
    instrument!("CRDO", "Credo Technology", Equity, "USD"),
    instrument!("COIN", "Coinbase", Equity, "USD"),
    instrument!("PLTR", "Palantir", Equity, "USD"),
    instrument!("CRWV", "CoreWeave", Equity, "USD"),
    instrument!("TSM", "Taiwan Semiconductor", Equity, "USD"),
    instrument!("ORCL", "Oracle", Equity, "USD"),
    instrument!("FIG", "Figma", Equity, "USD"),
    instrument!("MELI", "MercadoLibre", Equity, "USD"),
    instrument!("RBLX", "Roblox", Equity, "USD"),
    instrument!("COUR", "Coursera", Equity, "USD"),
    instrument!("SPOT", "Spotify Technology", Equity, "USD"),
    instrument!("NFLX", "Netflix", Equity, "USD"),
    instrument!("DUOL", "Duolingo", Equity, "USD"),
    instrument!("NIO", "NIO", Equity, "USD"),
    instrument!("LI", "Li Auto", Equity, "USD"),
    instrument!("NVDA", "NVIDIA", Equity, "USD"),
    instrument!("PYPL", "PayPal", Equity, "USD"),
    instrument!("DIS", "Walt Disney", Equity, "USD"),
    instrument!("AMD", "Advanced Micro Devices", Equity, "USD"),
    instrument!("INTC", "Intel", Equity, "USD"),
    instrument!("FUTU", "Futu Holdings", Equity, "USD"),
    instrument!("AAPL", "Apple", Equity, "USD"),
    instrument!("BABA", "Alibaba", Equity, "USD"),
    instrument!("PDD", "PDD Holdings", Equity, "USD"),
    // ETFs and inverse products
    instrument!("VOO", "Vanguard S&P 500 ETF", Etf, "USD"),
    instrument!("AVGO", "Broadcom", Equity, "USD"),
    instrument!("PSQ", "ProShares Short QQQ", Etf, "USD"),
    instrument!("SH", "ProShares Short S&P 500", Etf, "USD"),
    instrument!("SPY", "SPDR S&P 500 ETF", Etf, "USD"),
    instrument!("IVV", "iShares Core S&P 500 ETF", Etf, "USD"),
    instrument!("VXX", "iPath S&P 500 VIX Futures ETN", Etf, "USD"),
    instrument!("QID", "ProShares UltraShort QQQ", Etf, "USD"),
    instrument!("SQQQ", "ProShares UltraPro Short QQQ", Etf, "USD"),
    // Other
    instrument!("NOC", "Northrop Grumman", Equity, "USD"),
    instrument!("LMT", "Lockheed Martin", Equity, "USD"),
    instrument!("OXY", "Occidental Petroleum", Equity, "USD"),
    instrument!("SLMT", "Brera Holdings", Equity, "USD"),
    instrument!("NTDOY", "Nintendo (ADR)", Equity, "USD"),
    instrument!("DJT", "Trump Media & Technology", Equity, "USD"),
    instrument!("SE", "Sea Limited", Equity, "USD"),
];

lazy_static! {
    static ref BY_SYMBOL: HashMap<&'static str, &'static Instrument> =
        CATALOG.iter().map(|i| (i.symbol, i)).collect();
}

/// Look up an instrument by symbol.
pub fn lookup(symbol: &str) -> Option<&'static Instrument> {
    BY_SYMBOL.get(symbol).copied()
}

/// Look up an instrument, failing with `UnsupportedInstrument`.
pub fn require(symbol: &str) -> Result<&'static Instrument, QuoteError> {
    lookup(symbol).ok_or_else(|| QuoteError::UnsupportedInstrument(symbol.to_string()))
}
