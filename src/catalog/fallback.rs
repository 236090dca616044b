//! Bundled last-known-good values.
//!
//! When every live path fails, instruments present in this table resolve to
//! their last bundled observation with provenance `static`. The values are
//! refreshed by hand when the table is rebuilt; they are plausible, not
//! accurate, which is the whole point of the `static` provenance tag.

use std::collections::HashMap;

use chrono::Utc;
use lazy_static::lazy_static;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::models::{Instrument, Provenance, Quote};

/// A last-known-good observation bundled into the binary.
#[derive(Clone, Copy, Debug)]
pub struct StaticQuote {
    /// Instrument symbol
    pub symbol: &'static str,
    /// Last known price
    pub price: f64,
    /// Last known day change
    pub change: f64,
    /// Last known previous close
    pub prev_close: f64,
}

const TABLE: &[StaticQuote] = &[
    StaticQuote { symbol: "QQQ", price: 522.35, change: 1.24, prev_close: 515.95 },
    StaticQuote { symbol: "TEM", price: 58.42, change: -2.15, prev_close: 59.70 },
    StaticQuote { symbol: "CRDO", price: 78.25, change: 3.42, prev_close: 75.66 },
    StaticQuote { symbol: "COIN", price: 245.80, change: 5.67, prev_close: 232.60 },
    StaticQuote { symbol: "PLTR", price: 98.45, change: 2.34, prev_close: 96.20 },
    StaticQuote { symbol: "CRWV", price: 156.30, change: -1.25, prev_close: 158.28 },
    StaticQuote { symbol: "TSM", price: 198.50, change: 1.89, prev_close: 194.82 },
    StaticQuote { symbol: "ORCL", price: 187.25, change: 0.75, prev_close: 185.86 },
    StaticQuote { symbol: "FIG", price: 45.60, change: 0.00, prev_close: 45.60 },
    StaticQuote { symbol: "MELI", price: 2156.80, change: 12.45, prev_close: 2144.35 },
    StaticQuote { symbol: "RBLX", price: 78.95, change: -3.21, prev_close: 81.57 },
    StaticQuote { symbol: "COUR", price: 12.45, change: 0.85, prev_close: 12.35 },
    StaticQuote { symbol: "SPOT", price: 625.40, change: 8.92, prev_close: 573.20 },
    StaticQuote { symbol: "NFLX", price: 985.60, change: 15.30, prev_close: 854.88 },
    StaticQuote { symbol: "DUOL", price: 425.80, change: 6.75, prev_close: 398.88 },
    StaticQuote { symbol: "NIO", price: 4.85, change: -0.25, prev_close: 4.65 },
    StaticQuote { symbol: "LI", price: 28.45, change: 1.20, prev_close: 28.12 },
    StaticQuote { symbol: "NVDA", price: 148.25, change: 4.56, prev_close: 141.95 },
    StaticQuote { symbol: "PYPL", price: 78.60, change: -1.25, prev_close: 79.60 },
    StaticQuote { symbol: "DIS", price: 118.45, change: 2.10, prev_close: 116.01 },
    StaticQuote { symbol: "AMD", price: 128.90, change: 3.45, prev_close: 124.60 },
    StaticQuote { symbol: "INTC", price: 25.40, change: -0.85, prev_close: 25.62 },
    StaticQuote { symbol: "FUTU", price: 98.75, change: 2.85, prev_close: 96.02 },
    StaticQuote { symbol: "AAPL", price: 245.80, change: 3.25, prev_close: 238.03 },
    StaticQuote { symbol: "BABA", price: 138.50, change: 4.20, prev_close: 132.99 },
    StaticQuote { symbol: "PDD", price: 125.60, change: -2.15, prev_close: 128.36 },
    StaticQuote { symbol: "VOO", price: 565.80, change: 1.85, prev_close: 555.53 },
    StaticQuote { symbol: "AVGO", price: 245.60, change: 3.25, prev_close: 237.83 },
    StaticQuote { symbol: "^VIX", price: 18.45, change: -5.25, prev_close: 19.47 },
    StaticQuote { symbol: "PSQ", price: 52.35, change: -1.25, prev_close: 53.01 },
    StaticQuote { symbol: "SH", price: 12.85, change: -0.45, prev_close: 12.91 },
    StaticQuote { symbol: "SPY", price: 595.25, change: 1.95, prev_close: 583.83 },
    StaticQuote { symbol: "IVV", price: 598.40, change: 1.88, prev_close: 587.38 },
    StaticQuote { symbol: "^GSPC", price: 5958.25, change: 0.78, prev_close: 5912.20 },
    StaticQuote { symbol: "VXX", price: 58.25, change: -2.15, prev_close: 59.53 },
    StaticQuote { symbol: "QID", price: 28.45, change: -2.50, prev_close: 29.18 },
    StaticQuote { symbol: "SQQQ", price: 32.85, change: -3.75, prev_close: 34.13 },
    StaticQuote { symbol: "^IXIC", price: 19245.80, change: 1.04, prev_close: 19047.40 },
    StaticQuote { symbol: "CL=F", price: 72.85, change: 1.25, prev_close: 71.95 },
    StaticQuote { symbol: "NOC", price: 485.60, change: 2.85, prev_close: 472.15 },
    StaticQuote { symbol: "LMT", price: 625.40, change: 3.25, prev_close: 605.72 },
    StaticQuote { symbol: "OXY", price: 52.85, change: 1.45, prev_close: 52.10 },
    StaticQuote { symbol: "SLMT", price: 12.45, change: 0.00, prev_close: 12.45 },
    StaticQuote { symbol: "NTDOY", price: 18.25, change: 0.85, prev_close: 18.10 },
    StaticQuote { symbol: "DJT", price: 25.60, change: -1.25, prev_close: 25.92 },
    StaticQuote { symbol: "SE", price: 125.80, change: 4.25, prev_close: 120.67 },
];

lazy_static! {
    static ref BY_SYMBOL: HashMap<&'static str, &'static StaticQuote> =
        TABLE.iter().map(|s| (s.symbol, s)).collect();
}

/// Look up the bundled fallback entry for a symbol.
pub fn fallback_for(symbol: &str) -> Option<&'static StaticQuote> {
    BY_SYMBOL.get(symbol).copied()
}

fn dec(value: f64) -> Decimal {
    // Table values are compile-time constants, always representable.
    // Shortest round-trip keeps 522.35 exactly 522.35.
    Decimal::from_f64(value).unwrap_or_default()
}

impl StaticQuote {
    /// Materialize this entry as a quote with provenance `static`.
    ///
    /// The table carries no intraday range, so high/low are estimated at
    /// price plus/minus two percent, matching what the UI expects from a
    /// degraded value.
    pub fn to_quote(&self, instrument: &Instrument) -> Quote {
        let price = dec(self.price);
        let two_percent = price * dec(0.02);

        Quote::from_observation(
            instrument.symbol,
            price,
            dec(self.prev_close),
            instrument.currency,
            Utc::now(),
            Provenance::Static,
        )
        .with_range(price + two_percent, price - two_percent)
    }
}
