//! Synthetic quote generation.
//!
//! Last resort of the degradation chain: when live fetching failed and the
//! instrument has no bundled fallback value, the UI still gets a plausible
//! quote rather than a hole. The `simulated` provenance tag is the only
//! thing that distinguishes these values from real ones, so it must never
//! be lost downstream.

use chrono::Utc;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::models::{Instrument, Provenance, Quote};

fn dec2(value: f64) -> Decimal {
    // Inputs come from bounded rng ranges, always representable.
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

/// Generate a plausible synthetic quote for an instrument.
///
/// Price lands in a believable mid-range band with a modest day move; the
/// intraday range is price plus/minus two percent, matching the other
/// degraded paths.
pub(super) fn quote_for(instrument: &Instrument) -> Quote {
    let mut rng = rand::thread_rng();
    let price = dec2(rng.gen_range(100.0..300.0));
    let change = dec2(rng.gen_range(-5.0..5.0));
    let two_percent = price * Decimal::new(2, 2);

    Quote::from_observation(
        instrument.symbol,
        price,
        price - change,
        instrument.currency,
        Utc::now(),
        Provenance::Simulated,
    )
    .with_range(price + two_percent, price - two_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rust_decimal_macros::dec;

    #[test]
    fn test_synthetic_quote_is_internally_consistent() {
        let instrument = catalog::lookup("XAU-USD").unwrap();

        for _ in 0..100 {
            let quote = quote_for(instrument);
            assert_eq!(quote.provenance, Provenance::Simulated);
            assert!(quote.price >= dec!(100) && quote.price < dec!(300));
            assert!(quote.previous_close > Decimal::ZERO);
            assert_eq!(quote.change, quote.price - quote.previous_close);
            assert!(quote.change.abs() <= dec!(5));
            assert!(quote.day_high > quote.day_low);
            assert_eq!(quote.currency, instrument.currency);
        }
    }
}
