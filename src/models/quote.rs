use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a quote value was obtained.
///
/// Provenance always reflects the actual data path taken; it is never
/// defaulted to `live`. Degradation is visible to the UI only through this
/// tag, never as an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fresh network fetch, normalized from a provider payload
    Live,
    /// Served from the response cache within its TTL
    Cached,
    /// Bundled last-known-good value from the static fallback table
    Static,
    /// Synthetic plausible value generated after all other paths failed
    Simulated,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Cached => write!(f, "cached"),
            Self::Static => write!(f, "static"),
            Self::Simulated => write!(f, "simulated"),
        }
    }
}

/// A normalized price observation for one instrument.
///
/// `change` and `change_percent` are always derived from `price` and
/// `previous_close` at construction time and never set independently, so
/// they stay internally consistent regardless of what the provider payload
/// claimed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument symbol
    pub symbol: String,

    /// Latest observed price
    pub price: Decimal,

    /// Previous session close
    pub previous_close: Decimal,

    /// price - previous_close (derived)
    pub change: Decimal,

    /// change / previous_close * 100 (derived)
    pub change_percent: Decimal,

    /// Intraday high
    pub day_high: Decimal,

    /// Intraday low
    pub day_low: Decimal,

    /// Trading volume (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,

    /// Quote currency
    pub currency: String,

    /// When the observation was made
    pub observed_at: DateTime<Utc>,

    /// How the value was obtained
    pub provenance: Provenance,
}

impl Quote {
    /// Build a quote from a price observation, deriving change fields.
    ///
    /// Day high/low default to the price itself; use [`with_range`]
    /// (Self::with_range) when the payload carries them.
    pub fn from_observation(
        symbol: impl Into<String>,
        price: Decimal,
        previous_close: Decimal,
        currency: impl Into<String>,
        observed_at: DateTime<Utc>,
        provenance: Provenance,
    ) -> Self {
        let change = price - previous_close;
        let change_percent = if previous_close.is_zero() {
            Decimal::ZERO
        } else {
            change / previous_close * Decimal::ONE_HUNDRED
        };

        Self {
            symbol: symbol.into(),
            price,
            previous_close,
            change,
            change_percent,
            day_high: price,
            day_low: price,
            volume: None,
            currency: currency.into(),
            observed_at,
            provenance,
        }
    }

    /// Set the intraday range.
    pub fn with_range(mut self, day_high: Decimal, day_low: Decimal) -> Self {
        self.day_high = day_high;
        self.day_low = day_low;
        self
    }

    /// Set the trading volume.
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// One point of a historical price series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Observation timestamp
    pub timestamp: DateTime<Utc>,
    /// Closing price at that timestamp
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_change_fields_are_derived() {
        let quote = Quote::from_observation(
            "QQQ",
            dec!(522.35),
            dec!(515.95),
            "USD",
            Utc::now(),
            Provenance::Live,
        );

        assert_eq!(quote.change, dec!(6.40));
        let expected = dec!(6.40) / dec!(515.95) * dec!(100);
        assert_eq!(quote.change_percent, expected);
    }

    #[test]
    fn test_zero_previous_close_yields_zero_percent() {
        let quote = Quote::from_observation(
            "FIG",
            dec!(45.60),
            Decimal::ZERO,
            "USD",
            Utc::now(),
            Provenance::Live,
        );
        assert_eq!(quote.change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_range_defaults_to_price() {
        let quote = Quote::from_observation(
            "XAU-USD",
            dec!(2650.10),
            dec!(2641.00),
            "USD",
            Utc::now(),
            Provenance::Live,
        );
        assert_eq!(quote.day_high, dec!(2650.10));
        assert_eq!(quote.day_low, dec!(2650.10));
        assert!(quote.volume.is_none());
    }

    #[test]
    fn test_provenance_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provenance::Simulated).unwrap(),
            "\"simulated\""
        );
        assert_eq!(Provenance::Static.to_string(), "static");
    }
}
