//! Gold price provider backed by goldprice.org dbXRates.
//!
//! Serves spot metal instruments (XAU-USD, XAU-CNY). The endpoint has no
//! historical mode; gold history goes through the chart provider via the
//! GC=F future instead.

mod models;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::errors::QuoteError;
use crate::models::{Instrument, Provenance, QuoteParams, Quote};
use crate::provider::traits::decimal_field;
use crate::provider::QuoteProvider;

use models::GoldPriceResponse;

/// Provider ID constant
pub const PROVIDER_ID: &str = "GOLD_PRICE";

const BASE_URL: &str = "https://data-asg.goldprice.org/dbXRates";

/// goldprice.org spot rate provider.
pub struct GoldPriceProvider;

impl QuoteProvider for GoldPriceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supports(&self, instrument: &Instrument) -> bool {
        instrument.is_metal()
    }

    fn quote_url(&self, instrument: &Instrument, _params: &QuoteParams) -> String {
        // One endpoint per currency; the instrument's native currency picks it.
        format!("{}/{}", BASE_URL, instrument.currency)
    }

    fn normalize(&self, raw: &Value, instrument: &Instrument) -> Result<Quote, QuoteError> {
        let payload: GoldPriceResponse =
            serde_json::from_value(raw.clone()).map_err(|e| QuoteError::MalformedPayload {
                detail: format!("gold payload: {}", e),
            })?;

        let item = payload
            .items
            .first()
            .ok_or_else(|| QuoteError::MalformedPayload {
                detail: "gold payload has no items".to_string(),
            })?;

        let price = decimal_field(item.xau_price, "xauPrice")?;
        if price <= Decimal::ZERO {
            return Err(QuoteError::MalformedPayload {
                detail: format!("non-positive gold price: {}", item.xau_price),
            });
        }

        let change = decimal_field(item.chg_xau, "chgXau")?;
        let previous_close = match item.xau_close {
            Some(close) if close > 0.0 => decimal_field(close, "xauClose")?,
            _ => price - change,
        };

        if let Some(curr) = &item.curr {
            if curr != instrument.currency {
                debug!(
                    expected = instrument.currency,
                    reported = %curr,
                    "gold payload currency differs from instrument"
                );
            }
        }

        // The endpoint carries no intraday range; estimate it from the
        // day's move so the UI sparkline has something to scale against.
        let half_move = change.abs() * Decimal::new(5, 1);

        Ok(Quote::from_observation(
            instrument.symbol,
            price,
            previous_close,
            instrument.currency,
            Utc::now(),
            Provenance::Live,
        )
        .with_range(price + half_move, price - half_move))
    }
}
