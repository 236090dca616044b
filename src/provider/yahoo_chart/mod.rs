//! Yahoo finance chart provider.
//!
//! Serves everything that is not a spot metal: indices, single equities,
//! ETFs, and futures, through the public v8 chart endpoint. Latest quotes
//! use a one-day window; historical series pass the interval/range through.

mod models;

use chrono::{TimeZone, Utc};
use serde_json::Value;
use tracing::warn;
use urlencoding::encode;

use crate::errors::QuoteError;
use crate::models::{HistoryPoint, Instrument, Provenance, QuoteParams, Quote};
use crate::provider::traits::decimal_field;
use crate::provider::QuoteProvider;

use models::ChartResponse;

/// Provider ID constant
pub const PROVIDER_ID: &str = "YAHOO_CHART";

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo v8 chart provider.
pub struct YahooChartProvider;

impl YahooChartProvider {
    fn parse(&self, raw: &Value) -> Result<models::ChartResult, QuoteError> {
        let payload: ChartResponse =
            serde_json::from_value(raw.clone()).map_err(|e| QuoteError::MalformedPayload {
                detail: format!("chart payload: {}", e),
            })?;

        if let Some(error) = payload.chart.error {
            return Err(QuoteError::ProviderReportedError {
                provider: PROVIDER_ID.to_string(),
                message: error
                    .description
                    .or(error.code)
                    .unwrap_or_else(|| "unspecified chart error".to_string()),
            });
        }

        payload
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| QuoteError::MalformedPayload {
                detail: "missing chart result".to_string(),
            })
    }
}

impl QuoteProvider for YahooChartProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supports(&self, instrument: &Instrument) -> bool {
        !instrument.is_metal()
    }

    fn quote_url(&self, instrument: &Instrument, params: &QuoteParams) -> String {
        let (interval, range) = match params {
            QuoteParams::Latest => ("1d", "1d"),
            QuoteParams::Range { interval, range } => (interval.as_ref(), range.as_ref()),
        };
        format!(
            "{}/{}?interval={}&range={}",
            BASE_URL,
            encode(instrument.symbol),
            interval,
            range
        )
    }

    fn normalize(&self, raw: &Value, instrument: &Instrument) -> Result<Quote, QuoteError> {
        let result = self.parse(raw)?;
        let meta = result.meta;

        let price = decimal_field(meta.regular_market_price, "regularMarketPrice")?;
        let previous_close = meta
            .chart_previous_close
            .or(meta.previous_close)
            .ok_or_else(|| QuoteError::MalformedPayload {
                detail: "missing previous close".to_string(),
            })
            .and_then(|c| decimal_field(c, "chartPreviousClose"))?;

        // Index and futures metas frequently omit the range; default to the
        // price itself rather than inventing one.
        let day_high = match meta.regular_market_day_high {
            Some(h) => decimal_field(h, "regularMarketDayHigh")?,
            None => price,
        };
        let day_low = match meta.regular_market_day_low {
            Some(l) => decimal_field(l, "regularMarketDayLow")?,
            None => price,
        };

        let mut quote = Quote::from_observation(
            instrument.symbol,
            price,
            previous_close,
            meta.currency.as_deref().unwrap_or(instrument.currency),
            Utc::now(),
            Provenance::Live,
        )
        .with_range(day_high, day_low);

        if let Some(volume) = meta.regular_market_volume {
            if volume > 0.0 {
                quote = quote.with_volume(decimal_field(volume, "regularMarketVolume")?);
            }
        }

        Ok(quote)
    }

    fn normalize_history(&self, raw: &Value) -> Result<Vec<HistoryPoint>, QuoteError> {
        let result = self.parse(raw)?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .map(|i| i.quote)
            .and_then(|mut quotes| {
                if quotes.is_empty() {
                    None
                } else {
                    Some(quotes.remove(0).close)
                }
            })
            .unwrap_or_default();

        let mut points = Vec::with_capacity(timestamps.len());
        for (ts, close) in timestamps.into_iter().zip(closes) {
            let Some(close) = close else { continue };
            let Some(timestamp) = Utc.timestamp_opt(ts, 0).single() else {
                warn!(ts, "skipping history bar with invalid timestamp");
                continue;
            };
            points.push(HistoryPoint {
                timestamp,
                price: decimal_field(close, "close")?,
            });
        }
        Ok(points)
    }
}
