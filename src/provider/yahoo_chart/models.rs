//! Payload models for the Yahoo v8 finance chart endpoint.

use serde::Deserialize;

/// Top-level response: `{ "chart": { "result": [...], "error": ... } }`.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Provider-reported error envelope (e.g. unknown symbol).
#[derive(Debug, Deserialize)]
pub struct ChartError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: f64,

    /// Previous close as seen by the chart range; the preferred field.
    #[serde(default)]
    pub chart_previous_close: Option<f64>,

    /// Plain previous close, present on some symbols when the chart field
    /// is not.
    #[serde(default)]
    pub previous_close: Option<f64>,

    #[serde(default)]
    pub regular_market_day_high: Option<f64>,

    #[serde(default)]
    pub regular_market_day_low: Option<f64>,

    #[serde(default)]
    pub regular_market_volume: Option<f64>,

    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<IndicatorQuote>,
}

/// Per-bar series; entries are null where the market had no trade.
#[derive(Debug, Deserialize)]
pub struct IndicatorQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}
