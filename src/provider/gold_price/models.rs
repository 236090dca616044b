//! Payload models for the goldprice.org dbXRates endpoint.

use serde::Deserialize;

/// Top-level response: `{ "ts": ..., "items": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct GoldPriceResponse {
    #[serde(default)]
    pub items: Vec<GoldPriceItem>,
}

/// One rate item. Only the gold (XAU) fields matter here; the endpoint
/// also carries silver fields on the same object.
#[derive(Debug, Deserialize)]
pub struct GoldPriceItem {
    /// Current gold price per troy ounce in the requested currency
    #[serde(rename = "xauPrice")]
    pub xau_price: f64,

    /// Day change in price units
    #[serde(rename = "chgXau", default)]
    pub chg_xau: f64,

    // The payload also reports pcXau (day change in percent); it is left
    // out here because the percent is always recomputed from price and
    // previous close.
    /// Previous session close, absent on some snapshots
    #[serde(rename = "xauClose", default)]
    pub xau_close: Option<f64>,

    /// Currency the rates are denominated in
    #[serde(rename = "curr", default)]
    pub curr: Option<String>,
}
