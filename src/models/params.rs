use std::borrow::Cow;

/// Request parameters that are part of the cache fingerprint.
///
/// Latest-quote and historical-range requests hit the same chart endpoints
/// but cache and time out differently, so the parameters travel with every
/// fetch and contribute to the request key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QuoteParams {
    /// Latest quote (interval 1d, range 1d on chart providers)
    Latest,
    /// Historical series over an explicit interval/range pair
    Range {
        /// Bar interval (e.g. "1h", "1d")
        interval: Cow<'static, str>,
        /// Lookback window (e.g. "5d", "1mo")
        range: Cow<'static, str>,
    },
}

impl QuoteParams {
    /// Historical-range parameters.
    pub fn range(interval: impl Into<Cow<'static, str>>, range: impl Into<Cow<'static, str>>) -> Self {
        Self::Range {
            interval: interval.into(),
            range: range.into(),
        }
    }

    /// Whether this is a historical-range request.
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    /// Stable fragment used inside request fingerprints.
    pub fn fingerprint(&self) -> String {
        match self {
            Self::Latest => "latest".to_string(),
            Self::Range { interval, range } => format!("{}:{}", interval, range),
        }
    }
}

impl Default for QuoteParams {
    fn default() -> Self {
        Self::Latest
    }
}
