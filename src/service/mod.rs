//! Quote retrieval orchestration.
//!
//! [`QuoteService`] owns the whole fetch pipeline: cache lookup, in-flight
//! deduplication, relay-wrapped transport with failure rotation, provider
//! normalization, and the degradation chain. Callers only ever see a
//! [`Quote`] whose provenance tag says which path produced it; the single
//! error that escapes the public API is [`QuoteError::UnsupportedInstrument`]
//! for symbols outside the catalog.

mod synthetic;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::cache::{CachedValue, Flight, InflightMap, ResponseCache};
use crate::catalog;
use crate::config::ServiceConfig;
use crate::errors::{FallbackClass, QuoteError};
use crate::models::{HistoryPoint, Instrument, Provenance, QuoteParams, Quote};
use crate::provider::{default_providers, QuoteProvider};
use crate::relay::{RelayPool, RelayTransport};
use crate::store::{SessionStore, UiStore};

/// Degradation sequence for latest quotes. Order matters; the chain must
/// end in a step that always yields.
const FALLBACK_CHAIN: &[FallbackStep] = &[
    FallbackStep::Live,
    FallbackStep::StaticTable,
    FallbackStep::Simulated,
];

#[derive(Clone, Copy, Debug)]
enum FallbackStep {
    /// Fetch through the relay pool and normalize.
    Live,
    /// Bundled last-known-good table.
    StaticTable,
    /// Generated plausible value.
    Simulated,
}

/// Request fingerprint used for cache keys.
fn fingerprint(provider_id: &str, symbol: &str, params: &QuoteParams) -> String {
    format!("{}:{}:{}", provider_id, symbol, params.fingerprint())
}

/// Outcome of a connectivity probe.
#[derive(Clone, Copy, Debug)]
pub struct Health {
    /// A provider endpoint answered a direct request.
    pub provider_ok: bool,
    /// The currently selected relay passed a wrapped request through.
    pub relay_ok: bool,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.provider_ok && self.relay_ok
    }
}

/// The quote retrieval service.
///
/// One instance is shared process-wide; all interior state (cache, relay
/// counters, pacing slot, in-flight registry) is synchronized internally,
/// so `&self` methods can be called from any number of tasks.
pub struct QuoteService {
    pool: RelayPool,
    cache: ResponseCache,
    inflight: InflightMap,
    transport: Arc<dyn RelayTransport>,
    providers: Vec<Arc<dyn QuoteProvider>>,
    ui: Arc<dyn UiStore>,
    /// Earliest instant the next upstream request may depart.
    next_slot: Mutex<Option<Instant>>,
    request_interval: Duration,
    health_timeout: Duration,
}

impl QuoteService {
    /// Build a service from configuration and host-owned collaborators.
    pub fn new(
        config: &ServiceConfig,
        transport: Arc<dyn RelayTransport>,
        session: Arc<dyn SessionStore>,
        ui: Arc<dyn UiStore>,
    ) -> Self {
        Self {
            pool: RelayPool::new(config.relay_endpoints()),
            cache: ResponseCache::new(session),
            inflight: InflightMap::new(),
            transport,
            providers: default_providers(),
            ui,
            next_slot: Mutex::new(None),
            request_interval: config.request_interval,
            health_timeout: config.health_timeout,
        }
    }

    /// Fetch the latest quote for a symbol.
    ///
    /// Fresh cache entries are returned with provenance `cached` without
    /// touching the network. Concurrent calls for the same request share a
    /// single network fetch. Transient failures degrade through the static
    /// table and synthetic generation; the only error a caller can see is
    /// an unknown symbol.
    pub async fn fetch(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let instrument = catalog::require(symbol)?;
        let provider = self.provider_for(instrument)?;
        let params = QuoteParams::Latest;
        let cache_key = fingerprint(provider.id(), instrument.symbol, &params);

        if let Some(mut quote) = self.cache.get_quote(&cache_key) {
            debug!(symbol, "serving quote from cache");
            quote.provenance = Provenance::Cached;
            return Ok(quote);
        }

        let upstream_url = provider.quote_url(instrument, &params);
        let inflight_key = format!("GET {}", upstream_url);

        match self.inflight.join(&inflight_key) {
            Flight::Waiter(waiter) => {
                if let Some(quote) = waiter.outcome().await {
                    return Ok(quote);
                }
                // Leader vanished without settling; resolve independently.
                Ok(self
                    .resolve(instrument, provider, &params, &cache_key, &upstream_url)
                    .await)
            }
            Flight::Leader(ticket) => {
                let quote = self
                    .resolve(instrument, provider, &params, &cache_key, &upstream_url)
                    .await;
                ticket.settle(&quote);
                Ok(quote)
            }
        }
    }

    /// Fetch a batch of symbols sequentially, reporting progress.
    ///
    /// Each completed quote is published to the UI store under
    /// `quotes.<symbol>` and `market.loading` brackets the whole batch.
    /// Unknown symbols are skipped with a warning rather than aborting the
    /// rest of the batch. The callback receives (completed, total, symbol)
    /// after each fetch.
    pub async fn fetch_many<F>(&self, symbols: &[&str], mut on_progress: F) -> HashMap<String, Quote>
    where
        F: FnMut(usize, usize, &str),
    {
        let total = symbols.len();
        let mut quotes = HashMap::with_capacity(total);
        self.ui.set_state("market.loading", json!(true));

        for (completed, &symbol) in symbols.iter().enumerate() {
            match self.fetch(symbol).await {
                Ok(quote) => {
                    self.publish_quote(&quote);
                    quotes.insert(quote.symbol.clone(), quote);
                }
                Err(error) => {
                    warn!(symbol, %error, "skipping symbol in batch");
                }
            }
            on_progress(completed + 1, total, symbol);
        }

        self.ui.set_state("market.loading", json!(false));
        info!(fetched = quotes.len(), total, "batch fetch complete");
        quotes
    }

    /// Fetch a historical price series for a symbol.
    ///
    /// Series are cached with their own, longer TTL. Spot metals have no
    /// chart endpoint; their history is proxied through the gold future.
    /// Total failure yields an empty series, not an error.
    pub async fn history(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<HistoryPoint>, QuoteError> {
        let mut instrument = catalog::require(symbol)?;
        if instrument.is_metal() {
            instrument = catalog::require("GC=F")?;
        }
        let provider = self.provider_for(instrument)?;
        let params = QuoteParams::range(interval.to_string(), range.to_string());
        let cache_key = fingerprint(provider.id(), instrument.symbol, &params);

        if let Some(points) = self.cache.get_history(&cache_key) {
            debug!(symbol, "serving history from cache");
            return Ok(points);
        }

        let upstream_url = provider.quote_url(instrument, &params);
        let timeout = provider.request_timeout(&params);
        match self
            .through_relays(&upstream_url, timeout, |raw| provider.normalize_history(raw))
            .await
        {
            Ok(points) => {
                self.cache.set(
                    &cache_key,
                    CachedValue::History(points.clone()),
                    provider.cache_ttl(&params),
                );
                Ok(points)
            }
            Err(error) => {
                warn!(symbol, %error, "history fetch failed, returning empty series");
                Ok(Vec::new())
            }
        }
    }

    /// Probe provider and relay connectivity.
    ///
    /// Two cheap GETs with a short timeout: one straight at a provider, one
    /// wrapped through the currently selected relay. If both fail the UI is
    /// told the market data sources are unreachable.
    pub async fn health_check(&self) -> Health {
        let provider_ok = match self.probe_target("XAU-USD") {
            Some(url) => self.transport.get(&url, self.health_timeout).await.is_ok(),
            None => false,
        };

        let relay_ok = match self.probe_target("SPY") {
            Some(url) => {
                let wrapped = self.pool.current().endpoint.wrap(&url);
                self.transport.get(&wrapped, self.health_timeout).await.is_ok()
            }
            None => false,
        };

        let health = Health {
            provider_ok,
            relay_ok,
        };
        if !health.provider_ok && !health.relay_ok {
            warn!("health check failed on both probes");
            self.ui
                .set_state("market.error", json!("market data sources unreachable"));
        } else {
            debug!(provider_ok, relay_ok, "health check complete");
        }
        health
    }

    /// Drop cached responses whose key contains the pattern, or all of them.
    pub fn clear_cache(&self, pattern: Option<&str>) {
        self.cache.clear(pattern);
    }

    fn probe_target(&self, symbol: &str) -> Option<String> {
        let instrument = catalog::lookup(symbol)?;
        let provider = self.provider_for(instrument).ok()?;
        Some(provider.quote_url(instrument, &QuoteParams::Latest))
    }

    fn publish_quote(&self, quote: &Quote) {
        match serde_json::to_value(quote) {
            Ok(value) => self.ui.set_state(&format!("quotes.{}", quote.symbol), value),
            Err(error) => warn!(symbol = %quote.symbol, %error, "failed to publish quote state"),
        }
    }

    fn provider_for(&self, instrument: &Instrument) -> Result<&dyn QuoteProvider, QuoteError> {
        self.providers
            .iter()
            .find(|p| p.supports(instrument))
            .map(|p| p.as_ref())
            .ok_or_else(|| QuoteError::UnsupportedInstrument(instrument.symbol.to_string()))
    }

    /// Walk the degradation chain until a step yields a quote.
    async fn resolve(
        &self,
        instrument: &Instrument,
        provider: &dyn QuoteProvider,
        params: &QuoteParams,
        cache_key: &str,
        upstream_url: &str,
    ) -> Quote {
        for step in FALLBACK_CHAIN {
            let quote = match step {
                FallbackStep::Live => {
                    let timeout = provider.request_timeout(params);
                    match self
                        .through_relays(upstream_url, timeout, |raw| {
                            provider.normalize(raw, instrument)
                        })
                        .await
                    {
                        Ok(quote) => {
                            self.cache.set(
                                cache_key,
                                CachedValue::Quote(quote.clone()),
                                provider.cache_ttl(params),
                            );
                            Some(quote)
                        }
                        Err(error) => {
                            warn!(symbol = instrument.symbol, %error, "live fetch failed, degrading");
                            None
                        }
                    }
                }
                FallbackStep::StaticTable => catalog::fallback_for(instrument.symbol).map(|entry| {
                    debug!(symbol = instrument.symbol, "serving bundled static quote");
                    entry.to_quote(instrument)
                }),
                FallbackStep::Simulated => {
                    info!(symbol = instrument.symbol, "generating synthetic quote");
                    Some(synthetic::quote_for(instrument))
                }
            };
            if let Some(quote) = quote {
                return quote;
            }
        }
        // Unreachable while the chain ends in Simulated.
        synthetic::quote_for(instrument)
    }

    /// Issue one upstream request through the relay pool, rotating on
    /// relay-attributable failures until every endpoint has had one try.
    async fn through_relays<T>(
        &self,
        upstream_url: &str,
        timeout: Duration,
        normalize: impl Fn(&Value) -> Result<T, QuoteError>,
    ) -> Result<T, QuoteError> {
        let attempts = self.pool.len();
        let mut last_error = None;

        for attempt in 0..attempts {
            self.pace().await;
            let selection = self.pool.current();
            let wrapped = selection.endpoint.wrap(upstream_url);

            let outcome = match self.transport.get(&wrapped, timeout).await {
                Ok(body) => selection.endpoint.shape.decode(&body).and_then(|raw| normalize(&raw)),
                Err(error) => Err(error),
            };

            match outcome {
                Ok(value) => {
                    self.pool.record_success(selection.index);
                    return Ok(value);
                }
                Err(error) => match error.fallback_class() {
                    FallbackClass::NextRelay => {
                        warn!(
                            relay = %selection.endpoint.base,
                            attempt = attempt + 1,
                            attempts,
                            %error,
                            "relay attempt failed"
                        );
                        self.pool.record_failure(selection.index);
                        last_error = Some(error);
                    }
                    _ => {
                        // The relay did its job; the failure is upstream.
                        self.pool.record_success(selection.index);
                        return Err(error);
                    }
                },
            }
        }

        Err(last_error.unwrap_or_else(|| QuoteError::RelayUnreachable {
            relay: "(none)".to_string(),
            message: "no relay endpoints configured".to_string(),
        }))
    }

    fn lock_next_slot(&self) -> MutexGuard<'_, Option<Instant>> {
        self.next_slot.lock().unwrap_or_else(|poisoned| {
            warn!("Pacing mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Reserve the next departure slot, then wait for it.
    ///
    /// The slot is advanced under the lock so concurrent callers queue up
    /// at interval spacing; the wait itself happens outside the lock.
    async fn pace(&self) {
        let depart = {
            let mut slot = self.lock_next_slot();
            let now = Instant::now();
            let depart = match *slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *slot = Some(depart + self.request_interval);
            depart
        };
        sleep_until(depart).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::config::RelayEndpointConfig;
    use crate::relay::RelayShape;
    use crate::store::{MemorySessionStore, MemoryUiStore, NullUiStore};

    /// Transport double that replays scripted responses and records every
    /// requested URL and departure time.
    struct ScriptedTransport {
        calls: StdMutex<Vec<String>>,
        times: StdMutex<Vec<Instant>>,
        responses: StdMutex<VecDeque<Result<String, QuoteError>>>,
        delay: Duration,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<String, QuoteError>>) -> Self {
            Self {
                calls: StdMutex::new(Vec::new()),
                times: StdMutex::new(Vec::new()),
                responses: StdMutex::new(responses.into()),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn times(&self) -> Vec<Instant> {
            self.times.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RelayTransport for ScriptedTransport {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<String, QuoteError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.times.lock().unwrap().push(Instant::now());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
                Err(QuoteError::RelayUnreachable {
                    relay: url.to_string(),
                    message: "script exhausted".to_string(),
                })
            })
        }
    }

    fn unreachable_response() -> Result<String, QuoteError> {
        Err(QuoteError::RelayUnreachable {
            relay: "scripted".to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn gold_body() -> String {
        r#"{"items": [{"curr": "USD", "xauPrice": 2650.10, "chgXau": 9.10, "xauClose": 2641.00}]}"#
            .to_string()
    }

    fn chart_body() -> String {
        r#"{"chart": {"result": [{
            "meta": {
                "currency": "USD",
                "regularMarketPrice": 530.00,
                "chartPreviousClose": 525.00
            },
            "timestamp": [1735500000, 1735503600],
            "indicators": {"quote": [{"close": [528.0, 530.0]}]}
        }], "error": null}}"#
            .to_string()
    }

    struct Harness {
        service: QuoteService,
        transport: Arc<ScriptedTransport>,
        ui: Arc<MemoryUiStore>,
    }

    /// Four passthrough relays so scripted bodies decode directly; the
    /// enveloped double-parse path has its own test.
    fn test_relays() -> Vec<RelayEndpointConfig> {
        ["a", "b", "c", "d"]
            .iter()
            .map(|n| RelayEndpointConfig {
                base: format!("https://relay-{}.test/?u=", n),
                shape: RelayShape::Passthrough,
            })
            .collect()
    }

    fn harness(transport: ScriptedTransport) -> Harness {
        harness_with(test_relays(), transport)
    }

    fn harness_with(relays: Vec<RelayEndpointConfig>, transport: ScriptedTransport) -> Harness {
        let transport = Arc::new(transport);
        let ui = Arc::new(MemoryUiStore::new());
        let config = ServiceConfig {
            relays,
            request_interval: Duration::ZERO,
            ..ServiceConfig::default()
        };
        let service = QuoteService::new(
            &config,
            transport.clone() as Arc<dyn RelayTransport>,
            Arc::new(MemorySessionStore::new()),
            ui.clone() as Arc<dyn UiStore>,
        );
        Harness {
            service,
            transport,
            ui,
        }
    }

    #[tokio::test]
    async fn test_live_fetch_normalizes_and_caches() {
        let h = harness(ScriptedTransport::new(vec![Ok(gold_body())]));

        let quote = h.service.fetch("XAU-USD").await.unwrap();
        assert_eq!(quote.price, dec!(2650.10));
        assert_eq!(quote.provenance, Provenance::Live);

        // Second fetch is a cache hit, provenance flips, no second call.
        let again = h.service.fetch("XAU-USD").await.unwrap();
        assert_eq!(again.provenance, Provenance::Cached);
        assert_eq!(again.price, dec!(2650.10));
        assert_eq!(h.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_requests_are_relay_wrapped() {
        let h = harness(ScriptedTransport::new(vec![Ok(chart_body())]));

        h.service.fetch("QQQ").await.unwrap();
        let calls = h.transport.calls();
        assert_eq!(calls.len(), 1);
        // First endpoint in configured order, target percent-encoded.
        assert!(calls[0].starts_with("https://relay-a.test/?u=https%3A%2F%2F"));
        assert!(calls[0].contains("QQQ"));
    }

    #[tokio::test]
    async fn test_enveloped_relay_double_parse() {
        let body = json!({ "contents": gold_body(), "status": { "http_code": 200 } }).to_string();
        let h = harness_with(
            vec![RelayEndpointConfig {
                base: "https://relay-env.test/get?url=".to_string(),
                shape: RelayShape::Enveloped,
            }],
            ScriptedTransport::new(vec![Ok(body)]),
        );

        let quote = h.service.fetch("XAU-USD").await.unwrap();
        assert_eq!(quote.price, dec!(2650.10));
        assert_eq!(quote.provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn test_failover_rotates_to_next_relay() {
        let h = harness(ScriptedTransport::new(vec![
            unreachable_response(),
            Ok(chart_body()),
        ]));

        let quote = h.service.fetch("QQQ").await.unwrap();
        assert_eq!(quote.provenance, Provenance::Live);

        let calls = h.transport.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("https://relay-a.test/?u="));
        assert!(calls[1].starts_with("https://relay-b.test/?u="));
    }

    #[tokio::test]
    async fn test_exhausted_relays_degrade_to_static_table() {
        let h = harness(ScriptedTransport::new(vec![
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
        ]));

        let quote = h.service.fetch("QQQ").await.unwrap();
        assert_eq!(quote.provenance, Provenance::Static);
        assert_eq!(quote.price, dec!(522.35));
        assert_eq!(quote.previous_close, dec!(515.95));
        // Every configured relay got exactly one try.
        assert_eq!(h.transport.calls().len(), 4);
        // Degraded values are not cached; the next fetch tries live again.
        let again = h.service.fetch("QQQ").await.unwrap();
        assert_eq!(again.provenance, Provenance::Static);
    }

    #[tokio::test]
    async fn test_no_static_entry_falls_through_to_synthetic() {
        // Metals have no bundled table entry.
        let h = harness(ScriptedTransport::new(vec![
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
        ]));

        let quote = h.service.fetch("XAU-USD").await.unwrap();
        assert_eq!(quote.provenance, Provenance::Simulated);
        assert!(quote.price > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_provider_error_stops_relay_rotation() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}"#;
        let h = harness(ScriptedTransport::new(vec![Ok(body.to_string())]));

        // Provider-reported errors skip the remaining relays and degrade.
        let quote = h.service.fetch("QQQ").await.unwrap();
        assert_eq!(quote.provenance, Provenance::Static);
        assert_eq!(h.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_propagates() {
        let h = harness(ScriptedTransport::new(vec![]));
        let err = h.service.fetch("BOGUS").await.unwrap_err();
        assert!(matches!(err, QuoteError::UnsupportedInstrument(s) if s == "BOGUS"));
        assert!(h.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_network_call() {
        let transport =
            ScriptedTransport::new(vec![Ok(gold_body())]).with_delay(Duration::from_millis(20));
        let h = harness(transport);

        let (a, b) = tokio::join!(h.service.fetch("XAU-USD"), h.service.fetch("XAU-USD"));
        let a = a.unwrap();
        let b = b.unwrap();

        assert_eq!(h.transport.calls().len(), 1);
        assert_eq!(a.price, b.price);
        assert_eq!(a.price, dec!(2650.10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_paced_at_the_configured_interval() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(gold_body()),
            Ok(chart_body()),
        ]));
        let config = ServiceConfig {
            relays: test_relays(),
            request_interval: Duration::from_millis(100),
            ..ServiceConfig::default()
        };
        let service = QuoteService::new(
            &config,
            transport.clone() as Arc<dyn RelayTransport>,
            Arc::new(MemorySessionStore::new()),
            Arc::new(NullUiStore),
        );

        service.fetch("XAU-USD").await.unwrap();
        service.fetch("QQQ").await.unwrap();

        let times = transport.times();
        assert_eq!(times.len(), 2);
        // Different symbols, different relays notwithstanding: no two
        // upstream requests depart closer than the pacing interval.
        assert!(times[1] - times[0] >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_relay_retries_are_paced_too() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            unreachable_response(),
            Ok(gold_body()),
        ]));
        let config = ServiceConfig {
            relays: test_relays(),
            request_interval: Duration::from_millis(100),
            ..ServiceConfig::default()
        };
        let service = QuoteService::new(
            &config,
            transport.clone() as Arc<dyn RelayTransport>,
            Arc::new(MemorySessionStore::new()),
            Arc::new(NullUiStore),
        );

        service.fetch("XAU-USD").await.unwrap();

        let times = transport.times();
        assert_eq!(times.len(), 2);
        assert!(times[1] - times[0] >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_fetch_many_reports_progress_and_publishes_state() {
        let h = harness(ScriptedTransport::new(vec![
            Ok(chart_body()),
            Ok(gold_body()),
        ]));

        let mut progress = Vec::new();
        let quotes = h
            .service
            .fetch_many(&["QQQ", "BOGUS", "XAU-USD"], |done, total, symbol| {
                progress.push((done, total, symbol.to_string()));
            })
            .await;

        // Unknown symbol skipped, the rest fetched.
        assert_eq!(quotes.len(), 2);
        assert!(quotes.contains_key("QQQ"));
        assert!(quotes.contains_key("XAU-USD"));

        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0], (1, 3, "QQQ".to_string()));
        assert_eq!(progress[2], (3, 3, "XAU-USD".to_string()));

        assert_eq!(h.ui.get("market.loading"), Some(json!(false)));
        let published: Quote =
            serde_json::from_value(h.ui.get("quotes.QQQ").unwrap()).unwrap();
        assert_eq!(published.price, dec!(530.00));
        assert_eq!(published.provenance, Provenance::Live);
    }

    #[tokio::test]
    async fn test_history_caches_series() {
        let h = harness(ScriptedTransport::new(vec![Ok(chart_body())]));

        let points = h.service.history("QQQ", "1h", "5d").await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].price, dec!(530.0));
        assert!(h.transport.calls()[0].contains("interval%3D1h"));

        // Cached on the second read.
        let again = h.service.history("QQQ", "1h", "5d").await.unwrap();
        assert_eq!(again, points);
        assert_eq!(h.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_history_failure_yields_empty_series() {
        let h = harness(ScriptedTransport::new(vec![
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
            unreachable_response(),
        ]));

        let points = h.service.history("QQQ", "1d", "1mo").await.unwrap();
        assert!(points.is_empty());
    }

    #[tokio::test]
    async fn test_metal_history_goes_through_gold_future() {
        let h = harness(ScriptedTransport::new(vec![Ok(chart_body())]));

        h.service.history("XAU-USD", "1h", "5d").await.unwrap();
        let calls = h.transport.calls();
        // Spot gold has no chart endpoint; the series comes from GC=F.
        assert!(calls[0].contains("GC%253DF"));
    }

    #[tokio::test]
    async fn test_health_check_reports_both_probes() {
        let h = harness(ScriptedTransport::new(vec![
            Ok(gold_body()),
            Ok(chart_body()),
        ]));

        let health = h.service.health_check().await;
        assert!(health.is_healthy());

        let calls = h.transport.calls();
        assert_eq!(calls.len(), 2);
        // Provider probe is direct, relay probe is wrapped.
        assert!(calls[0].starts_with("https://data-asg.goldprice.org/"));
        assert!(calls[1].starts_with("https://relay-a.test/?u="));
        assert!(h.ui.get("market.error").is_none());
    }

    #[tokio::test]
    async fn test_health_check_double_failure_sets_error_state() {
        let h = harness(ScriptedTransport::new(vec![
            unreachable_response(),
            unreachable_response(),
        ]));

        let health = h.service.health_check().await;
        assert!(!health.provider_ok);
        assert!(!health.relay_ok);
        assert_eq!(
            h.ui.get("market.error"),
            Some(json!("market data sources unreachable"))
        );
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let h = harness(ScriptedTransport::new(vec![
            Ok(gold_body()),
            Ok(gold_body()),
        ]));

        h.service.fetch("XAU-USD").await.unwrap();
        h.service.clear_cache(None);

        let quote = h.service.fetch("XAU-USD").await.unwrap();
        assert_eq!(quote.provenance, Provenance::Live);
        assert_eq!(h.transport.calls().len(), 2);
    }
}
