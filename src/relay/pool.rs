//! Relay endpoint pool with failure-count rotation.
//!
//! Untrusted public relays fall over constantly, so the pool keeps a
//! per-endpoint consecutive-failure counter and always points at the
//! endpoint with the globally lowest count. This is a performance and
//! availability heuristic, not a circuit breaker: no endpoint is ever
//! removed and there are no cooldown timers.

use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use urlencoding::encode;

use super::shape::RelayShape;

/// Configuration for one relay endpoint.
#[derive(Clone, Debug)]
pub struct RelayEndpoint {
    /// Base URL prefix; the percent-encoded target URL is appended.
    pub base: String,
    /// How this relay wraps the upstream response.
    pub shape: RelayShape,
}

impl RelayEndpoint {
    pub fn new(base: impl Into<String>, shape: RelayShape) -> Self {
        Self {
            base: base.into(),
            shape,
        }
    }

    /// Wrap a target URL for transport through this relay.
    pub fn wrap(&self, target: &str) -> String {
        format!("{}{}", self.base, encode(target))
    }
}

/// A snapshot of the pool's current selection.
#[derive(Clone, Debug)]
pub struct RelaySelection {
    /// Index of the selected endpoint (stable across the pool's lifetime)
    pub index: usize,
    /// The endpoint configuration
    pub endpoint: RelayEndpoint,
}

struct PoolState {
    current: usize,
    failures: Vec<u32>,
}

/// Ordered pool of relay endpoints.
///
/// `record_failure` increments the failed endpoint's counter and reselects
/// the endpoint with the globally lowest count, ties broken by original
/// configuration order. A pool whose counters all reset therefore jumps
/// back to endpoint 0; this reselect-to-minimum behavior is intentional.
pub struct RelayPool {
    endpoints: Vec<RelayEndpoint>,
    state: Mutex<PoolState>,
}

impl RelayPool {
    /// Create a pool from configured endpoints, selecting the first.
    ///
    /// At least two endpoints are recommended for availability; a pool of
    /// one still works, it just has nowhere to rotate to.
    pub fn new(endpoints: Vec<RelayEndpoint>) -> Self {
        let failures = vec![0; endpoints.len()];
        Self {
            endpoints,
            state: Mutex::new(PoolState {
                current: 0,
                failures,
            }),
        }
    }

    /// Lock the pool state, recovering from poison if necessary.
    ///
    /// Worst case after recovery is a slightly stale failure count, which
    /// beats panicking inside the fetch path.
    fn lock_state(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Relay pool mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Number of configured endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Snapshot the currently selected endpoint.
    pub fn current(&self) -> RelaySelection {
        let state = self.lock_state();
        let index = state.current;
        RelaySelection {
            index,
            endpoint: self.endpoints[index].clone(),
        }
    }

    /// Record a failed request through the given endpoint, then reselect
    /// the endpoint with the lowest failure count.
    pub fn record_failure(&self, index: usize) {
        let mut state = self.lock_state();
        if index >= state.failures.len() {
            return;
        }

        state.failures[index] += 1;
        warn!(
            "Relay pool: endpoint {} ({}) failure count now {}",
            index, self.endpoints[index].base, state.failures[index]
        );

        // Selection must happen under the same lock as the increment so the
        // "check counts, pick minimum" step stays atomic.
        let mut best = state.current;
        let mut min_failures = u32::MAX;
        for (i, &count) in state.failures.iter().enumerate() {
            if count < min_failures {
                min_failures = count;
                best = i;
            }
        }

        if best != state.current {
            debug!(
                "Relay pool: switching from endpoint {} to {} ({})",
                state.current, best, self.endpoints[best].base
            );
        }
        state.current = best;
    }

    /// Record a successful request: resets only that endpoint's counter.
    pub fn record_success(&self, index: usize) {
        let mut state = self.lock_state();
        if index >= state.failures.len() {
            return;
        }
        if state.failures[index] != 0 {
            debug!("Relay pool: endpoint {} recovered, counter reset", index);
        }
        state.failures[index] = 0;
    }

    /// Current failure count for an endpoint (diagnostics).
    pub fn failure_count(&self, index: usize) -> u32 {
        self.lock_state().failures.get(index).copied().unwrap_or(0)
    }
}
