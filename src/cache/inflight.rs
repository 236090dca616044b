//! In-flight request deduplication.
//!
//! Concurrent identical requests are coalesced into one network call: the
//! first caller for a key becomes the leader and everyone else gets a
//! waiter handle that observes the exact result of that single call. The
//! ticket is removed when the request settles, success or failure,
//! regardless of how many callers are waiting.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use tokio::sync::watch;

use crate::models::Quote;

/// Registry of requests currently on the wire, keyed by method + URL.
pub struct InflightMap {
    pending: Mutex<HashMap<String, watch::Receiver<Option<Quote>>>>,
}

/// Role assigned to a caller joining a key.
pub enum Flight<'a> {
    /// This caller performs the request and settles the ticket.
    Leader(Ticket<'a>),
    /// Another caller is already on the wire; await its outcome.
    Waiter(Waiter),
}

/// The leader's handle. Settling publishes the result to all waiters;
/// dropping (settled or not) retires the key.
pub struct Ticket<'a> {
    map: &'a InflightMap,
    key: String,
    tx: watch::Sender<Option<Quote>>,
}

/// A waiter's handle on an in-flight request.
pub struct Waiter {
    rx: watch::Receiver<Option<Quote>>,
}

impl InflightMap {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<String, watch::Receiver<Option<Quote>>>> {
        self.pending.lock().unwrap_or_else(|poisoned| {
            warn!("Inflight map mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Join a key, becoming leader if nothing is on the wire for it.
    pub fn join(&self, key: &str) -> Flight<'_> {
        let mut pending = self.lock_pending();

        if let Some(rx) = pending.get(key) {
            debug!("Inflight: joining pending request for {}", key);
            return Flight::Waiter(Waiter { rx: rx.clone() });
        }

        let (tx, rx) = watch::channel(None);
        pending.insert(key.to_string(), rx);
        Flight::Leader(Ticket {
            map: self,
            key: key.to_string(),
            tx,
        })
    }

    /// Number of requests currently on the wire.
    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    fn retire(&self, key: &str) {
        self.lock_pending().remove(key);
    }
}

impl Default for InflightMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticket<'_> {
    /// Publish the settled result to every waiter.
    pub fn settle(&self, quote: &Quote) {
        let _ = self.tx.send(Some(quote.clone()));
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.map.retire(&self.key);
    }
}

impl Waiter {
    /// Wait for the leader's result.
    ///
    /// Returns `None` only if the leader went away without settling (e.g.
    /// its task was dropped); callers then fall back through their own
    /// degradation path instead of retrying the network.
    pub async fn outcome(mut self) -> Option<Quote> {
        loop {
            if let Some(quote) = self.rx.borrow().clone() {
                return Some(quote);
            }
            if self.rx.changed().await.is_err() {
                // Sender dropped; pick up a value settled right before.
                return self.rx.borrow().clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provenance;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn quote() -> Quote {
        Quote::from_observation(
            "XAU-USD",
            dec!(2650.10),
            dec!(2641.00),
            "USD",
            Utc::now(),
            Provenance::Live,
        )
    }

    #[test]
    fn test_first_joiner_leads_others_wait() {
        let map = InflightMap::new();

        let first = map.join("GET https://example/chart/QQQ");
        assert!(matches!(first, Flight::Leader(_)));
        assert_eq!(map.pending_count(), 1);

        let second = map.join("GET https://example/chart/QQQ");
        assert!(matches!(second, Flight::Waiter(_)));

        // Different key is independent.
        let other = map.join("GET https://example/chart/SPY");
        assert!(matches!(other, Flight::Leader(_)));
        assert_eq!(map.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_waiters_observe_settled_result() {
        let map = InflightMap::new();

        let leader = match map.join("k") {
            Flight::Leader(t) => t,
            Flight::Waiter(_) => panic!("expected leader"),
        };
        let waiter = match map.join("k") {
            Flight::Waiter(w) => w,
            Flight::Leader(_) => panic!("expected waiter"),
        };

        let expected = quote();
        let handle = tokio::spawn(waiter.outcome());

        leader.settle(&expected);
        drop(leader);

        let observed = handle.await.unwrap().unwrap();
        assert_eq!(observed.price, expected.price);
        assert_eq!(map.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_leader_wakes_waiters_empty_handed() {
        let map = InflightMap::new();

        let leader = match map.join("k") {
            Flight::Leader(t) => t,
            Flight::Waiter(_) => panic!("expected leader"),
        };
        let waiter = match map.join("k") {
            Flight::Waiter(w) => w,
            Flight::Leader(_) => panic!("expected waiter"),
        };

        drop(leader);
        assert!(waiter.outcome().await.is_none());
        assert_eq!(map.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_key_is_retired_even_after_settle() {
        let map = InflightMap::new();
        {
            let leader = match map.join("k") {
                Flight::Leader(t) => t,
                Flight::Waiter(_) => panic!("expected leader"),
            };
            leader.settle(&quote());
        }
        // Next joiner becomes a fresh leader, not a waiter on a stale slot.
        assert!(matches!(map.join("k"), Flight::Leader(_)));
    }
}
