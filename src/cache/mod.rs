//! Short-TTL response cache with session persistence.
//!
//! One process-wide cache memoizes every successful fetch by request
//! fingerprint (provider + instrument + parameters). Expiry is lazy: a
//! stale entry is treated as a miss and removed by the read that finds it,
//! there is no background sweep. The whole map is written through to a
//! [`SessionStore`] on every write and rehydrated at startup so a page
//! reload within the same session starts warm. The in-memory map stays
//! authoritative; storage failures only cost durability.

mod inflight;

pub use inflight::{Flight, InflightMap, Ticket, Waiter};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{HistoryPoint, Quote};
use crate::store::{SessionStore, StorageError};

/// Session storage key holding the persisted cache map.
pub const SESSION_KEY: &str = "goldpulse.quote_cache";

/// A cached value: either a normalized quote or a history series.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CachedValue {
    Quote(Quote),
    History(Vec<HistoryPoint>),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: CachedValue,
    created_at: DateTime<Utc>,
    ttl_ms: i64,
}

impl CacheEntry {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_milliseconds() > self.ttl_ms
    }
}

/// Process-wide response cache, shared by all callers.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn SessionStore>,
}

impl ResponseCache {
    /// Create a cache backed by the given session store, rehydrating any
    /// persisted entries that have not yet expired.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let mut entries = HashMap::new();

        if let Some(persisted) = store.get(SESSION_KEY) {
            match serde_json::from_str::<HashMap<String, CacheEntry>>(&persisted) {
                Ok(loaded) => {
                    let now = Utc::now();
                    let total = loaded.len();
                    entries.extend(loaded.into_iter().filter(|(_, e)| !e.is_expired_at(now)));
                    debug!(
                        "Response cache: rehydrated {} of {} persisted entries",
                        entries.len(),
                        total
                    );
                }
                Err(e) => warn!("Response cache: discarding unreadable persisted cache: {}", e),
            }
        }

        Self {
            entries: Mutex::new(entries),
            store,
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Response cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a value, removing it if its TTL has elapsed.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.is_expired_at(Utc::now()) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Look up a cached quote.
    pub fn get_quote(&self, key: &str) -> Option<Quote> {
        match self.get(key) {
            Some(CachedValue::Quote(quote)) => Some(quote),
            _ => None,
        }
    }

    /// Look up a cached history series.
    pub fn get_history(&self, key: &str) -> Option<Vec<HistoryPoint>> {
        match self.get(key) {
            Some(CachedValue::History(points)) => Some(points),
            _ => None,
        }
    }

    /// Store a value under a request fingerprint, superseding any previous
    /// entry, and write the map through to session storage.
    pub fn set(&self, key: &str, value: CachedValue, ttl: Duration) {
        let mut entries = self.lock_entries();
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: Utc::now(),
                ttl_ms: ttl.as_millis() as i64,
            },
        );
        self.persist(&mut entries);
    }

    /// Remove entries whose key contains the pattern, or everything when no
    /// pattern is given.
    pub fn clear(&self, pattern: Option<&str>) {
        let mut entries = self.lock_entries();
        match pattern {
            Some(p) => entries.retain(|key, _| !key.contains(p)),
            None => entries.clear(),
        }
        self.persist(&mut entries);
    }

    /// Number of entries currently held (expired ones included until read).
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the map through to session storage. On quota exhaustion the
    /// oldest entries are evicted first and the write is retried; any other
    /// backend failure is logged and ignored, the in-memory map remains
    /// authoritative.
    fn persist(&self, entries: &mut HashMap<String, CacheEntry>) {
        loop {
            let serialized = match serde_json::to_string(&*entries) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Response cache: failed to serialize for persistence: {}", e);
                    return;
                }
            };

            match self.store.set(SESSION_KEY, &serialized) {
                Ok(()) => return,
                Err(StorageError::QuotaExceeded) => {
                    let oldest = entries
                        .iter()
                        .min_by_key(|(_, e)| e.created_at)
                        .map(|(k, _)| k.clone());
                    match oldest {
                        Some(key) => {
                            warn!("Response cache: storage quota hit, evicting oldest entry {}", key);
                            entries.remove(&key);
                        }
                        None => {
                            self.store.remove(SESSION_KEY);
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("Response cache: persistence failed: {}", e);
                    return;
                }
            }
        }
    }

    /// Shift an entry's creation time into the past (test hook).
    #[cfg(test)]
    fn backdate(&self, key: &str, by_ms: i64) {
        let mut entries = self.lock_entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.created_at -= chrono::Duration::milliseconds(by_ms);
        }
    }
}
