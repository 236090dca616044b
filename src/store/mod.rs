//! Collaborator-facing storage interfaces.
//!
//! The quote service talks to two host-owned stores through narrow traits:
//!
//! - [`SessionStore`]: key-scoped string storage used by the response cache
//!   for write-through persistence within a session. The in-memory map stays
//!   authoritative; this store is a durability aid only.
//! - [`UiStore`]: the observable state store the UI reads from. The service
//!   only ever publishes (`set_state`) quotes and loading/error flags; it
//!   never reads UI-owned state.
//!
//! In-memory implementations are provided for native hosts and tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::warn;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a session storage backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store is out of space. The cache reacts by evicting
    /// oldest entries and retrying the write.
    #[error("session storage quota exceeded")]
    QuotaExceeded,

    /// Any other backend failure. Treated as non-fatal by the cache.
    #[error("session storage backend: {0}")]
    Backend(String),
}

/// Key-scoped string storage with session lifetime.
pub trait SessionStore: Send + Sync {
    /// Read a stored value, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

/// Observable UI state store, consumed write-only.
pub trait UiStore: Send + Sync {
    /// Publish a value at a dot-separated state path.
    fn set_state(&self, path: &str, value: Value);
}

/// In-memory [`SessionStore`] with an optional byte quota.
///
/// The quota models the backing-store limit of a real session storage; when
/// the total stored bytes would exceed it, `set` fails with
/// [`StorageError::QuotaExceeded`] and leaves the previous value in place.
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    /// Create an unbounded in-memory store.
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    /// Create a store that rejects writes past a total byte budget.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn lock_values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| {
            warn!("Session store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.lock_values();

        if let Some(quota) = self.quota_bytes {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.lock_values().remove(key);
    }
}

/// In-memory [`UiStore`] that records published state for inspection.
pub struct MemoryUiStore {
    state: Mutex<HashMap<String, Value>>,
}

impl MemoryUiStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Read back a published value (test/diagnostic use).
    pub fn get(&self, path: &str) -> Option<Value> {
        self.lock_state().get(path).cloned()
    }

    fn lock_state(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("UI store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for MemoryUiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore for MemoryUiStore {
    fn set_state(&self, path: &str, value: Value) {
        self.lock_state().insert(path.to_string(), value);
    }
}

/// [`UiStore`] that discards all published state.
pub struct NullUiStore;

impl UiStore for NullUiStore {
    fn set_state(&self, _path: &str, _value: Value) {}
}
