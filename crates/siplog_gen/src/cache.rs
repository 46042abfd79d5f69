//! Time-bounded result cache.
//!
//! Process-lifetime, unbounded, no persistence. Expiry is lazy: a dead entry
//! is ignored on `get` and overwritten by the next `put` for the same key;
//! nothing sweeps in the background. The wall clock is injected so tests can
//! drive expiry deterministically.
//!
//! Keys are SHA-256 over the namespace plus the canonical JSON serialization
//! of the input, so structurally identical inputs always collide on purpose
//! and nothing else realistically does.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Real wall clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at_ms: i64,
}

/// Keyed store with per-entry expiry.
///
/// Values go in and come out as copies; entries are never handed out by
/// reference. The internal lock is held only for map access, never across an
/// await point.
pub struct CacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    /// Store backed by the real wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Store with an injected clock, for deterministic expiry in tests.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Derive the cache key for `input` under `namespace`.
    ///
    /// Pure and deterministic: semantically equal inputs (same fields, same
    /// values, same order) always map to the same key. serde struct
    /// serialization has a fixed field order, so the JSON string is canonical
    /// for our input types.
    pub fn make_key<T: Serialize>(namespace: &str, input: &T) -> String {
        let canonical = serde_json::to_string(input).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update(b":");
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a live entry. Expired entries are treated as absent and
    /// removed on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().ok()?;
        let live = match entries.get(key) {
            Some(entry) if entry.expires_at_ms > now => entry.value.clone(),
            Some(_) => {
                entries.remove(key);
                return None;
            }
            None => return None,
        };
        drop(entries);
        serde_json::from_value(live).ok()
    }

    /// Insert or overwrite an entry that lives for `ttl_secs` from now.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl_secs: i64) {
        let Ok(value) = serde_json::to_value(value) else {
            tracing::debug!("cache put skipped: value not serializable");
            return;
        };
        let expires_at_ms = self.clock.now_ms() + ttl_secs * 1000;
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), CacheEntry { value, expires_at_ms });
        }
    }

    /// Number of entries currently held, live or not yet lazily evicted.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Manually advanced clock for expiry tests.
#[cfg(test)]
pub(crate) struct ManualClock(std::sync::atomic::AtomicI64);

#[cfg(test)]
impl ManualClock {
    pub(crate) fn at(ms: i64) -> Self {
        Self(std::sync::atomic::AtomicI64::new(ms))
    }

    pub(crate) fn advance_ms(&self, delta: i64) {
        self.0.fetch_add(delta, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}
