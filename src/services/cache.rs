//! Time-based query cache
//!
//! Entries are keyed by the query arguments and expire purely by elapsed
//! time. Nothing invalidates an entry on write, so a write made right after a
//! cache hit stays invisible to cached readers until the window runs out.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Cache whose entries live for a fixed window
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for a key, if any
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Return the cached value or compute, store, and return a new one
    ///
    /// Errors from `load` are passed through and never cached.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = load()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| entry.value.clone())
    }

    fn insert_at(&self, key: K, value: V, now: Instant) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < self.ttl);
            entries.insert(
                key,
                CacheEntry {
                    value,
                    stored_at: now,
                },
            );
        }
    }
}
