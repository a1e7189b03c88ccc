//! In-process memoization used by the client for lookups and fetched tables.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct StoredEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> StoredEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }
}

/// Keyed map with an optional time-to-live, shareable across tasks.
///
/// `ttl: None` keeps entries for the lifetime of the owner. Writes follow a
/// first-writer-wins discipline: once a fresh value sits under a key,
/// concurrent writers adopt it instead of replacing it, so a key is only ever
/// filled once per TTL window.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, StoredEntry<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the fresh value under `key`, removing it first if it expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if !self.expired(entry) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` and returns the value that won the slot.
    ///
    /// When another task has already stored a fresh value for the same key,
    /// that value is returned and `value` is discarded; an expired occupant
    /// is replaced.
    pub async fn insert(&self, key: K, value: V) -> V {
        let mut entries = self.entries.lock().await;
        match entries.entry(key) {
            Entry::Occupied(mut slot) => {
                if self.expired(slot.get()) {
                    slot.insert(StoredEntry::new(value.clone()));
                    value
                } else {
                    slot.get().value.clone()
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredEntry::new(value.clone()));
                value
            }
        }
    }

    fn expired(&self, entry: &StoredEntry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.stored_at.elapsed() > ttl,
            None => false,
        }
    }
}
