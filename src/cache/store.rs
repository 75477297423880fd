//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration. Every operation here is synchronous and runs to completion;
//! the async coordination lives in the `TtlCache` handle.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::trace;

use crate::cache::stats::StatCounters;
use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::config::CacheConfig;

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
///
/// Recency policy: `set`, a `get` hit and a successful `refresh` move the key
/// to most-recently-used; `has` and iteration are pure reads and leave the
/// access order untouched.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Cumulative hit/miss/eviction counters
    counters: StatCounters,
    /// Maximum number of entries allowed, None = unbounded
    max_entries: Option<usize>,
    /// Default TTL for entries without an explicit TTL, None = never expires
    default_ttl: Option<Duration>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore from a validated configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: StatCounters::default(),
            max_entries: config.max_entries,
            default_ttl: config.default_ttl,
        }
    }

    // == Set ==
    /// Stores a key-value pair using the default TTL (never expires if no
    /// default is configured).
    ///
    /// If the key already exists, the value is overwritten and the TTL reset.
    /// If inserting a new key would exceed capacity, a victim is evicted
    /// first (see `make_room`).
    pub fn set(&mut self, key: K, value: V) {
        self.insert(key, value, self.default_ttl);
    }

    // == Set With TTL ==
    /// Stores a key-value pair with an explicit TTL.
    ///
    /// `Duration::ZERO` normalizes to "already expired": the entry is stored
    /// but immediately invisible to reads.
    pub fn set_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        self.insert(key, value, Some(ttl));
    }

    fn insert(&mut self, key: K, value: V, ttl: Option<Duration>) {
        // Overwriting an existing key does not change the count, so it never
        // triggers eviction.
        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite {
            self.make_room();
        }

        let entry = CacheEntry::new(value, ttl);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
    }

    // == Make Room ==
    /// Evicts one entry if inserting a new key would exceed capacity.
    ///
    /// Victim selection is deterministic: the least-recently-used *expired*
    /// entry if one exists (a free reclaim), otherwise the least-recently-used
    /// live entry.
    fn make_room(&mut self) {
        let Some(max) = self.max_entries else {
            return;
        };
        if self.entries.len() < max {
            return;
        }

        let expired_victim = self
            .lru
            .iter_oldest()
            .find(|key| {
                self.entries
                    .get(*key)
                    .map(|entry| entry.is_expired())
                    .unwrap_or(false)
            })
            .cloned();

        let victim = expired_victim.or_else(|| self.lru.peek_oldest().cloned());

        if let Some(victim) = victim {
            self.entries.remove(&victim);
            self.lru.remove(&victim);
            self.counters.record_eviction();
            trace!("evicted one entry under capacity pressure");
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired; a hit refreshes the key's
    /// recency. Expired entries are removed on contact and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.lru.remove(key);
                self.counters.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.counters.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Checks whether a key is present and not expired.
    ///
    /// Pure predicate: does not touch recency, does not remove the entry and
    /// does not count toward hits or misses, so existence probes cannot
    /// perturb eviction order.
    pub fn has(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    // == Delete ==
    /// Removes an entry by key regardless of its expiry state.
    ///
    /// Returns true if something was removed.
    pub fn delete(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Removes all entries. Counters are preserved.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Refresh ==
    /// Extends the expiry of a present, still-valid entry, measured from now.
    ///
    /// The new deadline is `ttl`, falling back to the default TTL, falling
    /// back to never-expires. Returns false for absent or already-expired
    /// keys; expired entries are never resurrected. A successful refresh
    /// counts as use for LRU purposes.
    pub fn refresh(&mut self, key: &K, ttl: Option<Duration>) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired() => {
                entry.extend(ttl.or(self.default_ttl));
                self.lru.touch(key);
                true
            }
            _ => false,
        }
    }

    // == Batch Set ==
    /// Stores many pairs with the default TTL, in input order.
    ///
    /// Each insertion applies the same eviction rules as `set`, so under
    /// capacity pressure earlier pairs of the batch may be evicted by later
    /// ones.
    pub fn set_many(&mut self, pairs: Vec<(K, V)>) {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }

    // == Batch Get ==
    /// Retrieves many keys, preserving input order in the output.
    ///
    /// Each position holds `Some(value)` or `None` with the exact semantics
    /// of `get` (including recency touch and miss accounting).
    pub fn get_many(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed. Purely a memory reclaim; reads
    /// already treat expired entries as absent.
    pub fn cleanup(&mut self) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        count
    }

    // == Iteration ==
    /// Returns a snapshot of all currently-valid keys.
    ///
    /// Expired entries are filtered out lazily; no prior sweep is required.
    /// Order is unspecified.
    pub fn keys(&self) -> Vec<K> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Returns a snapshot of all currently-valid values.
    pub fn values(&self) -> Vec<V> {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
            .collect()
    }

    /// Returns a snapshot of all currently-valid key-value pairs.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Invokes `f` for every currently-valid entry.
    pub fn for_each<F: FnMut(&K, &V)>(&self, mut f: F) {
        for (key, entry) in &self.entries {
            if !entry.is_expired() {
                f(key, &entry.value);
            }
        }
    }

    // == Stats ==
    /// Computes current cache statistics by scanning the entry table.
    pub fn stats(&self) -> CacheStats {
        let expired_entries = self
            .entries
            .values()
            .filter(|entry| entry.is_expired())
            .count();

        CacheStats {
            size: self.entries.len(),
            valid_entries: self.entries.len() - expired_entries,
            expired_entries,
            max_entries: self.max_entries,
            hits: self.counters.hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
        }
    }

    // == Length ==
    /// Returns the number of physically present entries, expired included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
