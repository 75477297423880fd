//! Cache Statistics Module
//!
//! Tracks cumulative counters (hits, misses, evictions) and derives a
//! point-in-time snapshot of the entry population on demand.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time cache statistics.
///
/// The population fields (`size`, `valid_entries`, `expired_entries`) are
/// derived by scanning the store when `stats()` is called, never maintained
/// incrementally. `size` counts every physically present entry, including
/// expired ones that no sweep has reclaimed yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of physically present entries, expired included
    pub size: usize,
    /// Entries that are present and not expired
    pub valid_entries: usize,
    /// Entries that are expired but not yet swept
    pub expired_entries: usize,
    /// Configured capacity, if any
    pub max_entries: Option<usize>,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted under capacity pressure
    pub evictions: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stat Counters ==
/// Cumulative counters owned by the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct StatCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl StatCounters {
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
