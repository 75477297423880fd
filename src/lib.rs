//! Flightcache - an in-process TTL/LRU cache with single-flight recomputation
//!
//! Bounds memory with least-recently-used eviction, expires entries by TTL,
//! and deduplicates concurrent recomputation so an expensive producer runs at
//! most once per key.

pub mod cache;
pub mod config;
pub mod error;

mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore, FlightResult, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
