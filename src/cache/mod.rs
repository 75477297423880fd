//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and
//! single-flight recomputation.

mod entry;
mod flight;
mod lru;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use entry::CacheEntry;
pub use flight::FlightResult;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl::TtlCache;

pub(crate) use ttl::CacheInner;
