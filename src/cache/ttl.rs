//! TTL Cache Handle
//!
//! The public cache type. Wraps the synchronous `CacheStore` in interior
//! locking, owns the optional background sweep task, and adds the async
//! single-flight `get_or_compute` entry point.
//!
//! Locking discipline: the store lock is never held across an await point;
//! `get_or_compute` releases it before the producer runs, which is what makes
//! the flight map necessary.

use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::flight::{FlightMap, FlightResult, FlightTicket};
use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_cleanup_task;

// == Shared Internals ==
/// State shared between the handle and the background sweep task.
#[derive(Debug)]
pub(crate) struct CacheInner<K, V> {
    pub(crate) store: RwLock<CacheStore<K, V>>,
    pub(crate) flights: FlightMap<K, V>,
}

// == TTL Cache ==
/// In-process cache with TTL expiry, LRU eviction and single-flight
/// recomputation.
///
/// All operations except [`get_or_compute`](TtlCache::get_or_compute) are
/// synchronous and run to completion. The cache is `Send + Sync`; share it
/// across tasks behind an `Arc`.
///
/// If a `cleanup_interval` is configured, construction must happen inside a
/// tokio runtime so the sweep task can be spawned.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
    cleanup_handle: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache from the given configuration.
    ///
    /// Fails fast with `CacheError::InvalidConfig` on unusable parameters
    /// instead of clamping them. Starts the background sweep if
    /// `cleanup_interval` is set.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let inner = Arc::new(CacheInner {
            store: RwLock::new(CacheStore::new(&config)),
            flights: FlightMap::new(),
        });

        let cleanup_handle = config
            .cleanup_interval
            .map(|interval| spawn_cleanup_task(Arc::downgrade(&inner), interval));

        Ok(Self {
            inner,
            cleanup_handle: Mutex::new(cleanup_handle),
        })
    }

    // == Synchronous Operations ==
    /// Stores a key-value pair using the configured default TTL
    /// (never expires if no default is configured).
    pub fn set(&self, key: K, value: V) {
        self.write_store().set(key, value);
    }

    /// Stores a key-value pair with an explicit TTL.
    ///
    /// `Duration::ZERO` normalizes to "already expired".
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.write_store().set_with_ttl(key, value, ttl);
    }

    /// Returns the value for `key` if present and not expired.
    ///
    /// A hit refreshes the key's recency; an expired entry is reclaimed on
    /// contact and reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        self.write_store().get(key)
    }

    /// Checks whether `key` is present and not expired, without touching
    /// recency.
    pub fn has(&self, key: &K) -> bool {
        self.read_store().has(key)
    }

    /// Removes `key` regardless of expiry state; returns whether anything was
    /// removed.
    pub fn delete(&self, key: &K) -> bool {
        self.write_store().delete(key)
    }

    /// Removes all entries. The background sweep, if any, keeps running.
    pub fn clear(&self) {
        self.write_store().clear();
    }

    /// Extends the expiry of a present, still-valid entry. See
    /// [`CacheStore::refresh`].
    pub fn refresh(&self, key: &K, ttl: Option<Duration>) -> bool {
        self.write_store().refresh(key, ttl)
    }

    /// Stores many pairs with the default TTL, in input order.
    pub fn set_many(&self, pairs: Vec<(K, V)>) {
        self.write_store().set_many(pairs);
    }

    /// Retrieves many keys; the output preserves input order, with `None` for
    /// misses and expired entries.
    pub fn get_many(&self, keys: &[K]) -> Vec<Option<V>> {
        self.write_store().get_many(keys)
    }

    /// Removes every expired entry now; returns the count removed.
    pub fn cleanup(&self) -> usize {
        self.write_store().cleanup()
    }

    /// Snapshot of all currently-valid keys.
    pub fn keys(&self) -> Vec<K> {
        self.read_store().keys()
    }

    /// Snapshot of all currently-valid values.
    pub fn values(&self) -> Vec<V> {
        self.read_store().values()
    }

    /// Snapshot of all currently-valid key-value pairs.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.read_store().entries()
    }

    /// Invokes `f` for every currently-valid entry.
    pub fn for_each<F: FnMut(&K, &V)>(&self, f: F) {
        self.read_store().for_each(f);
    }

    /// Number of physically present entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    /// Returns true if the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }

    /// Computes current statistics by scanning the entry table.
    pub fn stats(&self) -> CacheStats {
        self.read_store().stats()
    }

    // == Get Or Compute ==
    /// Single-flight get-or-compute with the configured default TTL.
    ///
    /// See [`get_or_compute_with_ttl`](TtlCache::get_or_compute_with_ttl).
    pub async fn get_or_compute<F, Fut>(&self, key: K, producer: F) -> FlightResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        self.flight(key, None, producer).await
    }

    /// Single-flight get-or-compute with an explicit TTL for the computed
    /// value.
    ///
    /// Returns the cached value if present and valid. Otherwise the producer
    /// runs at most once per key concurrently: callers that arrive while a
    /// computation is in flight await its outcome instead of launching a
    /// second one. On success the value is cached and every caller receives
    /// it; on failure nothing is cached, every caller receives the same
    /// `Arc`-shared error, and the next call starts a fresh computation.
    pub async fn get_or_compute_with_ttl<F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        producer: F,
    ) -> FlightResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        self.flight(key, Some(ttl), producer).await
    }

    async fn flight<F, Fut>(&self, key: K, ttl: Option<Duration>, producer: F) -> FlightResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        let guard = loop {
            if let Some(value) = self.get(&key) {
                return Ok(value);
            }

            match self.inner.flights.join_or_lead(&key) {
                FlightTicket::Join(mut rx) => {
                    if let Ok(result) = rx.recv().await {
                        return result;
                    }
                    // The leader vanished without settling (its future was
                    // dropped); retry from the top.
                }
                FlightTicket::Lead(guard) => break guard,
            }
        };

        // Leadership won. A previous flight may have settled between our
        // store check and the flight-map lock, so look again before paying
        // for the producer.
        if let Some(value) = self.get(&key) {
            guard.complete(Ok(value.clone()));
            return Ok(value);
        }

        match producer().await {
            Ok(value) => {
                match ttl {
                    Some(ttl) => self.set_with_ttl(key, value.clone(), ttl),
                    None => self.set(key, value.clone()),
                }
                guard.complete(Ok(value.clone()));
                Ok(value)
            }
            Err(err) => {
                let err = Arc::new(err);
                guard.complete(Err(Arc::clone(&err)));
                Err(err)
            }
        }
    }

    // == Lock Helpers ==
    // A poisoned lock only means a panic happened mid-operation elsewhere;
    // the HashMap/VecDeque pair is still structurally sound, so keep serving.
    fn read_store(&self) -> RwLockReadGuard<'_, CacheStore<K, V>> {
        self.inner
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, CacheStore<K, V>> {
        self.inner
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> TtlCache<K, V> {
    // == Destroy ==
    /// Stops the background sweep task.
    ///
    /// Idempotent: further calls are no-ops. The entry table is untouched;
    /// entries remain queryable and removable, only the sweep stops. Also
    /// invoked from `Drop`, so an undestroyed cache cannot leak its task.
    pub fn destroy(&self) {
        if let Some(handle) = self.lock_handle().take() {
            handle.abort();
            debug!("Background cleanup task stopped");
        }
    }

    fn lock_handle(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.cleanup_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the background sweep task is currently attached.
    pub fn has_cleanup_task(&self) -> bool {
        self.lock_handle().is_some()
    }
}

impl<K, V> Drop for TtlCache<K, V> {
    fn drop(&mut self) {
        self.destroy();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn cache() -> TtlCache<String, u32> {
        TtlCache::new(CacheConfig::new()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result: Result<TtlCache<String, u32>> = TtlCache::new(CacheConfig::new().max_entries(0));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_handle_set_get_roundtrip() {
        let cache = cache();

        cache.set("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert!(cache.has(&"a".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_handle_without_sweep_has_no_task() {
        let cache = cache();
        assert!(!cache.has_cleanup_task());

        // destroy on a sweepless cache is a no-op
        cache.destroy();
        cache.destroy();
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let cache: TtlCache<String, u32> = TtlCache::new(
            CacheConfig::new().cleanup_interval(Duration::from_millis(10)),
        )
        .unwrap();

        assert!(cache.has_cleanup_task());

        cache.destroy();
        cache.destroy();

        assert!(!cache.has_cleanup_task());

        // Entries remain usable after destroy
        cache.set("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }

    #[tokio::test]
    async fn test_get_or_compute_miss_then_hit() {
        let cache = cache();

        let value = cache
            .get_or_compute("a".to_string(), || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);

        // Second call is a plain hit; a failing producer proves it never ran.
        let value = cache
            .get_or_compute("a".to_string(), || async {
                Err(anyhow::anyhow!("must not run"))
            })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_get_or_compute_with_ttl_expires() {
        let cache = cache();

        cache
            .get_or_compute_with_ttl("a".to_string(), Duration::from_millis(30), || async {
                Ok(7)
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get(&"a".to_string()), None);
    }
}
