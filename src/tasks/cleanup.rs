//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::{PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheInner;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for the configured interval between sweeps and holds only
/// a `Weak` reference to the cache internals, so it can never keep a dropped
/// cache alive: once the last handle is gone the task exits on its next tick.
/// The returned `JoinHandle` is owned by the cache and aborted by
/// `destroy()`. Tokio tasks do not block runtime shutdown, so an attached
/// sweep never delays process exit.
pub(crate) fn spawn_cleanup_task<K, V>(
    inner: Weak<CacheInner<K, V>>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(inner) = inner.upgrade() else {
                debug!("Cache dropped, TTL cleanup task exiting");
                break;
            };

            let removed = {
                let mut store = inner
                    .store
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                store.cleanup()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::TtlCache;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache: TtlCache<String, String> = TtlCache::new(
            CacheConfig::new().cleanup_interval(Duration::from_millis(20)),
        )
        .unwrap();

        cache.set_with_ttl(
            "expire_soon".to_string(),
            "value".to_string(),
            Duration::from_millis(20),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Physically removed, not just invisible
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache: TtlCache<String, String> = TtlCache::new(
            CacheConfig::new().cleanup_interval(Duration::from_millis(20)),
        )
        .unwrap();

        cache.set_with_ttl(
            "long_lived".to_string(),
            "value".to_string(),
            Duration::from_secs(3600),
        );

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get(&"long_lived".to_string()), Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_no_sweep_after_destroy() {
        let cache: TtlCache<String, String> = TtlCache::new(
            CacheConfig::new().cleanup_interval(Duration::from_millis(20)),
        )
        .unwrap();

        cache.destroy();

        cache.set_with_ttl(
            "expire_soon".to_string(),
            "value".to_string(),
            Duration::from_millis(20),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Expired and invisible to reads, but never physically swept
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"expire_soon".to_string()), None);
    }
}
