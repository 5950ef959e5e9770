//! In-memory TTL cache backed by `DashMap`, with single-flight computation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::TopTradersError;

/// A single cached value with the time it was stored and how long it lives.
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.stored_at + self.ttl <= now
    }
}

type FlightSlot<V> = Option<Result<V, TopTradersError>>;

/// Thread-safe in-memory cache with per-entry time-to-live.
///
/// Expired entries are lazily evicted on the next lookup of that key; there
/// is no background sweep. [`TtlCache::get_or_compute`] deduplicates
/// concurrent misses: while one computation for a key is running, every
/// other caller for that key waits for its result instead of starting
/// another. Cloning the cache yields another handle to the same storage.
pub struct TtlCache<V> {
    entries: Arc<DashMap<String, CacheEntry<V>>>,
    in_flight: Arc<DashMap<String, watch::Receiver<FlightSlot<V>>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or `None` if missing or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            drop(entry);
            self.entries
                .remove_if(key, |_, e| e.is_expired(Instant::now()));
            return None;
        }
        Some(entry.value.clone())
    }

    /// Inserts or overwrites a cache entry that expires after `ttl`.
    pub fn set(&self, key: String, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// The computation runs on its own task, so it completes and populates
    /// the cache even if every caller stops waiting. Errors are delivered to
    /// all waiters and are not cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<V, TopTradersError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, TopTradersError>> + Send + 'static,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        let mut rx = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(flight) => {
                tracing::debug!(key, "joining in-flight computation");
                flight.get().clone()
            }
            Entry::Vacant(slot) => {
                // A flight that finished between the first lookup and taking
                // this slot has already stored its value.
                if let Some(value) = self.get(key) {
                    return Ok(value);
                }
                tracing::debug!(key, "cache miss, computing");
                let (tx, rx) = watch::channel(None);
                slot.insert(rx.clone());
                self.spawn_flight(key.to_string(), ttl, compute(), tx, rx.clone());
                rx
            }
        };

        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(slot) => (*slot).clone(),
            Err(_) => None,
        };
        outcome.unwrap_or_else(|| {
            Err(TopTradersError::UpstreamUnavailable(format!(
                "computation for '{}' was aborted",
                key
            )))
        })
    }

    fn spawn_flight<Fut>(
        &self,
        key: String,
        ttl: Duration,
        fut: Fut,
        tx: watch::Sender<FlightSlot<V>>,
        rx: watch::Receiver<FlightSlot<V>>,
    ) where
        Fut: Future<Output = Result<V, TopTradersError>> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        let guard = FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
            rx,
        };
        tokio::spawn(async move {
            let result = fut.await;
            if let Ok(value) = &result {
                entries.insert(
                    guard.key.clone(),
                    CacheEntry {
                        value: value.clone(),
                        stored_at: Instant::now(),
                        ttl,
                    },
                );
            }
            let _ = tx.send(Some(result));
            drop(guard);
        });
    }

    /// Drops the entry for `key`, if any.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries from the cache. Running computations still store
    /// their result when they finish.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Unregisters a flight when its task ends, including by panic.
struct FlightGuard<V> {
    in_flight: Arc<DashMap<String, watch::Receiver<FlightSlot<V>>>>,
    key: String,
    rx: watch::Receiver<FlightSlot<V>>,
}

impl<V> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(&self.key, |_, rx| rx.same_channel(&self.rx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn cache_set_and_get() {
        let cache = TtlCache::new();
        cache.set("key1".to_string(), "value1".to_string(), Duration::from_secs(60));
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
    }

    #[test]
    fn cache_miss() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn cache_overwrite() {
        let cache = TtlCache::new();
        cache.set("key1".to_string(), "old".to_string(), Duration::from_secs(60));
        cache.set("key1".to_string(), "new".to_string(), Duration::from_secs(60));
        assert_eq!(cache.get("key1"), Some("new".to_string()));
    }

    #[test]
    fn cache_clear() {
        let cache = TtlCache::new();
        cache.set("a".to_string(), 1, Duration::from_secs(60));
        cache.set("b".to_string(), 2, Duration::from_secs(60));
        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_invalidate_single_key() {
        let cache = TtlCache::new();
        cache.set("a".to_string(), 1, Duration::from_secs(60));
        cache.set("b".to_string(), 2, Duration::from_secs(60));
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cache_expires_at_ttl_boundary() {
        let cache = TtlCache::new();
        cache.set("key1".to_string(), 7u32, Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("key1"), Some(7));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("key1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_removed_on_access() {
        let cache = TtlCache::new();
        cache.set("short".to_string(), 1u32, Duration::from_secs(1));
        cache.set("long".to_string(), 2u32, Duration::from_secs(600));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn get_or_compute_caches_value() {
        let cache = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let value = cache
                .get_or_compute("k", Duration::from_secs(300), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42u64)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn get_or_compute_recomputes_after_expiry() {
        let cache = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let compute = |calls: Arc<AtomicUsize>| {
            move || async move { Ok(calls.fetch_add(1, Ordering::SeqCst)) }
        };

        let first = cache
            .get_or_compute("k", Duration::from_secs(10), compute(Arc::clone(&calls)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        let second = cache
            .get_or_compute("k", Duration::from_secs(10), compute(Arc::clone(&calls)))
            .await
            .unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_computation() {
        let cache = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let callers = (0..16).map(|_| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_compute("shared", Duration::from_secs(300), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        Ok(vec!["row".to_string()])
                    })
                    .await
            }
        });
        let results = futures::future::join_all(callers).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for result in results {
            assert_eq!(result.unwrap(), vec!["row".to_string()]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_compute_independently() {
        let cache = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let callers = ["a", "b", "a", "b"].into_iter().map(|key| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_compute(key, Duration::from_secs(300), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(key.len())
                    })
                    .await
            }
        });
        futures::future::join_all(callers).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_reach_every_waiter_and_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let callers = (0..4).map(|_| {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_compute("flaky", Duration::from_secs(300), move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Err(TopTradersError::UpstreamUnavailable("down".to_string()))
                    })
                    .await
            }
        });
        for result in futures::future::join_all(callers).await {
            assert_eq!(
                result,
                Err(TopTradersError::UpstreamUnavailable("down".to_string()))
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());

        let value = cache
            .get_or_compute("flaky", Duration::from_secs(300), || async { Ok(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_caller_still_populates_cache() {
        let cache = TtlCache::new();

        let pending = cache.get_or_compute("slow", Duration::from_secs(300), || async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok("done".to_string())
        });
        let gave_up = tokio::time::timeout(Duration::from_millis(100), pending).await;
        assert!(gave_up.is_err());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(cache.get("slow"), Some("done".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_computation_releases_waiters() {
        let cache: TtlCache<u32> = TtlCache::new();

        let result = cache
            .get_or_compute("boom", Duration::from_secs(300), || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if true {
                    panic!("compute failed");
                }
                Ok(1)
            })
            .await;
        assert!(matches!(result, Err(TopTradersError::UpstreamUnavailable(_))));

        let value = cache
            .get_or_compute("boom", Duration::from_secs(300), || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }
}
