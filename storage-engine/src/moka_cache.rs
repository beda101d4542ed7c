use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// A cached value stamped with the time it was stored
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.stored_at
    }

    /// Fresh iff `now - stored_at < ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        match TimeDelta::from_std(ttl) {
            Ok(ttl) => self.age() < ttl,
            Err(_) => true,
        }
    }

    /// Age rounded to whole minutes
    pub fn age_minutes(&self) -> i64 {
        let millis = self.age().num_milliseconds().max(0);
        (millis as f64 / 60_000.0).round() as i64
    }
}

/// Result of a cache lookup that may have loaded the value
#[derive(Clone, Debug)]
pub struct Cached<V> {
    pub entry: CacheEntry<V>,
    /// `false` only for the caller whose load populated the entry
    pub hit: bool,
}

/// Moka-backed TTL cache with single-flight loading.
///
/// Concurrent loads for the same key are coalesced into one call of the
/// loader; failed loads are handed to every waiter and never stored.
pub struct TtlCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an unbounded cache whose entries expire after `ttl`
    pub fn new_unbounded(name: &str, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().name(name).time_to_live(ttl).build(),
            ttl,
        }
    }

    /// Create a cache holding at most `max_entries`, evicting the least useful first
    pub fn new_bounded(name: &str, max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .name(name)
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Returns the entry only while it is fresh
    pub async fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        let entry = self.cache.get(key).await?;
        if entry.is_fresh(self.ttl) {
            Some(entry)
        } else {
            self.cache.invalidate(key).await;
            None
        }
    }

    /// Return the fresh entry for `key`, or run `fetch` to populate it.
    pub async fn get_or_try_fetch<F, E>(&self, key: K, fetch: F) -> Result<Cached<V>, Arc<E>>
    where
        F: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        if let Some(entry) = self.get(&key).await {
            return Ok(Cached { entry, hit: true });
        }

        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(async { fetch.await.map(CacheEntry::new) })
            .await?;

        tracing::trace!(key = ?entry.key(), loaded = entry.is_fresh(), "cache entry resolved");

        let hit = !entry.is_fresh();
        Ok(Cached {
            entry: entry.into_value(),
            hit,
        })
    }
}

impl<K, V> Debug for TtlCache<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.cache.name())
            .field("ttl", &self.ttl)
            .field("entry_count", &self.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    #[derive(Debug, PartialEq)]
    struct FetchError(&'static str);

    async fn ok_after<V>(value: V, delay: Duration, calls: &AtomicUsize) -> Result<V, FetchError> {
        calls.fetch_add(1, Ordering::SeqCst);
        sleep(delay).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache: TtlCache<String, u32> = TtlCache::new_unbounded("test", Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_try_fetch("a".to_string(), ok_after(1, Duration::ZERO, &calls))
            .await
            .unwrap();
        assert!(!first.hit);
        assert_eq!(first.entry.value, 1);

        let second = cache
            .get_or_try_fetch("a".to_string(), ok_after(2, Duration::ZERO, &calls))
            .await
            .unwrap();
        assert!(second.hit);
        assert_eq!(second.entry.value, 1);
        assert_eq!(second.entry.age_minutes(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache: TtlCache<String, &str> = TtlCache::new_unbounded("test", Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_try_fetch("b1".to_string(), ok_after("one", Duration::ZERO, &calls))
            .await
            .unwrap();
        let other = cache
            .get_or_try_fetch("b2".to_string(), ok_after("two", Duration::ZERO, &calls))
            .await
            .unwrap();

        assert!(!other.hit);
        assert_eq!(other.entry.value, "two");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache: TtlCache<(), u32> = TtlCache::new_unbounded("test", Duration::from_millis(100));
        let calls = AtomicUsize::new(0);

        cache
            .get_or_try_fetch((), ok_after(1, Duration::ZERO, &calls))
            .await
            .unwrap();
        assert!(cache.get(&()).await.is_some());

        // Wait for expiration
        sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&()).await.is_none());

        let refreshed = cache
            .get_or_try_fetch((), ok_after(2, Duration::ZERO, &calls))
            .await
            .unwrap();
        assert!(!refreshed.hit);
        assert_eq!(refreshed.entry.value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: TtlCache<(), u32> = TtlCache::new_unbounded("test", Duration::from_secs(60));

        let err = cache
            .get_or_try_fetch((), async { Err::<u32, _>(FetchError("boom")) })
            .await
            .unwrap_err();
        assert_eq!(*err, FetchError("boom"));
        assert!(cache.get(&()).await.is_none());

        let ok = cache
            .get_or_try_fetch((), async { Ok::<_, FetchError>(7) })
            .await
            .unwrap();
        assert!(!ok.hit);
        assert_eq!(ok.entry.value, 7);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache: TtlCache<String, u32> = TtlCache::new_unbounded("test", Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let results = futures::future::join_all((0..8).map(|i| {
            cache.get_or_try_fetch(
                "same".to_string(),
                ok_after(i, Duration::from_millis(50), &calls),
            )
        }))
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let results: Vec<_> = results.into_iter().map(Result::unwrap).collect();
        let loaders = results.iter().filter(|r| !r.hit).count();
        assert_eq!(loaders, 1);

        let value = results[0].entry.value;
        assert!(results.iter().all(|r| r.entry.value == value));
    }

    #[tokio::test]
    async fn test_bounded() {
        let cache = TtlCache::new_bounded("test", 2, Duration::from_secs(60)); // Max 2 entries
        let calls = AtomicUsize::new(0);

        for key in ["key1", "key2", "key3"] {
            cache
                .get_or_try_fetch(key, ok_after(key.len(), Duration::ZERO, &calls))
                .await
                .unwrap();
        }

        cache.cache.run_pending_tasks().await;

        assert!(cache.entry_count() <= 2, "Cache should have at most 2 entries");
    }

    #[test]
    fn test_entry_freshness_and_age() {
        let mut entry = CacheEntry::new(());
        assert!(entry.is_fresh(Duration::from_secs(300)));
        assert_eq!(entry.age_minutes(), 0);

        entry.stored_at = Utc::now() - TimeDelta::seconds(5 * 60);
        assert!(!entry.is_fresh(Duration::from_secs(300)));
        assert_eq!(entry.age_minutes(), 5);

        // 89 seconds rounds down, 91 seconds rounds up
        entry.stored_at = Utc::now() - TimeDelta::seconds(89);
        assert_eq!(entry.age_minutes(), 1);
        entry.stored_at = Utc::now() - TimeDelta::seconds(91);
        assert_eq!(entry.age_minutes(), 2);
    }
}
