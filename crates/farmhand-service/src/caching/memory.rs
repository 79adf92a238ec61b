use futures::future::BoxFuture;

use super::CacheKey;

type InMemoryCache<T> = moka::future::Cache<CacheKey, T>;

/// A request for a value that is computed at most once per key.
///
/// The computation is expected to absorb its own failures: whatever the
/// future returned by [`compute`](Self::compute) resolves to is what gets
/// retained for the lifetime of the process and handed to every caller,
/// so fallible steps must be folded into a fallback representation of the
/// item before resolving.
pub trait CacheItemRequest: 'static + Send + Sync + Clone {
    type Item: 'static + Send + Sync + Clone;

    /// Invoked to compute an instance of this item. This runs only when no
    /// other computation for the same key is pending or resolved.
    fn compute(&self) -> BoxFuture<'_, Self::Item>;
}

/// Manages an in-memory cache of derived values.
///
/// Deduplicates concurrent lookups: the pending computation is stored under
/// its key the moment it starts, so lookups issued while it is still running
/// attach to it rather than racing a second computation. Entries are retained
/// for the lifetime of the process; there is no expiry and no size bound,
/// which is acceptable because the keyspace is bounded by the crop catalog.
pub struct Cacher<T: CacheItemRequest> {
    name: &'static str,

    /// An in-memory cache which also does request-coalescing when
    /// requesting items.
    cache: InMemoryCache<T::Item>,
}

impl<T: CacheItemRequest> std::fmt::Debug for Cacher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cacher")
            .field("name", &self.name)
            .field("in-memory items", &self.cache.entry_count())
            .finish()
    }
}

impl<T: CacheItemRequest> Clone for Cacher<T> {
    fn clone(&self) -> Self {
        // https://github.com/rust-lang/rust/issues/26925
        Cacher {
            name: self.name,
            cache: self.cache.clone(),
        }
    }
}

impl<T: CacheItemRequest> Cacher<T> {
    pub fn new(name: &'static str) -> Self {
        let cache = InMemoryCache::builder().name(name).build();

        Cacher { name, cache }
    }

    /// Computes an item, or serves it from the cache.
    ///
    /// The actual computation is deduplicated between concurrent requests:
    /// for any key, [`T::compute`](CacheItemRequest::compute) runs at most
    /// once per process, no matter how many requests are issued before the
    /// first one resolves. All of them observe the same eventual value.
    pub async fn compute_memoized(&self, request: T, cache_key: CacheKey) -> T::Item {
        metric!(counter("caches.access") += 1, "cache" => self.name);

        let entry = self
            .cache
            .entry_by_ref(&cache_key)
            .or_insert_with(request.compute())
            .await;

        if !entry.is_fresh() {
            metric!(counter("caches.memory.hit") += 1, "cache" => self.name);
        }
        entry.into_value()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Counts how often its computation actually runs.
    #[derive(Clone)]
    struct CountingRequest {
        computations: Arc<AtomicUsize>,
        value: &'static str,
    }

    impl CacheItemRequest for CountingRequest {
        type Item = Arc<str>;

        fn compute(&self) -> BoxFuture<'_, Self::Item> {
            Box::pin(async {
                self.computations.fetch_add(1, Ordering::SeqCst);
                // Keep the computation pending long enough for concurrent
                // lookups to arrive while it is in flight.
                tokio::time::sleep(Duration::from_millis(10)).await;
                Arc::from(self.value)
            })
        }
    }

    #[tokio::test]
    async fn coalesces_concurrent_computations() {
        let computations = Arc::new(AtomicUsize::new(0));
        let request = CountingRequest {
            computations: Arc::clone(&computations),
            value: "icon",
        };

        let cacher = Cacher::new("test");
        let key = CacheKey::from_slug("lettuce");

        let (first, second) = tokio::join!(
            cacher.compute_memoized(request.clone(), key.clone()),
            cacher.compute_memoized(request.clone(), key.clone()),
        );

        assert_eq!(first, second);
        assert_eq!(computations.load(Ordering::SeqCst), 1);

        // A lookup after resolution is served from the cache as well.
        let third = cacher.compute_memoized(request, key).await;
        assert_eq!(third, first);
        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_compute_independently() {
        let computations = Arc::new(AtomicUsize::new(0));
        let request = CountingRequest {
            computations: Arc::clone(&computations),
            value: "icon",
        };

        let cacher = Cacher::new("test");

        let (_, _) = tokio::join!(
            cacher.compute_memoized(request.clone(), CacheKey::from_slug("mint")),
            cacher.compute_memoized(request.clone(), CacheKey::from_slug("sage")),
        );

        assert_eq!(computations.load(Ordering::SeqCst), 2);
    }
}
