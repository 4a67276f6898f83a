//! 内存缓存实现

use super::{CacheKey, Clock};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// 缓存条目
pub struct CacheEntry<T> {
    /// Fetched data
    pub data: Arc<T>,
    /// When the fetch that produced `data` started
    pub fetched_at: Instant,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            fetched_at: self.fetched_at,
        }
    }
}

impl<T> CacheEntry<T> {
    fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) > ttl
    }
}

/// Single-slot cache with stale-on-error fallback
pub struct TimedCache<T> {
    key: CacheKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Send + Sync> TimedCache<T> {
    /// Create an empty slot
    #[must_use]
    pub fn new(key: CacheKey, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            key,
            ttl,
            clock,
            slot: RwLock::new(None),
        }
    }

    /// Slot name
    #[must_use]
    pub fn key(&self) -> CacheKey {
        self.key
    }

    /// Current entry, fresh or not, without fetching
    #[must_use]
    pub fn peek(&self) -> Option<CacheEntry<T>> {
        self.slot.read().clone()
    }

    /// Age of the current entry
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        let fetched_at = self.slot.read().as_ref()?.fetched_at;
        Some(self.clock.now().saturating_duration_since(fetched_at))
    }

    /// Drop the current entry
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    /// Return the cached data, refreshing it through `fetch` once it is older
    /// than the freshness window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] only when `fetch` fails and nothing was ever
    /// cached.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let now = self.clock.now();
        let cached = self.peek();

        if let Some(entry) = &cached {
            if !entry.is_stale(now, self.ttl) {
                tracing::debug!(key = %self.key, "cache hit");
                return Ok(Arc::clone(&entry.data));
            }
        }

        tracing::debug!(key = %self.key, stale = cached.is_some(), "fetching");
        match fetch().await {
            Ok(data) => {
                let data = Arc::new(data);
                *self.slot.write() = Some(CacheEntry {
                    data: Arc::clone(&data),
                    fetched_at: now,
                });
                tracing::info!(key = %self.key, "cache refreshed");
                Ok(data)
            }
            Err(err) => match cached {
                Some(entry) => {
                    tracing::warn!(
                        key = %self.key,
                        error = %err,
                        "fetch failed, serving stale cache"
                    );
                    Ok(entry.data)
                }
                None => Err(match err {
                    Error::Fetch(_) => err,
                    other => Error::Fetch(format!("{}: {other}", self.key)),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        clock: Arc<ManualClock>,
        cache: TimedCache<Vec<u32>>,
        calls: AtomicUsize,
    }

    impl Harness {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new());
            let cache = TimedCache::new(
                CacheKey::Items,
                Duration::from_secs(60),
                clock.clone() as Arc<dyn Clock>,
            );
            Self {
                clock,
                cache,
                calls: AtomicUsize::new(0),
            }
        }

        async fn get(&self, outcome: Result<Vec<u32>>) -> Result<Arc<Vec<u32>>> {
            self.cache
                .get_or_fetch(|| async move {
                    self.calls.fetch_add(1, Ordering::SeqCst);
                    outcome
                })
                .await
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_fetch() {
        let h = Harness::new();
        assert_eq!(*h.get(Ok(vec![1])).await.unwrap(), vec![1]);

        h.clock.advance(Duration::from_secs(30));
        assert_eq!(*h.get(Ok(vec![2])).await.unwrap(), vec![1]);
        assert_eq!(h.calls(), 1);
    }

    #[tokio::test]
    async fn test_window_boundary_is_still_fresh() {
        let h = Harness::new();
        h.get(Ok(vec![1])).await.unwrap();

        h.clock.advance(Duration::from_secs(60));
        assert_eq!(*h.get(Ok(vec![2])).await.unwrap(), vec![1]);
        assert_eq!(h.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_replaced() {
        let h = Harness::new();
        h.get(Ok(vec![1])).await.unwrap();

        h.clock.advance(Duration::from_secs(61));
        assert_eq!(*h.get(Ok(vec![2, 3])).await.unwrap(), vec![2, 3]);
        assert_eq!(*h.get(Ok(vec![4])).await.unwrap(), vec![2, 3]);
        assert_eq!(h.calls(), 2);
        assert_eq!(h.cache.age(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_failed_refresh_serves_stale_entry() {
        let h = Harness::new();
        h.get(Ok(vec![1])).await.unwrap();

        h.clock.advance(Duration::from_secs(120));
        let data = h.get(Err(Error::Fetch("upstream down".into()))).await.unwrap();
        assert_eq!(*data, vec![1]);

        // the stale entry keeps its timestamp, so the next call retries
        let data = h.get(Ok(vec![9])).await.unwrap();
        assert_eq!(*data, vec![9]);
        assert_eq!(h.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_without_entry_propagates() {
        let h = Harness::new();
        let err = h
            .get(Err(Error::Other("connection refused".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(h.cache.peek().is_none());
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let h = Harness::new();
        h.get(Ok(vec![1])).await.unwrap();
        h.cache.clear();
        assert_eq!(*h.get(Ok(vec![2])).await.unwrap(), vec![2]);
        assert_eq!(h.calls(), 2);
    }
}
