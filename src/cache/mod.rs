//! 缓存模块
//!
//! Time-boxed memoization of upstream fetches. Each data kind owns one
//! [`memory::TimedCache`] slot; a slot serves its entry until the freshness
//! window elapses, refetches afterwards, and keeps serving the stale entry if
//! the refetch fails.

pub mod memory;

pub use memory::{CacheEntry, TimedCache};

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Source of "now" for freshness checks
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock (tokio's, so paused test runtimes are honoured)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Start at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

/// Cached data kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Item feed
    Items,
    /// Post feed
    Posts,
    /// Post detail feed
    PostDetails,
}

impl CacheKey {
    /// Name used in logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::Items => "items",
            CacheKey::Posts => "posts",
            CacheKey::PostDetails => "postDetails",
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 缓存配置
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Freshness window in seconds
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Freshness window
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60, // 1分钟
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(61));
        assert_eq!(clock.now() - start, Duration::from_secs(61));
    }

    #[test]
    fn test_cache_key_names() {
        assert_eq!(CacheKey::Items.to_string(), "items");
        assert_eq!(CacheKey::PostDetails.as_str(), "postDetails");
    }

    #[test]
    fn test_default_ttl_is_one_minute() {
        assert_eq!(CacheConfig::default().ttl(), Duration::from_secs(60));
    }
}
