//! JSer.info query tools

pub mod item;
pub mod search;
pub mod week;

use crate::cache::{CacheConfig, CacheKey, Clock, SystemClock, TimedCache};
use crate::error::Result;
use crate::source::{DataSource, SourceConfig};
use crate::stat::{Item, JSerStat, Post};
use std::sync::Arc;

/// Data service shared by the tools: the data source behind one cache slot
/// per feed, plus the HTTP client for the product-name resolver.
pub struct JSerService {
    source: Arc<dyn DataSource>,
    items: TimedCache<Vec<Item>>,
    posts: TimedCache<Vec<Post>>,
    post_details: TimedCache<Vec<serde_json::Value>>,
    client: reqwest::Client,
    product_name_endpoint: String,
}

impl JSerService {
    /// Create a service over `source`
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(
        source: Arc<dyn DataSource>,
        cache: &CacheConfig,
        source_config: &SourceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let ttl = cache.ttl();
        let client = source_config.http_client()?;

        Ok(Self {
            source,
            items: TimedCache::new(CacheKey::Items, ttl, clock.clone()),
            posts: TimedCache::new(CacheKey::Posts, ttl, clock.clone()),
            post_details: TimedCache::new(CacheKey::PostDetails, ttl, clock),
            client,
            product_name_endpoint: source_config.product_name_endpoint.clone(),
        })
    }

    /// Service with default cache and endpoint settings
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn with_source(source: Arc<dyn DataSource>) -> Result<Self> {
        Self::new(
            source,
            &CacheConfig::default(),
            &SourceConfig::default(),
            Arc::new(SystemClock),
        )
    }

    /// Point the product-name tool at another resolver
    #[must_use]
    pub fn with_product_name_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.product_name_endpoint = endpoint.into();
        self
    }

    /// Cached items
    pub async fn items(&self) -> Result<Arc<Vec<Item>>> {
        self.items.get_or_fetch(|| self.source.fetch_items()).await
    }

    /// Cached posts
    pub async fn posts(&self) -> Result<Arc<Vec<Post>>> {
        self.posts.get_or_fetch(|| self.source.fetch_posts()).await
    }

    /// Cached post details
    pub async fn post_details(&self) -> Result<Arc<Vec<serde_json::Value>>> {
        self.post_details
            .get_or_fetch(|| self.source.fetch_post_details())
            .await
    }

    /// Index over the current items/posts snapshot
    pub async fn stat(&self) -> Result<JSerStat> {
        let (items, posts) = tokio::try_join!(self.items(), self.posts())?;
        Ok(JSerStat::new(items, &posts))
    }

    /// Fill every cache slot; failures are logged and left for the first call
    pub async fn warm_up(&self) {
        let (items, posts, details) =
            tokio::join!(self.items(), self.posts(), self.post_details());

        match (items, posts) {
            (Ok(items), Ok(posts)) => {
                tracing::info!(items = items.len(), posts = posts.len(), "cache warmed up");
            }
            (items, posts) => {
                for err in [items.err(), posts.err()].into_iter().flatten() {
                    tracing::warn!(error = %err, "cache warm-up failed");
                }
            }
        }
        if let Err(err) = details {
            tracing::warn!(error = %err, "post details warm-up failed");
        }
    }

    /// HTTP client for outbound calls
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Product-name resolver base URL
    #[must_use]
    pub fn product_name_endpoint(&self) -> &str {
        &self.product_name_endpoint
    }

    /// Items cache slot
    #[must_use]
    pub fn items_cache(&self) -> &TimedCache<Vec<Item>> {
        &self.items
    }

    /// Posts cache slot
    #[must_use]
    pub fn posts_cache(&self) -> &TimedCache<Vec<Post>> {
        &self.posts
    }
}

/// 重新导出工具
pub use item::GetJSerItemWithUrlTool;
pub use search::{SearchItemsTool, SearchPostsTool};
pub use week::{GetJSerWeekTool, GetJSerWeekWithItemTool, GetJSerWeeksBetweenTool, GetJSerWeeksTool};
