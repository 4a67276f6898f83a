//! Upstream data sources
//!
//! The query tools never talk to the network directly; they go through a
//! [`DataSource`], which is either the live JSer.info feed or a fixed snapshot.

pub mod http;
pub mod snapshot;

pub use http::HttpDataSource;
pub use snapshot::StaticDataSource;

use crate::error::Result;
use crate::stat::{Item, Post};
use crate::utils::HttpClientBuilder;
use async_trait::async_trait;
use std::time::Duration;

/// Raw record provider
#[async_trait]
pub trait DataSource: Send + Sync {
    /// All items
    async fn fetch_items(&self) -> Result<Vec<Item>>;

    /// All posts
    async fn fetch_posts(&self) -> Result<Vec<Post>>;

    /// Per-post item breakdown; only used to warm the cache
    async fn fetch_post_details(&self) -> Result<Vec<serde_json::Value>>;
}

/// Source endpoints and offline snapshot paths
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Item feed URL
    pub items_url: String,

    /// Post feed URL
    pub posts_url: String,

    /// Post detail feed URL
    pub post_details_url: String,

    /// Product-name resolver endpoint
    pub product_name_endpoint: String,

    /// HTTP request timeout (seconds)
    pub request_timeout_secs: u64,

    /// HTTP connect timeout (seconds)
    pub connect_timeout_secs: u64,

    /// User-Agent for feed and resolver requests
    pub user_agent: String,

    /// Read items from this JSON file instead of the network
    pub items_file: Option<String>,

    /// Read posts from this JSON file instead of the network
    pub posts_file: Option<String>,

    /// Fetch every feed once at startup
    pub warm_up: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            items_url: "https://jser.info/public/data/items.json".to_string(),
            posts_url: "https://jser.info/public/data/posts.json".to_string(),
            post_details_url: "https://jser.info/public/data/post-details.json".to_string(),
            product_name_endpoint: "https://jser-product-name.deno.dev/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: crate::utils::default_user_agent(),
            items_file: None,
            posts_file: None,
            warm_up: true,
        }
    }
}

impl SourceConfig {
    /// Whether the data comes from local files
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.items_file.is_some() || self.posts_file.is_some()
    }

    /// HTTP client with the configured timeouts and User-Agent
    ///
    /// # Errors
    ///
    /// Fails when the client cannot be built.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        HttpClientBuilder::new()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(self.user_agent.as_str())
            .build()
    }
}

/// Build the data source described by `config`
///
/// # Errors
///
/// Fails when a snapshot file cannot be read or the HTTP client cannot be built.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn DataSource>> {
    if config.is_offline() {
        let items = match &config.items_file {
            Some(path) => snapshot::read_json_file(path)?,
            None => Vec::new(),
        };
        let posts = match &config.posts_file {
            Some(path) => snapshot::read_json_file(path)?,
            None => Vec::new(),
        };
        tracing::info!(items = items.len(), posts = posts.len(), "using offline snapshot");
        Ok(Box::new(StaticDataSource::new(items, posts)))
    } else {
        Ok(Box::new(HttpDataSource::from_config(config)?))
    }
}
