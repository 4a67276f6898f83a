//! JSer.info JSON feeds over HTTP

use super::{DataSource, SourceConfig};
use crate::error::{Error, Result};
use crate::stat::{Item, Post};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Live feed reader
pub struct HttpDataSource {
    client: reqwest::Client,
    items_url: String,
    posts_url: String,
    post_details_url: String,
}

impl HttpDataSource {
    /// Create a reader for the configured feed URLs
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self {
            client,
            items_url: config.items_url.clone(),
            posts_url: config.posts_url.clone(),
            post_details_url: config.post_details_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "fetching feed");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "GET {url} returned HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("invalid JSON from {url}: {e}")))
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_items(&self) -> Result<Vec<Item>> {
        self.get_json(&self.items_url).await
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        self.get_json(&self.posts_url).await
    }

    async fn fetch_post_details(&self) -> Result<Vec<serde_json::Value>> {
        self.get_json(&self.post_details_url).await
    }
}
