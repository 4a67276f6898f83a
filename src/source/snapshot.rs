//! Fixed in-memory data

use super::DataSource;
use crate::error::{Error, Result};
use crate::stat::{Item, Post};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serves the same records on every fetch
#[derive(Debug, Clone, Default)]
pub struct StaticDataSource {
    items: Vec<Item>,
    posts: Vec<Post>,
    post_details: Vec<serde_json::Value>,
}

impl StaticDataSource {
    /// Snapshot of items and posts
    #[must_use]
    pub fn new(items: Vec<Item>, posts: Vec<Post>) -> Self {
        Self {
            items,
            posts,
            post_details: Vec::new(),
        }
    }

    /// Load items and posts from JSON files
    pub fn from_files<P: AsRef<Path>>(items_path: P, posts_path: P) -> Result<Self> {
        Ok(Self::new(
            read_json_file(items_path)?,
            read_json_file(posts_path)?,
        ))
    }
}

#[async_trait]
impl DataSource for StaticDataSource {
    async fn fetch_items(&self) -> Result<Vec<Item>> {
        Ok(self.items.clone())
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts.clone())
    }

    async fn fetch_post_details(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.post_details.clone())
    }
}

pub(crate) fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_files() {
        let mut items = tempfile::NamedTempFile::new().unwrap();
        write!(
            items,
            r#"[{{"title":"A","url":"https://a.example/","date":"2011-01-08T04:20:00.000Z"}}]"#
        )
        .unwrap();
        let mut posts = tempfile::NamedTempFile::new().unwrap();
        write!(
            posts,
            r#"[{{"postNumber":1,"title":"P","url":"https://jser.info/post/1","date":"2011-01-10T11:00:00.000Z"}}]"#
        )
        .unwrap();

        let source = StaticDataSource::from_files(items.path(), posts.path()).unwrap();
        assert_eq!(source.fetch_items().await.unwrap().len(), 1);
        assert_eq!(source.fetch_posts().await.unwrap()[0].post_number, Some(1));
        assert!(source.fetch_post_details().await.unwrap().is_empty());
    }

    #[test]
    fn test_read_json_file_reports_path() {
        let err = read_json_file::<Vec<Item>, _>("/nonexistent/items.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/items.json"));
    }
}
