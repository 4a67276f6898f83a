//! Keyword search over items and posts
#![allow(missing_docs)]

use crate::stat::{Item, Post};
use crate::tools::{error_result, json_result, parse_arguments, Tool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Default page size
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page a caller may request
pub const MAX_LIMIT: u32 = 100;

/// Result ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Feed order
    #[default]
    Relevance,
    /// Publication date
    Date,
}

impl SortKey {
    /// Unknown values fall back to `Relevance`
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("date") => SortKey::Date,
            _ => SortKey::Relevance,
        }
    }
}

/// Direction of a date sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything but `asc` means descending
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Paging and ordering of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: usize,
    pub offset: usize,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT as usize,
            offset: 0,
            sort: SortKey::default(),
            order: SortOrder::default(),
        }
    }
}

impl SearchOptions {
    fn from_params(
        limit: Option<u32>,
        offset: Option<u32>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize,
            offset: offset.unwrap_or(0) as usize,
            sort: SortKey::parse(sort),
            order: SortOrder::parse(order),
        }
    }
}

/// Items matching ANY whitespace-separated keyword (case-insensitive)
#[must_use]
pub fn search_items<'a>(items: &'a [Item], query: &str, options: &SearchOptions) -> Vec<&'a Item> {
    let keywords: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    let matches = items
        .iter()
        .filter(|item| {
            let text = item.search_text();
            keywords.is_empty() || keywords.iter().any(|word| text.contains(word.as_str()))
        })
        .collect();
    sort_and_page(matches, Item::timestamp, options)
}

/// Posts containing the whole query as one phrase (case-insensitive)
#[must_use]
pub fn search_posts<'a>(posts: &'a [Post], query: &str, options: &SearchOptions) -> Vec<&'a Post> {
    let phrase = query.to_lowercase();
    let matches = posts
        .iter()
        .filter(|post| post.search_text().contains(&phrase))
        .collect();
    sort_and_page(matches, Post::timestamp, options)
}

fn sort_and_page<'a, T>(
    mut matches: Vec<&'a T>,
    date: impl Fn(&T) -> Option<DateTime<Utc>>,
    options: &SearchOptions,
) -> Vec<&'a T> {
    if options.sort == SortKey::Date {
        // undated records go last in both orders
        let mut keyed: Vec<(Option<DateTime<Utc>>, &'a T)> =
            matches.into_iter().map(|m| (date(m), m)).collect();
        keyed.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => match options.order {
                SortOrder::Asc => a.cmp(b),
                SortOrder::Desc => b.cmp(a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        matches = keyed.into_iter().map(|(_, m)| m).collect();
    }

    matches
        .into_iter()
        .skip(options.offset)
        .take(options.limit)
        .collect()
}

/// 搜索 item 的工具参数
#[macros::mcp_tool(
    name = "search_items",
    title = "Search JSer.info items",
    description = "Search JSer.info items by title, description, URL and tags. Space-separated keywords are OR-matched, case-insensitively.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional"),
    icons = [
        (src = "https://jser.info/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "light"),
        (src = "https://jser.info/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "dark")
    ]
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchItemsTool {
    /// 搜索查询
    #[json_schema(
        title = "Query",
        description = "Search keywords; space-separated keywords are OR-matched, e.g. 'react vite'"
    )]
    pub query: String,

    /// 结果数量限制
    #[json_schema(
        title = "Limit",
        description = "Maximum number of results, 1-100",
        minimum = 1,
        maximum = 100,
        default = 10
    )]
    pub limit: Option<u32>,

    #[json_schema(title = "Offset", description = "Number of results to skip", minimum = 0, default = 0)]
    pub offset: Option<u32>,

    #[json_schema(
        title = "Sort",
        description = "'relevance' keeps feed order, 'date' sorts by publication date",
        default = "relevance"
    )]
    pub sort: Option<String>,

    #[json_schema(title = "Order", description = "'asc' or 'desc' for date sort", default = "desc")]
    pub order: Option<String>,
}

/// 搜索 item 工具实现
pub struct SearchItemsToolImpl {
    service: Arc<super::JSerService>,
}

impl SearchItemsToolImpl {
    /// 创建新的工具实例
    #[must_use]
    pub fn new(service: Arc<super::JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchItemsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchItemsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchItemsTool = parse_arguments("search_items", arguments)?;
        let options = SearchOptions::from_params(
            params.limit,
            params.offset,
            params.sort.as_deref(),
            params.order.as_deref(),
        );

        let items = match self.service.items().await {
            Ok(items) => items,
            Err(err) => return Ok(error_result("search_items", &err)),
        };
        json_result(&search_items(&items, &params.query, &options))
    }
}

/// 搜索 post 的工具参数
#[macros::mcp_tool(
    name = "search_posts",
    title = "Search JSer.info posts",
    description = "Search JSer.info weekly posts by title, description, URL and tags. The whole query is matched as one phrase, case-insensitively.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional"),
    icons = [
        (src = "https://jser.info/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "light"),
        (src = "https://jser.info/favicon.ico", mime_type = "image/x-icon", sizes = ["32x32"], theme = "dark")
    ]
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchPostsTool {
    #[json_schema(title = "Query", description = "Phrase to look for")]
    pub query: String,

    #[json_schema(
        title = "Limit",
        description = "Maximum number of results, 1-100",
        minimum = 1,
        maximum = 100,
        default = 10
    )]
    pub limit: Option<u32>,

    #[json_schema(title = "Offset", description = "Number of results to skip", minimum = 0, default = 0)]
    pub offset: Option<u32>,

    #[json_schema(
        title = "Sort",
        description = "'relevance' keeps feed order, 'date' sorts by publication date",
        default = "relevance"
    )]
    pub sort: Option<String>,

    #[json_schema(title = "Order", description = "'asc' or 'desc' for date sort", default = "desc")]
    pub order: Option<String>,
}

/// 搜索 post 工具实现
pub struct SearchPostsToolImpl {
    service: Arc<super::JSerService>,
}

impl SearchPostsToolImpl {
    #[must_use]
    pub fn new(service: Arc<super::JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchPostsToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        SearchPostsTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: SearchPostsTool = parse_arguments("search_posts", arguments)?;
        let options = SearchOptions::from_params(
            params.limit,
            params.offset,
            params.sort.as_deref(),
            params.order.as_deref(),
        );

        let posts = match self.service.posts().await {
            Ok(posts) => posts,
            Err(err) => return Ok(error_result("search_posts", &err)),
        };
        json_result(&search_posts(&posts, &params.query, &options))
    }
}
