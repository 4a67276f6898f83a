//! JSer.info records as published by the data feed

use crate::utils::time::{iso_millis, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    /// Link title
    pub title: String,
    /// Link URL
    pub url: String,
}

/// One curated link entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Article title
    pub title: String,
    /// Article URL, the lookup key within a snapshot
    pub url: String,
    /// Short summary written by the curator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tags, in curator order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Publication timestamp (ISO-8601)
    pub date: String,
    /// Additional links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_links: Option<Vec<RelatedLink>>,
}

impl Item {
    /// Parsed publication timestamp
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }

    /// Lower-cased `title url content tags` used by keyword search
    #[must_use]
    pub fn search_text(&self) -> String {
        search_text(&self.title, &self.url, self.content.as_deref(), self.tags.as_deref())
    }
}

/// One weekly digest issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Issue number; older feeds omit it and the index numbers by date order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_number: Option<u64>,
    /// Title
    pub title: String,
    /// Permalink
    pub url: String,
    /// Excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Category (usually "JSer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Publication timestamp (ISO-8601)
    pub date: String,
    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Post {
    /// Parsed publication timestamp
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }

    /// Lower-cased `title url content tags` used by keyword search
    #[must_use]
    pub fn search_text(&self) -> String {
        search_text(&self.title, &self.url, self.content.as_deref(), self.tags.as_deref())
    }
}

fn search_text(title: &str, url: &str, content: Option<&str>, tags: Option<&[String]>) -> String {
    let tags = tags.map(|t| t.join(" ")).unwrap_or_default();
    format!("{title} {url} {} {tags}", content.unwrap_or_default()).to_lowercase()
}

/// The interval between two consecutive posts.
///
/// Items published in `(begin_date, end_date]` are the ones this week's post
/// introduces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JSerWeek {
    /// Equal to the post's number
    pub week_number: u64,
    /// Date of the previous post, or the epoch for the first week
    #[serde(with = "iso_millis")]
    pub begin_date: DateTime<Utc>,
    /// Date of this week's post
    #[serde(with = "iso_millis")]
    pub end_date: DateTime<Utc>,
    /// The digest post closing this week, dated like `end_date`
    pub post: Post,
}

impl JSerWeek {
    /// Whether `date` falls inside this week
    #[must_use]
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.begin_date < date && date <= self.end_date
    }

    /// Whether this week overlaps the closed range `[begin, end]`
    #[must_use]
    pub fn intersects(&self, begin: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.begin_date < end && self.end_date >= begin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, content: Option<&str>, tags: Option<Vec<&str>>) -> Item {
        Item {
            title: title.to_string(),
            url: "https://example.com/Article".to_string(),
            content: content.map(str::to_string),
            tags: tags.map(|t| t.into_iter().map(str::to_string).collect()),
            date: "2011-01-08T04:20:00.000Z".to_string(),
            related_links: None,
        }
    }

    #[test]
    fn test_item_search_text() {
        let full = item("Unit Tests", Some("Visual Studio"), Some(vec!["Test", "IDE"]));
        assert_eq!(
            full.search_text(),
            "unit tests https://example.com/article visual studio test ide"
        );

        let bare = item("Title", None, None);
        assert_eq!(bare.search_text(), "title https://example.com/article  ");
    }

    #[test]
    fn test_item_serialization_skips_missing_fields() {
        let json = serde_json::to_value(item("T", None, None)).unwrap();
        assert!(json.get("content").is_none());
        assert!(json.get("tags").is_none());
        assert!(json.get("relatedLinks").is_none());
    }

    #[test]
    fn test_post_deserializes_without_number() {
        let post: Post = serde_json::from_str(
            r#"{"title":"2011-01-20のJS","url":"https://jser.info/post/1","date":"2011-01-20T13:20:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(post.post_number, None);
        assert!(post.timestamp().is_some());
    }

    #[test]
    fn test_week_interval_boundaries() {
        let week = JSerWeek {
            week_number: 3,
            begin_date: parse_timestamp("2011-01-18T11:53:04Z").unwrap(),
            end_date: parse_timestamp("2011-01-20T13:20:00Z").unwrap(),
            post: serde_json::from_str(
                r#"{"postNumber":3,"title":"t","url":"u","date":"2011-01-20T13:20:00.000Z"}"#,
            )
            .unwrap(),
        };
        assert!(week.contains(week.end_date));
        assert!(!week.contains(week.begin_date));

        let json = serde_json::to_value(&week).unwrap();
        assert_eq!(json["beginDate"], "2011-01-18T11:53:04.000Z");
        assert_eq!(json["endDate"], "2011-01-20T13:20:00.000Z");
        assert_eq!(json["weekNumber"], 3);
    }
}
