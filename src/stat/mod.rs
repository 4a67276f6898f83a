//! Week/item index
//!
//! `JSerStat` is built from one `(items, posts)` snapshot and answers the
//! cross-reference queries: item by URL, week by number, week containing an
//! item and weeks overlapping a date range.

pub mod model;

pub use model::{Item, JSerWeek, Post, RelatedLink};

use crate::error::Result;
use crate::utils::time::{epoch, format_timestamp};
use crate::utils::validation::validate_date_range;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// A pair of post numbers that goes backwards in date order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingViolation {
    /// Number of the earlier-dated post
    pub previous: u64,
    /// Number of the later-dated post
    pub next: u64,
}

/// Index over an items/posts snapshot
pub struct JSerStat {
    items: Arc<Vec<Item>>,
    weeks: Vec<JSerWeek>,
    item_by_url: HashMap<String, usize>,
    week_by_number: HashMap<u64, usize>,
    violations: Vec<OrderingViolation>,
}

impl JSerStat {
    /// Build the index
    #[must_use]
    pub fn new(items: Arc<Vec<Item>>, posts: &[Post]) -> Self {
        let weeks = build_weeks(posts);

        let mut item_by_url = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            item_by_url.entry(item.url.clone()).or_insert(index);
        }

        let mut week_by_number = HashMap::with_capacity(weeks.len());
        for (index, week) in weeks.iter().enumerate() {
            week_by_number.entry(week.week_number).or_insert(index);
        }

        let violations = find_violations(&weeks);
        for violation in &violations {
            tracing::warn!(
                previous = violation.previous,
                next = violation.next,
                "post numbers are not increasing with post date"
            );
        }

        Self {
            items,
            weeks,
            item_by_url,
            week_by_number,
            violations,
        }
    }

    /// All items of the snapshot, in fetch order
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Exact URL lookup; the first item wins when a URL repeats
    #[must_use]
    pub fn find_item_with_url(&self, url: &str) -> Option<&Item> {
        self.item_by_url.get(url).map(|&index| &self.items[index])
    }

    /// Week by number
    #[must_use]
    pub fn find_jser_week(&self, number: u64) -> Option<&JSerWeek> {
        self.week_by_number.get(&number).map(|&index| &self.weeks[index])
    }

    /// Every week, ordered by post date
    #[must_use]
    pub fn jser_weeks(&self) -> &[JSerWeek] {
        &self.weeks
    }

    /// Weeks overlapping `[begin, end]`; both bounds are date strings
    pub fn find_jser_weeks_between(&self, begin: &str, end: &str) -> Result<Vec<&JSerWeek>> {
        let (begin, end) = validate_date_range(begin, end)?;
        Ok(self.find_jser_weeks_between_dates(begin, end))
    }

    /// Weeks overlapping `[begin, end]`
    #[must_use]
    pub fn find_jser_weeks_between_dates(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&JSerWeek> {
        self.weeks
            .iter()
            .filter(|week| week.intersects(begin, end))
            .collect()
    }

    /// The week whose post is the first one published at or after the item
    #[must_use]
    pub fn find_week_with_item(&self, item: &Item) -> Option<&JSerWeek> {
        let date = item.timestamp()?;
        self.find_week_with_date(date)
    }

    /// The week containing `date`
    #[must_use]
    pub fn find_week_with_date(&self, date: DateTime<Utc>) -> Option<&JSerWeek> {
        let index = self.weeks.partition_point(|week| week.end_date < date);
        let week = self.weeks.get(index)?;
        // the first week is closed at the sentinel
        if week.contains(date) || (index == 0 && date == week.begin_date) {
            Some(week)
        } else {
            None
        }
    }

    /// Whether explicit post numbers increase with post date
    #[must_use]
    pub fn is_number_monotonic(&self) -> bool {
        self.violations.is_empty()
    }

    /// Adjacent posts whose numbers go backwards in date order
    #[must_use]
    pub fn ordering_violations(&self) -> &[OrderingViolation] {
        &self.violations
    }
}

fn build_weeks(posts: &[Post]) -> Vec<JSerWeek> {
    let mut dated: Vec<(DateTime<Utc>, &Post)> = Vec::with_capacity(posts.len());
    for post in posts {
        match post.timestamp() {
            Some(date) => dated.push((date, post)),
            None => tracing::warn!(url = %post.url, date = %post.date, "skipping post with unparseable date"),
        }
    }
    // stable: posts sharing a timestamp keep feed order
    dated.sort_by_key(|(date, _)| *date);

    let mut weeks = Vec::with_capacity(dated.len());
    let mut begin_date = epoch();
    for (position, (end_date, post)) in dated.into_iter().enumerate() {
        let week_number = post.post_number.unwrap_or(position as u64 + 1);
        weeks.push(JSerWeek {
            week_number,
            begin_date,
            end_date,
            post: Post {
                date: format_timestamp(&end_date),
                ..post.clone()
            },
        });
        begin_date = end_date;
    }
    weeks
}

fn find_violations(weeks: &[JSerWeek]) -> Vec<OrderingViolation> {
    weeks
        .windows(2)
        .filter(|pair| pair[0].week_number >= pair[1].week_number)
        .map(|pair| OrderingViolation {
            previous: pair[0].week_number,
            next: pair[1].week_number,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_timestamp;

    fn post(number: Option<u64>, date: &str) -> Post {
        Post {
            post_number: number,
            title: format!("post {number:?}"),
            url: format!("https://jser.info/post/{}", number.unwrap_or_default()),
            content: None,
            category: Some("JSer".to_string()),
            date: date.to_string(),
            tags: None,
        }
    }

    fn item(url: &str, date: &str) -> Item {
        Item {
            title: url.to_string(),
            url: url.to_string(),
            content: None,
            tags: None,
            date: date.to_string(),
            related_links: None,
        }
    }

    fn sample() -> JSerStat {
        let items = vec![
            item("https://a.example/", "2011-01-08T04:20:00.000Z"),
            item("https://b.example/", "2011-01-20T13:20:00.000Z"),
            item("https://c.example/", "2011-01-19T00:00:00.000Z"),
            item("https://b.example/", "2011-01-11T00:00:00.000Z"),
            item("https://late.example/", "2012-01-01T00:00:00.000Z"),
            item("https://broken.example/", "sometime"),
        ];
        // deliberately out of date order
        let posts = vec![
            post(Some(3), "2011-01-20T13:20:00.000Z"),
            post(Some(1), "2011-01-10T20:00:00+09:00"),
            post(Some(2), "2011-01-18T11:53:04.000Z"),
        ];
        JSerStat::new(Arc::new(items), &posts)
    }

    #[test]
    fn test_weeks_are_ordered_and_contiguous() {
        let stat = sample();
        let weeks = stat.jser_weeks();
        let numbers: Vec<u64> = weeks.iter().map(|w| w.week_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        assert_eq!(weeks[0].begin_date, epoch());
        for pair in weeks.windows(2) {
            assert_eq!(pair[0].end_date, pair[1].begin_date);
            assert!(pair[0].begin_date <= pair[0].end_date);
        }
        assert!(stat.is_number_monotonic());
    }

    #[test]
    fn test_find_jser_week() {
        let stat = sample();
        let week = stat.find_jser_week(3).unwrap();
        assert_eq!(format_timestamp(&week.begin_date), "2011-01-18T11:53:04.000Z");
        assert_eq!(format_timestamp(&week.end_date), "2011-01-20T13:20:00.000Z");
        assert!(stat.find_jser_week(99).is_none());
    }

    #[test]
    fn test_find_item_with_url_first_match_wins() {
        let stat = sample();
        let item = stat.find_item_with_url("https://b.example/").unwrap();
        assert_eq!(item.date, "2011-01-20T13:20:00.000Z");
        assert!(stat.find_item_with_url("https://missing.example/").is_none());
    }

    #[test]
    fn test_find_week_with_item_boundary_belongs_to_closing_post() {
        let stat = sample();
        let boundary = stat.find_item_with_url("https://b.example/").unwrap();
        assert_eq!(stat.find_week_with_item(boundary).unwrap().week_number, 3);

        let inside = stat.find_item_with_url("https://c.example/").unwrap();
        assert_eq!(stat.find_week_with_item(inside).unwrap().week_number, 3);

        let first = stat.find_item_with_url("https://a.example/").unwrap();
        assert_eq!(stat.find_week_with_item(first).unwrap().week_number, 1);
    }

    #[test]
    fn test_find_week_with_item_outside_any_week() {
        let stat = sample();
        let late = stat.find_item_with_url("https://late.example/").unwrap();
        assert!(stat.find_week_with_item(late).is_none());

        let broken = stat.find_item_with_url("https://broken.example/").unwrap();
        assert!(stat.find_week_with_item(broken).is_none());
    }

    #[test]
    fn test_find_week_with_item_matches_earliest_post_not_before_item() {
        let stat = sample();
        for item in stat.items() {
            let Some(date) = item.timestamp() else { continue };
            let expected = stat
                .jser_weeks()
                .iter()
                .filter(|w| w.end_date >= date)
                .min_by_key(|w| w.end_date)
                .map(|w| w.week_number);
            assert_eq!(
                stat.find_week_with_item(item).map(|w| w.week_number),
                expected,
                "item {}",
                item.url
            );
        }
    }

    #[test]
    fn test_find_jser_weeks_between() {
        let stat = sample();
        let weeks = stat
            .find_jser_weeks_between("2011-01-12", "2011-01-19")
            .unwrap();
        let numbers: Vec<u64> = weeks.iter().map(|w| w.week_number).collect();
        assert_eq!(numbers, vec![2, 3]);

        let none = stat
            .find_jser_weeks_between("2012-01-01", "2012-02-01")
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_jser_weeks_between_rejects_bad_dates() {
        let stat = sample();
        let err = stat
            .find_jser_weeks_between("not-a-date", "2011-01-19")
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Validation(_)));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_posts_without_numbers_use_date_position() {
        let posts = vec![
            post(None, "2011-02-01T00:00:00Z"),
            post(None, "2011-01-01T00:00:00Z"),
        ];
        let stat = JSerStat::new(Arc::new(Vec::new()), &posts);
        let weeks = stat.jser_weeks();
        assert_eq!(weeks[0].week_number, 1);
        assert_eq!(
            weeks[0].end_date,
            parse_timestamp("2011-01-01T00:00:00Z").unwrap()
        );
        assert_eq!(weeks[1].week_number, 2);
    }

    #[test]
    fn test_non_monotonic_numbers_are_flagged() {
        let posts = vec![
            post(Some(10), "2011-01-01T00:00:00Z"),
            post(Some(9), "2011-01-08T00:00:00Z"),
            post(Some(11), "2011-01-15T00:00:00Z"),
        ];
        let stat = JSerStat::new(Arc::new(Vec::new()), &posts);
        assert!(!stat.is_number_monotonic());
        assert_eq!(
            stat.ordering_violations(),
            &[OrderingViolation { previous: 10, next: 9 }]
        );
        // still ordered by date
        let numbers: Vec<u64> = stat.jser_weeks().iter().map(|w| w.week_number).collect();
        assert_eq!(numbers, vec![10, 9, 11]);
    }

    #[test]
    fn test_week_post_date_is_normalized() {
        let stat = sample();
        let week = stat.find_jser_week(1).unwrap();
        assert_eq!(week.post.date, "2011-01-10T11:00:00.000Z");
        assert_eq!(week.post.date, format_timestamp(&week.end_date));
        assert!(stat.jser_weeks().iter().all(|w| w.post.date.ends_with(".000Z")));
    }

    #[test]
    fn test_posts_with_bad_dates_are_skipped() {
        let posts = vec![post(Some(1), "2011-01-01T00:00:00Z"), post(Some(2), "??")];
        let stat = JSerStat::new(Arc::new(Vec::new()), &posts);
        assert_eq!(stat.jser_weeks().len(), 1);
        assert!(stat.find_jser_week(2).is_none());
    }
}
