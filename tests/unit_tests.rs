//! 单元测试

use jser_info_mcp::{
    stat::{Item, JSerStat, Post},
    tools::jser::search::{search_items, search_posts, SearchOptions, SortKey, SortOrder},
    utils::time::{format_timestamp, parse_timestamp},
};
use std::sync::Arc;

fn load<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn fixture_stat() -> JSerStat {
    let items: Vec<Item> = load("items.json");
    let posts: Vec<Post> = load("posts.json");
    JSerStat::new(Arc::new(items), &posts)
}

// ============================================================================
// 索引测试
// ============================================================================

/// 每周区间首尾相接
#[test]
fn test_weeks_are_contiguous_and_ordered() {
    let stat = fixture_stat();
    let weeks = stat.jser_weeks();
    assert_eq!(weeks.len(), 8);
    for pair in weeks.windows(2) {
        assert_eq!(pair[0].end_date, pair[1].begin_date);
        assert!(pair[0].begin_date <= pair[0].end_date);
        assert!(pair[0].week_number < pair[1].week_number);
    }
    assert!(stat.is_number_monotonic());
}

/// 每个有周的 item 恰好属于一周
#[test]
fn test_every_item_belongs_to_at_most_one_week() {
    let stat = fixture_stat();
    for item in stat.items() {
        let date = parse_timestamp(&item.date).unwrap();
        let containing: Vec<u64> = stat
            .jser_weeks()
            .iter()
            .filter(|week| week.contains(date))
            .map(|week| week.week_number)
            .collect();
        assert!(containing.len() <= 1, "{}: {containing:?}", item.url);
        assert_eq!(
            stat.find_week_with_item(item).map(|week| week.week_number),
            containing.first().copied()
        );
    }
}

/// 边界上的 item 属于以该时间结束的周
#[test]
fn test_item_on_boundary_belongs_to_closing_week() {
    let stat = fixture_stat();
    let item = stat
        .find_item_with_url("http://nodejs.org/release/v0.3.5")
        .unwrap();
    let week = stat.find_week_with_item(item).unwrap();
    assert_eq!(week.week_number, 3);
    assert_eq!(format_timestamp(&week.begin_date), "2011-01-18T11:53:04.000Z");
}

/// 日期区间查询
#[test]
fn test_weeks_between() {
    let stat = fixture_stat();
    let numbers = |begin: &str, end: &str| -> Vec<u64> {
        stat.find_jser_weeks_between(begin, end)
            .unwrap()
            .iter()
            .map(|week| week.week_number)
            .collect()
    };

    assert_eq!(numbers("2014-01-01", "2014-01-08"), vec![156, 157]);
    // a range inside one week
    assert_eq!(numbers("2014-01-07", "2014-01-08"), vec![157]);
    // a week ending exactly at the range start still overlaps
    assert_eq!(numbers("2014-01-13T14:41:46Z", "2014-01-14"), vec![157, 158]);
    assert!(numbers("2015-01-01", "2015-12-31").is_empty());
}

// ============================================================================
// 搜索测试
// ============================================================================

/// 搜索 item 与 post 的匹配语义不同
#[test]
fn test_item_and_post_search_semantics_differ() {
    let items: Vec<Item> = load("items.json");
    let posts: Vec<Post> = load("posts.json");
    let options = SearchOptions {
        limit: 100,
        ..SearchOptions::default()
    };

    assert_eq!(search_items(&items, "node release", &options).len(), 5);
    assert_eq!(search_posts(&posts, "node release", &options).len(), 1);
    assert_eq!(search_posts(&posts, "NODE RELEASE", &options).len(), 1);
    assert_eq!(search_posts(&posts, "release node", &options).len(), 0);
}

/// 日期排序
#[test]
fn test_search_sorted_by_date_ascending() {
    let posts: Vec<Post> = load("posts.json");
    let options = SearchOptions {
        limit: 3,
        offset: 0,
        sort: SortKey::Date,
        order: SortOrder::Asc,
    };
    let found: Vec<Option<u64>> = search_posts(&posts, "", &options)
        .iter()
        .map(|post| post.post_number)
        .collect();
    assert_eq!(found, vec![Some(1), Some(2), Some(3)]);
}

// ============================================================================
// 工具参数测试
// ============================================================================

/// 测试 GetJSerWeeksBetweenTool 参数使用 camelCase
#[test]
fn test_weeks_between_params_are_camel_case() {
    use jser_info_mcp::tools::jser::GetJSerWeeksBetweenTool;

    let params: GetJSerWeeksBetweenTool =
        serde_json::from_value(serde_json::json!({"beginDate": "2014-01-01", "endDate": "2014-01-08"}))
            .unwrap();
    assert_eq!(params.begin_date, "2014-01-01");
    assert_eq!(params.end_date, "2014-01-08");
}

/// 测试工具定义
#[test]
fn test_tool_definitions() {
    use jser_info_mcp::tools::jser::{GetJSerWeekWithItemTool, SearchItemsTool, SearchPostsTool};

    assert_eq!(SearchItemsTool::tool().name, "search_items");
    assert_eq!(SearchPostsTool::tool().name, "search_posts");
    assert_eq!(GetJSerWeekWithItemTool::tool().name, "get_jser_week_with_item");
    assert!(SearchItemsTool::tool().description.is_some());
}

// ============================================================================
// 错误处理测试
// ============================================================================

/// 测试错误类型转换
#[test]
fn test_error_conversions() {
    use jser_info_mcp::error::Error;

    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::Io(_)));

    let json_error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json(_)));
    assert_eq!(error.kind(), "json");
}

/// 测试错误显示
#[test]
fn test_error_display() {
    use jser_info_mcp::error::Error;

    let error = Error::NotFound("no item matches URL https://a.example/".to_string());
    assert!(error.to_string().contains("Not found"));
    assert!(error.to_string().contains("https://a.example/"));

    let error = Error::Validation("invalid beginDate 'x'".to_string());
    assert!(error.to_string().contains("Invalid input"));

    let error = Error::Upstream("product name resolver returned 500".to_string());
    assert_eq!(error.kind(), "upstream");
}
