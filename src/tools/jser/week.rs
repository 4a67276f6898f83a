//! JSer week tools
#![allow(missing_docs)]

use crate::error::Error;
use crate::tools::{error_result, into_tool_result, json_result, parse_arguments, Tool};
use crate::utils::validation::validate_date_range;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::JSerService;

/// 按编号获取 JSer 周
#[macros::mcp_tool(
    name = "get_jser_week",
    title = "Get JSer week",
    description = "Get the JSer.info week (digest post and its date interval) with the given number.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetJSerWeekTool {
    #[json_schema(title = "Week number", description = "JSer.info issue number, e.g. 156", minimum = 1)]
    pub number: f64,
}

pub struct GetJSerWeekToolImpl {
    service: Arc<JSerService>,
}

impl GetJSerWeekToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetJSerWeekToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetJSerWeekTool::tool()
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["jser_week"]
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let params: GetJSerWeekTool = parse_arguments("get_jser_week", arguments)?;
        let number = match week_number(params.number) {
            Ok(number) => number,
            Err(err) => return Ok(error_result("get_jser_week", &err)),
        };
        let stat = match self.service.stat().await {
            Ok(stat) => stat,
            Err(err) => return Ok(error_result("get_jser_week", &err)),
        };

        let week = stat
            .find_jser_week(number)
            .ok_or_else(|| Error::NotFound(format!("no JSer week with number {number}")));
        into_tool_result("get_jser_week", week)
    }
}

/// JSON numbers arrive as floats; only whole non-negative values name a week
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn week_number(number: f64) -> crate::error::Result<u64> {
    if number.is_finite() && number >= 0.0 && number.fract() == 0.0 && number <= u64::MAX as f64 {
        Ok(number as u64)
    } else {
        Err(Error::Validation(format!(
            "week number must be a whole number, got {number}"
        )))
    }
}

/// 获取所有 JSer 周
#[macros::mcp_tool(
    name = "get_jser_weeks",
    title = "List JSer weeks",
    description = "Get every JSer.info week, oldest first.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Default, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetJSerWeeksTool {}

pub struct GetJSerWeeksToolImpl {
    service: Arc<JSerService>,
}

impl GetJSerWeeksToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetJSerWeeksToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetJSerWeeksTool::tool()
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["jser_weeks"]
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let _params: GetJSerWeeksTool = parse_arguments("get_jser_weeks", arguments)?;
        match self.service.stat().await {
            Ok(stat) => json_result(stat.jser_weeks()),
            Err(err) => Ok(error_result("get_jser_weeks", &err)),
        }
    }
}

/// 获取两个日期之间的 JSer 周
#[macros::mcp_tool(
    name = "get_jser_weeks_between",
    title = "Get JSer weeks between dates",
    description = "Get the JSer.info weeks overlapping the period between two dates (e.g. 2014-01-01 and 2014-01-08).",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetJSerWeeksBetweenTool {
    #[json_schema(title = "Begin date", description = "Start of the period, ISO-8601 (e.g. 2014-01-01)")]
    pub begin_date: String,

    #[json_schema(title = "End date", description = "End of the period, ISO-8601 (e.g. 2014-01-08)")]
    pub end_date: String,
}

pub struct GetJSerWeeksBetweenToolImpl {
    service: Arc<JSerService>,
}

impl GetJSerWeeksBetweenToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetJSerWeeksBetweenToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetJSerWeeksBetweenTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        const TOOL: &str = "get_jser_weeks_between";
        let params: GetJSerWeeksBetweenTool = parse_arguments(TOOL, arguments)?;

        // reject bad input before touching the data source
        let (begin, end) = match validate_date_range(&params.begin_date, &params.end_date) {
            Ok(range) => range,
            Err(err) => return Ok(error_result(TOOL, &err)),
        };
        let stat = match self.service.stat().await {
            Ok(stat) => stat,
            Err(err) => return Ok(error_result(TOOL, &err)),
        };

        let weeks = stat.find_jser_weeks_between_dates(begin, end);
        if weeks.is_empty() {
            let err = Error::NotFound(format!(
                "no JSer weeks between {} and {}",
                params.begin_date, params.end_date
            ));
            return Ok(error_result(TOOL, &err));
        }
        into_tool_result(TOOL, Ok(&weeks))
    }
}

/// 获取包含某个 item 的 JSer 周
#[macros::mcp_tool(
    name = "get_jser_week_with_item",
    title = "Get JSer week with item",
    description = "Get the JSer.info week whose digest introduced the item with the given URL.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetJSerWeekWithItemTool {
    #[json_schema(title = "Item URL", description = "URL of a JSer.info item")]
    pub item_url: String,
}

pub struct GetJSerWeekWithItemToolImpl {
    service: Arc<JSerService>,
}

impl GetJSerWeekWithItemToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetJSerWeekWithItemToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetJSerWeekWithItemTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        const TOOL: &str = "get_jser_week_with_item";
        let params: GetJSerWeekWithItemTool = parse_arguments(TOOL, arguments)?;
        let stat = match self.service.stat().await {
            Ok(stat) => stat,
            Err(err) => return Ok(error_result(TOOL, &err)),
        };

        let Some(item) = stat.find_item_with_url(&params.item_url) else {
            let err = Error::NotFound(format!("no item matches URL {}", params.item_url));
            return Ok(error_result(TOOL, &err));
        };

        let week = stat.find_week_with_item(item).ok_or_else(|| {
            Error::NotFound(format!(
                "no JSer week contains item '{}' ({})",
                item.title, params.item_url
            ))
        });
        into_tool_result(TOOL, week)
    }
}
