//! Item lookup tool
#![allow(missing_docs)]

use crate::error::Error;
use crate::tools::{error_result, into_tool_result, parse_arguments, Tool};
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::JSerService;

/// 按 URL 获取 item
#[macros::mcp_tool(
    name = "get_jser_item_with_url",
    title = "Get JSer item by URL",
    description = "Get the JSer.info item whose URL exactly matches the given URL.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = false,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetJSerItemWithUrlTool {
    #[json_schema(title = "URL", description = "Exact URL of the item")]
    pub url: String,
}

pub struct GetJSerItemWithUrlToolImpl {
    service: Arc<JSerService>,
}

impl GetJSerItemWithUrlToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for GetJSerItemWithUrlToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetJSerItemWithUrlTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        const TOOL: &str = "get_jser_item_with_url";
        let params: GetJSerItemWithUrlTool = parse_arguments(TOOL, arguments)?;
        let stat = match self.service.stat().await {
            Ok(stat) => stat,
            Err(err) => return Ok(error_result(TOOL, &err)),
        };

        let item = stat
            .find_item_with_url(&params.url)
            .ok_or_else(|| Error::NotFound(format!("no item matches URL {}", params.url)));
        into_tool_result(TOOL, item)
    }
}
