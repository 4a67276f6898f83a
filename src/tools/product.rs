//! Product-name lookup tool
#![allow(missing_docs)]

use crate::error::{Error, Result};
use crate::tools::jser::JSerService;
use crate::tools::{error_result, json_result, parse_arguments, Tool};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use rust_mcp_sdk::macros;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 按 URL 获取产品名
#[macros::mcp_tool(
    name = "get_product_name",
    title = "Get product name",
    description = "Resolve the product name (e.g. library or tool name) for a URL.",
    destructive_hint = false,
    idempotent_hint = true,
    open_world_hint = true,
    read_only_hint = true,
    execution(task_support = "optional")
)]
#[derive(Debug, Clone, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetProductNameTool {
    #[json_schema(title = "URL", description = "URL of the product, e.g. https://github.com/vitejs/vite")]
    pub url: String,
}

pub struct GetProductNameToolImpl {
    service: Arc<JSerService>,
}

impl GetProductNameToolImpl {
    #[must_use]
    pub fn new(service: Arc<JSerService>) -> Self {
        Self { service }
    }

    fn build_url(&self, target: &str) -> String {
        let endpoint = self.service.product_name_endpoint();
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{endpoint}{separator}url={}", urlencoding::encode(target))
    }

    async fn resolve(&self, target: &str) -> Result<serde_json::Value> {
        validate_url(target)?;

        let request_url = self.build_url(target);
        tracing::debug!(url = %request_url, "resolving product name");
        let response = self
            .service
            .client()
            .get(&request_url)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("product name request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(Error::NotFound(format!("no product name for {target}")));
        }
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "product name resolver returned {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("invalid product name response: {e}")))
    }
}

#[async_trait]
impl Tool for GetProductNameToolImpl {
    fn definition(&self) -> rust_mcp_sdk::schema::Tool {
        GetProductNameTool::tool()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        const TOOL: &str = "get_product_name";
        let params: GetProductNameTool = parse_arguments(TOOL, arguments)?;

        match self.resolve(&params.url).await {
            Ok(body) => json_result(&body),
            Err(err) => Ok(error_result(TOOL, &err)),
        }
    }
}
