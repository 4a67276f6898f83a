//! MCP tools module
//!
//! Provides the JSer.info query tools and the registry the server dispatches
//! through.

pub mod jser;
pub mod product;

use crate::error::Error;
use async_trait::async_trait;
use rust_mcp_sdk::schema::{CallToolError, CallToolResult, Tool as McpTool};
use serde::Serialize;
use std::sync::Arc;

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool definition
    fn definition(&self) -> McpTool;

    /// Legacy names that dispatch to this tool but are not listed
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Execute tool
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError>;
}

/// Tool registry
pub struct ToolRegistry {
    /// Tools keyed by their primary name
    tools: Vec<(String, Box<dyn Tool>)>,
}

impl ToolRegistry {
    /// Create a new tool registry
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register tool
    #[must_use]
    pub fn register<T: Tool + 'static>(mut self, tool: T) -> Self {
        let name = tool.definition().name;
        self.tools.push((name, Box::new(tool)));
        self
    }

    /// Get all tool definitions
    #[must_use]
    pub fn get_tools(&self) -> Vec<McpTool> {
        self.tools.iter().map(|(_, tool)| tool.definition()).collect()
    }

    /// Whether `name` (or an alias) is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|(primary, tool)| {
                primary == name || tool.aliases().iter().any(|alias| *alias == name)
            })
            .map(|(_, tool)| tool.as_ref())
    }

    /// Execute tool
    pub async fn execute_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let Some(tool) = self.find(name) else {
            return Err(CallToolError::unknown_tool(name.to_string()));
        };

        // parameterless calls may arrive without an arguments object
        let arguments = if arguments.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            arguments
        };

        tracing::debug!(tool = name, "executing tool");
        tool.execute(arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create default tool registry
#[must_use]
pub fn create_default_registry(service: &Arc<jser::JSerService>) -> ToolRegistry {
    ToolRegistry::new()
        .register(jser::search::SearchItemsToolImpl::new(service.clone()))
        .register(jser::search::SearchPostsToolImpl::new(service.clone()))
        .register(product::GetProductNameToolImpl::new(service.clone()))
        .register(jser::week::GetJSerWeekToolImpl::new(service.clone()))
        .register(jser::week::GetJSerWeeksToolImpl::new(service.clone()))
        .register(jser::week::GetJSerWeeksBetweenToolImpl::new(service.clone()))
        .register(jser::week::GetJSerWeekWithItemToolImpl::new(service.clone()))
        .register(jser::item::GetJSerItemWithUrlToolImpl::new(service.clone()))
}

/// Pretty JSON (two-space indent) in a single text block
pub fn json_result<T: Serialize + ?Sized>(
    value: &T,
) -> std::result::Result<CallToolResult, CallToolError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CallToolError::from_message(format!("JSON serialization failed: {e}")))?;
    Ok(CallToolResult::text_content(vec![text.into()]))
}

/// Tool-level failure: a normal result flagged with `isError`
#[must_use]
pub fn error_result(tool: &str, err: &Error) -> CallToolResult {
    match err {
        Error::NotFound(_) | Error::Validation(_) | Error::Url(_) => {
            tracing::debug!(tool, kind = err.kind(), "{err}");
        }
        _ => tracing::error!(tool, kind = err.kind(), "{err}"),
    }

    let mut result = CallToolResult::text_content(vec![err.to_string().into()]);
    result.is_error = Some(true);
    result
}

/// Map a domain result onto a tool result
pub fn into_tool_result<T: Serialize + ?Sized>(
    tool: &str,
    outcome: crate::error::Result<&T>,
) -> std::result::Result<CallToolResult, CallToolError> {
    match outcome {
        Ok(value) => json_result(value),
        Err(err) => Ok(error_result(tool, &err)),
    }
}

/// Parse tool arguments into the tool's parameter struct
pub fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> std::result::Result<T, CallToolError> {
    serde_json::from_value(arguments).map_err(|e| {
        CallToolError::invalid_arguments(tool, Some(format!("Failed to parse arguments: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTool {
        definitions: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn definition(&self) -> McpTool {
            self.definitions.fetch_add(1, Ordering::SeqCst);
            jser::week::GetJSerWeeksTool::tool()
        }

        fn aliases(&self) -> &'static [&'static str] {
            &["jser_weeks"]
        }

        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<CallToolResult, CallToolError> {
            json_result(&arguments)
        }
    }

    #[tokio::test]
    async fn test_dispatch_does_not_rebuild_definitions() {
        let definitions = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::new().register(CountingTool {
            definitions: definitions.clone(),
        });
        assert_eq!(definitions.load(Ordering::SeqCst), 1);

        for name in ["get_jser_weeks", "jser_weeks", "get_jser_weeks"] {
            let result = registry
                .execute_tool(name, serde_json::Value::Null)
                .await
                .unwrap();
            assert_ne!(result.is_error, Some(true));
        }
        assert!(registry.contains("jser_weeks"));
        assert!(!registry.contains("jser_week"));
        assert_eq!(definitions.load(Ordering::SeqCst), 1);
    }
}
