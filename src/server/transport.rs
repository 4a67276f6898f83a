//! 传输模块
//!
//! 提供 Stdio、HTTP 和 SSE 传输支持。

use crate::error::{Error, Result};
use crate::server::handler::JSerInfoHandler;
use crate::server::JSerInfoServer;
use rust_mcp_sdk::{
    error::McpSdkError,
    event_store,
    mcp_server::{hyper_server, server_runtime, HyperServerOptions, McpServerOptions},
    McpServer, StdioTransport, ToMcpServerHandler, TransportOptions,
};
use std::sync::Arc;

/// 运行 Stdio 服务器
pub async fn run_stdio_server(server: &JSerInfoServer) -> Result<()> {
    tracing::info!("starting stdio MCP server");

    let handler = JSerInfoHandler::new(Arc::new(server.clone()));
    let transport =
        StdioTransport::new(TransportOptions::default()).map_err(|e| Error::Mcp(e.to_string()))?;

    let mcp_server: Arc<rust_mcp_sdk::mcp_server::ServerRuntime> =
        server_runtime::create_server(McpServerOptions {
            server_details: server.server_info(),
            transport,
            handler: handler.to_mcp_server_handler(),
            task_store: None,
            client_task_store: None,
        });

    mcp_server
        .start()
        .await
        .map_err(|e: McpSdkError| Error::Mcp(e.to_string()))
}

/// Streamable HTTP and/or SSE on the configured host and port
async fn run_hyper_server(server: &JSerInfoServer, mode: TransportMode) -> Result<()> {
    let config = server.config();
    let sse_support = matches!(mode, TransportMode::Sse | TransportMode::Hybrid);

    let options = HyperServerOptions {
        host: config.host.clone(),
        port: config.port,
        transport_options: Arc::new(TransportOptions::default()),
        sse_support,
        event_store: Some(Arc::new(event_store::InMemoryEventStore::default())),
        task_store: None,
        client_task_store: None,
        allowed_hosts: Some(vec![
            "localhost".to_string(),
            "127.0.0.1".to_string(),
            "0.0.0.0".to_string(),
        ]),
        allowed_origins: Some(vec!["*".to_string()]),
        ..Default::default()
    };

    let handler = JSerInfoHandler::new(Arc::new(server.clone()));
    let mcp_server =
        hyper_server::create_server(server.server_info(), handler.to_mcp_server_handler(), options);

    tracing::info!(
        host = %config.host,
        port = config.port,
        %mode,
        "MCP server listening"
    );
    mcp_server
        .start()
        .await
        .map_err(|e: McpSdkError| Error::Mcp(e.to_string()))
}

/// 运行 HTTP 服务器（Streamable HTTP）
pub async fn run_http_server(server: &JSerInfoServer) -> Result<()> {
    run_hyper_server(server, TransportMode::Http).await
}

/// 运行 SSE 服务器（Server-Sent Events）
pub async fn run_sse_server(server: &JSerInfoServer) -> Result<()> {
    run_hyper_server(server, TransportMode::Sse).await
}

/// 运行混合服务器（同时支持 HTTP 和 SSE）
pub async fn run_hybrid_server(server: &JSerInfoServer) -> Result<()> {
    run_hyper_server(server, TransportMode::Hybrid).await
}

/// 传输模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Stdio 传输（用于 CLI 集成）
    Stdio,
    /// HTTP 传输（Streamable HTTP）
    Http,
    /// SSE 传输（Server-Sent Events）
    Sse,
    /// 混合模式（同时支持 HTTP 和 SSE）
    Hybrid,
}

impl TransportMode {
    /// Accepted spellings
    pub const ALL: [&'static str; 4] = ["stdio", "http", "sse", "hybrid"];
}

impl std::str::FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "sse" => Ok(TransportMode::Sse),
            "hybrid" => Ok(TransportMode::Hybrid),
            _ => Err(format!("unknown transport mode: {s}")),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Http => write!(f, "http"),
            TransportMode::Sse => write!(f, "sse"),
            TransportMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// 根据传输模式运行服务器
pub async fn run_server_with_mode(server: &JSerInfoServer, mode: TransportMode) -> Result<()> {
    match mode {
        TransportMode::Stdio => run_stdio_server(server).await,
        TransportMode::Http => run_http_server(server).await,
        TransportMode::Sse => run_sse_server(server).await,
        TransportMode::Hybrid => run_hybrid_server(server).await,
    }
}
