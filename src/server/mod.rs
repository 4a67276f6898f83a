//! 服务器模块
//!
//! MCP server wiring: the data service, the tool registry and the transports
//! that expose them.

pub mod handler;
pub mod transport;

use crate::cache::{CacheConfig, Clock, SystemClock};
use crate::config::LoggingConfig;
use crate::error::Result;
use crate::source::{self, DataSource, SourceConfig};
use crate::tools::jser::JSerService;
use crate::tools::ToolRegistry;
use rust_mcp_sdk::schema::{
    Icon, IconTheme, Implementation, InitializeResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use std::sync::Arc;

pub use transport::TransportMode;

/// 服务器配置
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,

    /// 服务器版本
    pub version: String,

    /// 服务器描述
    pub description: Option<String>,

    /// 服务器图标
    pub icons: Vec<Icon>,

    /// 网站 URL
    pub website_url: Option<String>,

    /// 主机地址
    pub host: String,

    /// 端口
    pub port: u16,

    /// Transport: stdio, http, sse or hybrid
    pub transport_mode: String,

    /// 缓存配置
    pub cache: CacheConfig,

    /// Upstream endpoints and snapshots
    pub source: SourceConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let icon = |theme| Icon {
            src: "https://jser.info/favicon.ico".to_string(),
            mime_type: Some("image/x-icon".to_string()),
            sizes: vec!["32x32".to_string()],
            theme: Some(theme),
        };

        Self {
            name: "jser-info".to_string(),
            version: crate::VERSION.to_string(),
            description: Some(
                "Search JSer.info items and weekly digests, and resolve product names".to_string(),
            ),
            icons: vec![icon(IconTheme::Light), icon(IconTheme::Dark)],
            website_url: Some("https://jser.info/".to_string()),
            host: "127.0.0.1".to_string(),
            port: 3000,
            transport_mode: "http".to_string(),
            cache: CacheConfig::default(),
            source: SourceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// MCP 服务器
#[derive(Clone)]
pub struct JSerInfoServer {
    config: ServerConfig,
    tool_registry: Arc<ToolRegistry>,
    service: Arc<JSerService>,
}

impl JSerInfoServer {
    /// Create a server over the source described by `config.source`
    ///
    /// # Errors
    ///
    /// Fails when a snapshot file cannot be read or the HTTP client cannot be
    /// built.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let source: Arc<dyn DataSource> = Arc::from(source::create_source(&config.source)?);
        Self::with_source(config, source, Arc::new(SystemClock))
    }

    /// Create a server and, when `source.warm_up` is set, fill the caches
    /// before returning
    pub async fn new_async(config: ServerConfig) -> Result<Self> {
        let server = Self::new(config)?;
        if server.config.source.warm_up {
            server.service.warm_up().await;
        }
        Ok(server)
    }

    /// Create a server over an explicit data source and clock
    pub fn with_source(
        config: ServerConfig,
        source: Arc<dyn DataSource>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let service = JSerService::new(source, &config.cache, &config.source, clock)?;
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Create a server around an existing service
    #[must_use]
    pub fn with_service(config: ServerConfig, service: Arc<JSerService>) -> Self {
        let tool_registry = Arc::new(crate::tools::create_default_registry(&service));
        Self {
            config,
            tool_registry,
            service,
        }
    }

    /// 获取服务器配置
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// 获取工具注册器
    #[must_use]
    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Data service behind the tools
    #[must_use]
    pub fn service(&self) -> &Arc<JSerService> {
        &self.service
    }

    /// 获取服务器信息
    #[must_use]
    pub fn server_info(&self) -> InitializeResult {
        InitializeResult {
            server_info: Implementation {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
                title: Some("JSer.info MCP Server".to_string()),
                description: self.config.description.clone(),
                icons: self.config.icons.clone(),
                website_url: self.config.website_url.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools { list_changed: None }),
                resources: None,
                prompts: None,
                experimental: None,
                completions: None,
                logging: None,
                tasks: None,
            },
            protocol_version: ProtocolVersion::V2025_11_25.into(),
            instructions: Some(
                "Query JSer.info, a weekly digest of JavaScript and web development news. \
                 Search items or weekly posts, look up the week an item was published in, \
                 list weeks between dates, and resolve product names from URLs."
                    .to_string(),
            ),
            meta: None,
        }
    }

    /// 运行 Stdio 服务器
    pub async fn run_stdio(&self) -> Result<()> {
        transport::run_stdio_server(self).await
    }

    /// 运行 HTTP 服务器
    pub async fn run_http(&self) -> Result<()> {
        transport::run_http_server(self).await
    }

    /// 运行 SSE 服务器
    pub async fn run_sse(&self) -> Result<()> {
        transport::run_sse_server(self).await
    }
}
