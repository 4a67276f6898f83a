//! 错误处理模块

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 初始化错误
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream data source unavailable and nothing cached to fall back on
    #[error("Failed to fetch data: {0}")]
    Fetch(String),

    /// Malformed tool input (unparseable date, invalid URL, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Well-formed query that matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Product-name resolver failure other than "no product"
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// MCP 协议错误
    #[error("MCP protocol error: {0}")]
    Mcp(String),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL 解析错误
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Reqwest 错误
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// 其他错误
    #[error("Unknown error: {0}")]
    Other(String),
}

impl Error {
    /// Short machine-readable kind, used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Initialization(_) => "initialization",
            Error::Config(_) => "config",
            Error::Fetch(_) | Error::Reqwest(_) => "fetch",
            Error::Validation(_) | Error::Url(_) => "validation",
            Error::NotFound(_) => "not_found",
            Error::Upstream(_) => "upstream",
            Error::Mcp(_) => "mcp",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Other(_) => "other",
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, Error>;

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
