//! 配置模块

use crate::cache::CacheConfig;
use crate::error::Error;
use crate::server::TransportMode;
use crate::source::SourceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 应用程序配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// Upstream feeds and offline snapshots
    pub source: SourceConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,

    /// 服务器描述
    pub description: Option<String>,

    /// 主机地址
    pub host: String,

    /// 端口
    pub port: u16,

    /// 传输模式
    pub transport_mode: String,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,

    /// 日志文件路径
    pub file_path: Option<String>,

    /// 是否启用控制台日志 (stderr)
    pub enable_console: bool,

    /// 是否启用文件日志
    pub enable_file: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let defaults = crate::server::ServerConfig::default();
        Self {
            name: defaults.name,
            description: defaults.description,
            host: defaults.host,
            port: defaults.port,
            transport_mode: defaults.transport_mode,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some("./logs/jser-info-mcp.log".to_string()),
            enable_console: true,
            enable_file: false,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    ///
    /// # Errors
    ///
    /// 如果文件不存在、无法读取或格式无效，返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # Errors
    ///
    /// 如果无法序列化配置、创建目录或写入文件，返回错误
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::Config(format!("failed to create directory: {e}")))?;
            }
        }

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("failed to write config file: {e}")))?;

        Ok(())
    }

    /// 验证配置
    ///
    /// # Errors
    ///
    /// 如果配置无效（如空主机名、无效端口等），返回错误
    pub fn validate(&self) -> Result<(), Error> {
        if self.server.host.is_empty() {
            return Err(Error::Config("server host must not be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(Error::Config("server port must not be 0".to_string()));
        }

        if self.server.transport_mode.parse::<TransportMode>().is_err() {
            return Err(Error::Config(format!(
                "invalid transport mode: {}, expected one of {:?}",
                self.server.transport_mode,
                TransportMode::ALL
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "invalid log level: {}, expected one of {valid_levels:?}",
                self.logging.level
            )));
        }

        if self.logging.enable_file && self.logging.file_path.is_none() {
            return Err(Error::Config(
                "file logging is enabled but no file_path is set".to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache ttl_secs must not be 0".to_string()));
        }

        if self.source.request_timeout_secs == 0 {
            return Err(Error::Config(
                "source request_timeout_secs must not be 0".to_string(),
            ));
        }

        if self.source.connect_timeout_secs == 0 {
            return Err(Error::Config(
                "source connect_timeout_secs must not be 0".to_string(),
            ));
        }

        if self.source.user_agent.trim().is_empty() {
            return Err(Error::Config("source user_agent must not be empty".to_string()));
        }

        for (name, value) in [
            ("items_url", &self.source.items_url),
            ("posts_url", &self.source.posts_url),
            ("post_details_url", &self.source.post_details_url),
            ("product_name_endpoint", &self.source.product_name_endpoint),
        ] {
            crate::utils::validation::validate_url(value)
                .map_err(|e| Error::Config(format!("source.{name}: {e}")))?;
        }

        Ok(())
    }

    /// 从环境变量加载配置
    ///
    /// # Errors
    ///
    /// 如果环境变量格式无效或配置验证失败，返回错误
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("JSER_INFO_NAME") {
            config.server.name = name;
        }

        if let Ok(host) = std::env::var("JSER_INFO_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("JSER_INFO_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("invalid JSER_INFO_PORT: {e}")))?;
        }

        if let Ok(mode) = std::env::var("JSER_INFO_TRANSPORT_MODE") {
            config.server.transport_mode = mode;
        }

        if let Ok(level) = std::env::var("JSER_INFO_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(ttl) = std::env::var("JSER_INFO_CACHE_TTL_SECS") {
            config.cache.ttl_secs = ttl
                .parse()
                .map_err(|e| Error::Config(format!("invalid JSER_INFO_CACHE_TTL_SECS: {e}")))?;
        }

        if let Ok(path) = std::env::var("JSER_INFO_ITEMS_FILE") {
            config.source.items_file = Some(path);
        }

        if let Ok(path) = std::env::var("JSER_INFO_POSTS_FILE") {
            config.source.posts_file = Some(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// 合并配置（环境变量优先于文件配置）
    ///
    /// Only environment values that differ from the defaults override the file.
    #[must_use]
    pub fn merge(file_config: Option<Self>, env_config: Option<Self>) -> Self {
        let mut config = file_config.unwrap_or_default();
        let Some(env) = env_config else {
            return config;
        };
        let defaults = Self::default();

        if env.server.name != defaults.server.name {
            config.server.name = env.server.name;
        }
        if env.server.host != defaults.server.host {
            config.server.host = env.server.host;
        }
        if env.server.port != defaults.server.port {
            config.server.port = env.server.port;
        }
        if env.server.transport_mode != defaults.server.transport_mode {
            config.server.transport_mode = env.server.transport_mode;
        }
        if env.logging.level != defaults.logging.level {
            config.logging.level = env.logging.level;
        }
        if env.cache.ttl_secs != defaults.cache.ttl_secs {
            config.cache.ttl_secs = env.cache.ttl_secs;
        }
        if env.source.items_file.is_some() {
            config.source.items_file = env.source.items_file;
        }
        if env.source.posts_file.is_some() {
            config.source.posts_file = env.source.posts_file;
        }

        config
    }

    /// Runtime server configuration
    #[must_use]
    pub fn to_server_config(&self) -> crate::server::ServerConfig {
        crate::server::ServerConfig {
            name: self.server.name.clone(),
            description: self.server.description.clone(),
            host: self.server.host.clone(),
            port: self.server.port,
            transport_mode: self.server.transport_mode.clone(),
            cache: self.cache.clone(),
            source: self.source.clone(),
            logging: self.logging.clone(),
            ..crate::server::ServerConfig::default()
        }
    }
}
