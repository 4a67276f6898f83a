//! JSer.info MCP Server
//!
//! An MCP server over the JSer.info dataset: keyword search over items and
//! weekly digest posts, item-to-week resolution, week listings by number or
//! date range, and product-name lookup for URLs.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cache;
pub mod config;
pub mod error;
pub mod server;
pub mod source;
pub mod stat;
pub mod tools;
pub mod utils;

/// Re-export common types
pub use crate::error::{Error, Result};
pub use crate::server::{JSerInfoServer, ServerConfig};
pub use crate::stat::{Item, JSerStat, JSerWeek, Post};

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const NAME: &str = "jser-info-mcp";

/// Initialize logging system with configuration
///
/// Console output goes to stderr so the stdio transport keeps stdout for
/// protocol frames. `RUST_LOG`, when set, overrides the configured level.
///
/// # Errors
/// Returns an error if logging system initialization fails
pub fn init_logging_with_config(config: &crate::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match config.level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match (&config.file_path, config.enable_file) {
        (Some(file_path), true) => {
            let path = std::path::Path::new(file_path);
            let log_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let log_file_name = path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("jser-info-mcp.log"));

            std::fs::create_dir_all(log_dir).map_err(|e| {
                error::Error::Initialization(format!("Failed to create log directory: {e}"))
            })?;

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .compact(),
            )
        }
        _ => None,
    };

    // never leave the process without any log output
    let console_layer = (config.enable_console || file_layer.is_none()).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| error::Error::Initialization(e.to_string()))?;

    Ok(())
}
