//! JSer.info MCP 服务器主程序

use clap::{Parser, Subcommand};
use jser_info_mcp::config::AppConfig;
use jser_info_mcp::server::{transport, TransportMode};
use jser_info_mcp::JSerInfoServer;
use rust_mcp_sdk::schema::ContentBlock;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jser-info-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for the JSer.info dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// 启用调试日志
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动服务器
    Serve {
        /// 传输模式 [stdio, http, sse, hybrid]
        #[arg(short, long)]
        mode: Option<String>,

        /// 监听主机
        #[arg(long)]
        host: Option<String>,

        /// 监听端口
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve items from this JSON file instead of jser.info
        #[arg(long)]
        items_file: Option<String>,

        /// Serve posts from this JSON file instead of jser.info
        #[arg(long)]
        posts_file: Option<String>,

        /// Skip fetching the feeds at startup
        #[arg(long)]
        no_warm_up: bool,
    },

    /// 生成配置文件
    Config {
        /// 输出文件路径
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// Run one tool and print its result
    Call {
        /// Tool name, e.g. search_items or get_jser_week
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// 显示版本信息
    Version,
}

/// Command-line overrides for `serve`
#[derive(Default)]
struct Overrides {
    mode: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    items_file: Option<String>,
    posts_file: Option<String>,
    no_warm_up: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            mode,
            host,
            port,
            items_file,
            posts_file,
            no_warm_up,
        } => {
            let overrides = Overrides {
                mode,
                host,
                port,
                items_file,
                posts_file,
                no_warm_up,
            };
            serve_command(&cli.config, cli.debug, overrides).await?;
        }
        Commands::Config { output, force } => {
            config_command(&output, force)?;
        }
        Commands::Call { tool, args } => {
            call_command(&cli.config, cli.debug, &tool, &args).await?;
        }
        Commands::Version => {
            version_command();
        }
    }

    Ok(())
}

/// 启动服务器命令
async fn serve_command(
    config_path: &Path,
    debug: bool,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, overrides)?;
    init_logging(&config, debug)?;

    let mode: TransportMode = config.server.transport_mode.parse()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), %mode, "starting JSer.info MCP server");

    let server = JSerInfoServer::new_async(config.to_server_config())
        .await
        .map_err(|e| format!("failed to create server: {e}"))?;

    transport::run_server_with_mode(&server, mode)
        .await
        .map_err(|e| format!("{mode} server failed: {e}"))?;

    Ok(())
}

/// 加载配置: file, then `JSER_INFO_*` variables, then command-line flags
fn load_config(
    config_path: &Path,
    overrides: Overrides,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let file_config = if config_path.exists() {
        Some(AppConfig::from_file(config_path)?)
    } else {
        None
    };
    let env_config = AppConfig::from_env()?;
    let mut config = AppConfig::merge(file_config, Some(env_config));

    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(mode) = overrides.mode {
        config.server.transport_mode = mode;
    }
    if let Some(path) = overrides.items_file {
        config.source.items_file = Some(path);
    }
    if let Some(path) = overrides.posts_file {
        config.source.posts_file = Some(path);
    }
    if overrides.no_warm_up {
        config.source.warm_up = false;
    }

    config
        .validate()
        .map_err(|e| format!("invalid configuration: {e}"))?;
    Ok(config)
}

fn init_logging(config: &AppConfig, debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut logging = config.logging.clone();
    if debug {
        logging.level = "debug".to_string();
    }
    jser_info_mcp::init_logging_with_config(&logging)
        .map_err(|e| format!("failed to initialize logging: {e}"))?;
    Ok(())
}

/// 生成配置文件命令
fn config_command(output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "config file already exists: {}, use --force to overwrite",
            output.display()
        )
        .into());
    }

    AppConfig::default()
        .save_to_file(output)
        .map_err(|e| format!("failed to save config file: {e}"))?;

    println!("Config file written to {}", output.display());
    Ok(())
}

/// Execute a single tool call against the configured data source
async fn call_command(
    config_path: &Path,
    debug: bool,
    tool: &str,
    args: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, Overrides::default())?;
    init_logging(&config, debug)?;

    let arguments: serde_json::Value =
        serde_json::from_str(args).map_err(|e| format!("--args is not valid JSON: {e}"))?;

    let server = JSerInfoServer::new(config.to_server_config())?;
    let result = server
        .tool_registry()
        .execute_tool(tool, arguments)
        .await
        .map_err(|e| format!("{tool} failed: {e}"))?;

    for content in &result.content {
        match content {
            ContentBlock::TextContent(text) => println!("{}", text.text),
            other => println!("{other:?}"),
        }
    }

    if result.is_error == Some(true) {
        return Err(format!("{tool} returned an error").into());
    }
    Ok(())
}

/// 版本命令
fn version_command() {
    println!("JSer.info MCP server v{}", env!("CARGO_PKG_VERSION"));
    println!("Built: {}", env!("BUILD_TIMESTAMP"));
    println!("Git commit: {}", env!("GIT_COMMIT"));
    println!("Rust: {}", env!("RUST_VERSION"));
}
