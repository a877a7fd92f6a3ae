use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use onenote_core::{
    config::Config,
    mcp_server::{JsonRpcHandler, McpServer},
    transport::StdioTransport,
    OneNoteConnector,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        storage = config.storage.as_str(),
        "Starting OneNote MCP Server"
    );

    let connector = OneNoteConnector::new(config);
    let server = McpServer::new(Arc::new(connector));
    let handler = JsonRpcHandler::new(server);
    let transport = StdioTransport::new(handler);

    info!("MCP Server ready, listening on stdio");

    if let Err(e) = transport.run().await {
        error!("Transport error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Logs go to a file so stdout stays a clean JSON-RPC stream. RUST_LOG
/// overrides the configured level; stderr output is opt-in.
fn init_logging(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let file_layer = open_log_file(&config.log_file)
        .map(|file| fmt::layer().with_writer(Arc::new(file)).with_ansi(false));

    let console_layer = if config.console_logging {
        Some(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    match try_open(path) {
        Some(file) => Some(file),
        None => {
            let fallback = std::env::temp_dir().join("onenote-mcp").join("server.log");
            try_open(&fallback)
        }
    }
}

fn try_open(path: &Path) -> Option<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
