use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData};
use onenote_core::config::Config;
use onenote_core::token_store::TokenChain;
use serde_json::json;

/// Mirrors the MCP server's `info` tool so the two surfaces can be
/// compared side by side.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);

    let info = json!({
        "name": "onenote",
        "version": env!("CARGO_PKG_VERSION"),
        "token_storage": {
            "storage_mode": config.storage.as_str(),
            "secure_store_available": chain.secure_store_available(),
            "token_file": config.token_file.display().to_string(),
        },
        "logging": {
            "log_file": config.log_file.display().to_string(),
            "log_level": config.log_level,
            "console_logging": config.console_logging,
        },
        "env": {
            "client_id_configured": config.client_id_from_env,
            "graph_access_token_set": config.env_token_set(),
        },
    });

    format_output(&OutputData::ServerInfo(info), &cli.output)?;

    Ok(())
}
