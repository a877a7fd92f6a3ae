pub mod create;
pub mod groups;
pub mod info;
pub mod login;
pub mod notebooks;
pub mod page;
pub mod pages;
pub mod search;
pub mod sections;
pub mod token;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use onenote_core::config::Config;
use onenote_core::graph::GraphClient;
use onenote_core::groups::resolve_group;
use onenote_core::onenote::OnenoteRoot;
use onenote_core::token_store::TokenChain;
use serde_json::Value;
use thiserror::Error;

use crate::cli::Cli;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Not signed in. Run 'onenote login' or set GRAPH_ACCESS_TOKEN.")]
    NotAuthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Core library error: {0}")]
    Core(#[from] onenote_core::error::ConnectorError),

    #[error("Token storage error: {0}")]
    TokenStore(#[from] onenote_core::token_store::StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Resolve the saved token and the OneNote root the global `--group` flag
/// selects. Every data command starts here.
pub async fn graph_context(cli: &Cli) -> Result<(GraphClient, OnenoteRoot)> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let token = chain.read(true).ok_or(CommandError::NotAuthenticated)?;
    let client = GraphClient::from_token(token);

    let root = match &cli.group {
        Some(query) => {
            let group = resolve_group(&client, query).await?;
            let id = group
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| CommandError::InvalidInput("group record missing id".to_string()))?;
            OnenoteRoot::Group(id.to_string())
        }
        None => OnenoteRoot::Me,
    };
    Ok((client, root))
}

/// Spinner shown while a Graph request is in flight. Callers must
/// `finish_and_clear` before printing.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| CommandError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| CommandError::Clipboard(e.to_string()))?;
    Ok(())
}
