use std::path::Path;

use crate::cli::Cli;
use crate::commands::{copy_to_clipboard, graph_context, spinner, Result};
use crate::output::{format_output, name_of, OutputData};
use onenote_core::pages::get_page_content;
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(cli: &Cli, query: Option<&str>, out: Option<&Path>) -> Result<()> {
    let pb = spinner("Fetching page...");
    let result = fetch(cli, query).await;
    pb.finish_and_clear();
    let (page, content) = result?;

    if let Some(path) = out {
        std::fs::write(path, &content)?;
        println!(
            "{} Wrote '{}' to {}",
            "✓".green().bold(),
            name_of(&page).bold(),
            path.display().to_string().cyan()
        );
        return Ok(());
    }

    if cli.copy {
        copy_to_clipboard(&content)?;
    }

    format_output(&OutputData::PageContent { page, content }, &cli.output)?;

    if cli.copy {
        println!("{}", "✓ Copied page content to clipboard".green());
    }

    Ok(())
}

/// The single query argument matches ids first, then titles, mirroring
/// how page lookup behaves in the MCP tool.
async fn fetch(cli: &Cli, query: Option<&str>) -> Result<(Value, String)> {
    let (client, root) = graph_context(cli).await?;
    Ok(get_page_content(&client, &root, query, query).await?)
}
