use crate::cli::{Cli, OutputFormat};
use crate::commands::{graph_context, spinner, Result};
use crate::output::{format_cards, format_output, OutputData};
use onenote_core::onenote::search_pages;
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(cli: &Cli, query: &str) -> Result<()> {
    let pb = spinner(&format!("Searching page titles for '{}'...", query));
    let result = fetch(cli, query).await;
    pb.finish_and_clear();
    let pages = result?;

    if pages.is_empty() {
        println!("{} '{}'", "No page titles match".yellow(), query);
        return Ok(());
    }

    match cli.output {
        OutputFormat::Pretty => {
            println!("{}", format_cards(&pages, Some(query)));
        }
        _ => {
            format_output(
                &OutputData::SearchResults {
                    query: query.to_string(),
                    pages,
                },
                &cli.output,
            )?;
        }
    }

    Ok(())
}

async fn fetch(cli: &Cli, query: &str) -> Result<Vec<Value>> {
    let (client, root) = graph_context(cli).await?;
    Ok(search_pages(&client, &root, query).await?)
}
