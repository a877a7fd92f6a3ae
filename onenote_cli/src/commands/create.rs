use std::path::Path;

use crate::cli::Cli;
use crate::commands::{graph_context, spinner, Result};
use crate::output::{format_output, OutputData};
use onenote_core::onenote::{create_page, resolve_section_id, SectionLookup};
use serde_json::Value;

pub async fn run(
    cli: &Cli,
    notebook: Option<&str>,
    section: Option<&str>,
    section_id: Option<&str>,
    title: Option<&str>,
    html: Option<&str>,
    html_file: Option<&Path>,
) -> Result<()> {
    let body = match (html, html_file) {
        (Some(html), _) => Some(html.to_string()),
        (None, Some(path)) => Some(std::fs::read_to_string(path)?),
        (None, None) => None,
    };

    let pb = spinner("Creating page...");
    let result = create(cli, notebook, section, section_id, title, body.as_deref()).await;
    pb.finish_and_clear();
    let page = result?;

    format_output(&OutputData::PageCreated(page), &cli.output)?;

    Ok(())
}

async fn create(
    cli: &Cli,
    notebook: Option<&str>,
    section: Option<&str>,
    section_id: Option<&str>,
    title: Option<&str>,
    html: Option<&str>,
) -> Result<Value> {
    let (client, root) = graph_context(cli).await?;
    let lookup = SectionLookup {
        notebook_query: notebook,
        section_id,
        section_name: section,
    };
    let section_id = resolve_section_id(&client, &root, lookup).await?;
    Ok(create_page(&client, &root, &section_id, title, html).await?)
}
