use crate::cli::{Cli, OutputFormat};
use crate::commands::notebooks::{date_field, str_field};
use crate::commands::{graph_context, spinner, Result};
use crate::output::{format_output, terminal_width, truncate_str, OutputData};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use onenote_core::onenote::{list_pages_in_section, resolve_section_id, SectionLookup};
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(
    cli: &Cli,
    notebook: Option<&str>,
    section: Option<&str>,
    section_id: Option<&str>,
) -> Result<()> {
    let pb = spinner("Fetching pages...");
    let result = fetch(cli, notebook, section, section_id).await;
    pb.finish_and_clear();
    let (section_id, pages) = result?;

    if pages.is_empty() {
        println!("{}", "No pages in this section".yellow());
        return Ok(());
    }

    match cli.output {
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                "Pages in section".bold().cyan(),
                truncate_str(&section_id, 40).dimmed()
            );
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(terminal_width() as u16)
                .set_header(vec!["Title", "Created", "Id"]);

            for page in &pages {
                table.add_row(vec![
                    str_field(page, "title"),
                    date_field(page, "createdDateTime"),
                    truncate_str(&str_field(page, "id"), 40),
                ]);
            }

            println!("{}", table);
            println!();
            println!(
                "{} Use {} to print one",
                "Tip:".green().bold(),
                "onenote page <title>".cyan()
            );
        }
        _ => {
            format_output(&OutputData::Pages { section_id, pages }, &cli.output)?;
        }
    }

    Ok(())
}

async fn fetch(
    cli: &Cli,
    notebook: Option<&str>,
    section: Option<&str>,
    section_id: Option<&str>,
) -> Result<(String, Vec<Value>)> {
    let (client, root) = graph_context(cli).await?;
    let lookup = SectionLookup {
        notebook_query: notebook,
        section_id,
        section_name: section,
    };
    let section_id = resolve_section_id(&client, &root, lookup).await?;
    let pages = list_pages_in_section(&client, &root, &section_id).await?;
    Ok((section_id, pages))
}
