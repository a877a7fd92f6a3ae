use crate::cli::{Cli, OutputFormat};
use crate::commands::notebooks::{date_field, str_field};
use crate::commands::{graph_context, spinner, Result};
use crate::output::{format_output, terminal_width, truncate_str, OutputData};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use onenote_core::onenote::list_sections;
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(cli: &Cli, notebook: Option<&str>) -> Result<()> {
    let pb = spinner("Fetching sections...");
    let result = fetch(cli, notebook).await;
    pb.finish_and_clear();
    let sections = result?;

    if sections.is_empty() {
        println!("{}", "No sections found".yellow());
        return Ok(());
    }

    match cli.output {
        OutputFormat::Pretty => {
            match notebook {
                Some(name) => println!("{} {}", "Sections in".bold().cyan(), name.bold()),
                None => println!("{}", "Sections".bold().cyan()),
            }
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(terminal_width() as u16)
                .set_header(vec!["Name", "Notebook", "Last Modified", "Id"]);

            for section in &sections {
                let parent = section
                    .get("parentNotebook")
                    .and_then(|n| n.get("displayName"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                table.add_row(vec![
                    str_field(section, "displayName"),
                    parent.to_string(),
                    date_field(section, "lastModifiedDateTime"),
                    truncate_str(&str_field(section, "id"), 40),
                ]);
            }

            println!("{}", table);
        }
        _ => {
            format_output(&OutputData::Sections(sections), &cli.output)?;
        }
    }

    Ok(())
}

async fn fetch(cli: &Cli, notebook: Option<&str>) -> Result<Vec<Value>> {
    let (client, root) = graph_context(cli).await?;
    Ok(list_sections(&client, &root, notebook).await?)
}
