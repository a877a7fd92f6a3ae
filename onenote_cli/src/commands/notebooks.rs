use crate::cli::{Cli, OutputFormat};
use crate::commands::{graph_context, spinner, Result};
use crate::output::{format_output, terminal_width, truncate_str, OutputData};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use onenote_core::onenote::list_notebooks;
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(cli: &Cli) -> Result<()> {
    let pb = spinner("Fetching notebooks...");
    let result = fetch(cli).await;
    pb.finish_and_clear();
    let notebooks = result?;

    if notebooks.is_empty() {
        println!("{}", "No notebooks found".yellow());
        return Ok(());
    }

    match cli.output {
        OutputFormat::Pretty => {
            let term_width = terminal_width();

            println!("{}", "Notebooks".bold().cyan());
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(term_width as u16)
                .set_header(vec!["Name", "Last Modified", "Id"]);

            for notebook in &notebooks {
                table.add_row(vec![
                    str_field(notebook, "displayName"),
                    date_field(notebook, "lastModifiedDateTime"),
                    truncate_str(&str_field(notebook, "id"), 40),
                ]);
            }

            println!("{}", table);
            println!();
            println!(
                "{} Use {} to look inside one",
                "Tip:".green().bold(),
                "onenote sections <notebook>".cyan()
            );
        }
        _ => {
            format_output(&OutputData::Notebooks(notebooks), &cli.output)?;
        }
    }

    Ok(())
}

async fn fetch(cli: &Cli) -> Result<Vec<Value>> {
    let (client, root) = graph_context(cli).await?;
    Ok(list_notebooks(&client, &root).await?)
}

pub fn str_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// ISO datetimes show as their date part in tables.
pub fn date_field(record: &Value, key: &str) -> String {
    let raw = str_field(record, key);
    raw.split('T').next().unwrap_or(&raw).to_string()
}
