use crate::cli::{Cli, OutputFormat};
use crate::commands::notebooks::str_field;
use crate::commands::{spinner, CommandError, Result};
use crate::output::{format_output, terminal_width, truncate_str, OutputData};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use onenote_core::config::Config;
use onenote_core::graph::GraphClient;
use onenote_core::groups::list_groups_with_notebooks;
use onenote_core::token_store::TokenChain;
use owo_colors::OwoColorize;
use serde_json::Value;

pub async fn run(cli: &Cli) -> Result<()> {
    let pb = spinner("Scanning groups for notebooks...");
    let result = fetch().await;
    pb.finish_and_clear();
    let groups = result?;

    if groups.is_empty() {
        println!("{}", "No groups with OneNote notebooks found".yellow());
        return Ok(());
    }

    match cli.output {
        OutputFormat::Pretty => {
            println!("{}", "Microsoft 365 Groups".bold().cyan());
            println!();

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_width(terminal_width() as u16)
                .set_header(vec!["Name", "Notebooks", "Id"]);

            for group in &groups {
                let count = group
                    .get("notebookCount")
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                table.add_row(vec![
                    str_field(group, "displayName"),
                    count.to_string(),
                    truncate_str(&str_field(group, "id"), 40),
                ]);
            }

            println!("{}", table);
            println!();
            println!(
                "{} Use {} to browse a group's notebooks",
                "Tip:".green().bold(),
                "onenote notebooks --group <name>".cyan()
            );
        }
        _ => {
            format_output(&OutputData::Groups(groups), &cli.output)?;
        }
    }

    Ok(())
}

/// Groups are listed from the user root, so this skips the `--group`
/// resolution `graph_context` would do.
async fn fetch() -> Result<Vec<Value>> {
    let config = Config::from_env();
    let chain = TokenChain::from_config(&config);
    let token = chain.read(true).ok_or(CommandError::NotAuthenticated)?;
    let client = GraphClient::from_token(token);
    Ok(list_groups_with_notebooks(&client).await?)
}
