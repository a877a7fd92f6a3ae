use crate::cli::OutputFormat;
use crate::commands::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod pretty;
pub use pretty::{format_cards, format_pretty, terminal_width, truncate_str};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    Notebooks(Vec<Value>),
    Sections(Vec<Value>),
    Pages {
        section_id: String,
        pages: Vec<Value>,
    },
    PageContent {
        page: Value,
        content: String,
    },
    PageCreated(Value),
    SearchResults {
        query: String,
        pages: Vec<Value>,
    },
    Groups(Vec<Value>),
    TokenStatus(Value),
    ServerInfo(Value),
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            format_text_output(data)?;
        }
        OutputFormat::Markdown => {
            format_markdown_output(data)?;
        }
        OutputFormat::Pretty => {
            format_pretty_output(data)?;
        }
    }
    Ok(())
}

fn format_text_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::Notebooks(notebooks) => {
            for notebook in notebooks {
                println!("{}\t{}", name_of(notebook), id_of(notebook));
            }
        }
        OutputData::Sections(sections) => {
            for section in sections {
                println!("{}\t{}", name_of(section), id_of(section));
            }
        }
        OutputData::Pages { section_id, pages } => {
            println!("Section: {}", section_id);
            for page in pages {
                println!("{}\t{}", name_of(page), id_of(page));
            }
        }
        OutputData::PageContent { content, .. } => {
            // Raw body only, so `--output text` pipes cleanly into a file.
            println!("{}", content);
        }
        OutputData::PageCreated(page) => {
            println!("Created: {}\t{}", name_of(page), id_of(page));
        }
        OutputData::SearchResults { query, pages } => {
            println!("Search results for '{}':", query);
            for page in pages {
                println!("{}\t{}", name_of(page), id_of(page));
            }
        }
        OutputData::Groups(groups) => {
            for group in groups {
                println!("{}\t{}", name_of(group), id_of(group));
            }
        }
        OutputData::TokenStatus(status) => {
            println!("{}", serde_json::to_string_pretty(status)?);
        }
        OutputData::ServerInfo(info) => {
            println!("{}", serde_json::to_string_pretty(info)?);
        }
    }
    Ok(())
}

fn format_pretty_output(data: &OutputData) -> Result<()> {
    use owo_colors::OwoColorize;

    match data {
        OutputData::Notebooks(notebooks) => {
            println!("{}", "Notebooks".cyan().bold());
            println!();
            let value = serde_json::to_value(notebooks)?;
            println!("{}", format_pretty(&value));
        }
        OutputData::Sections(sections) => {
            println!("{}", "Sections".cyan().bold());
            println!();
            let value = serde_json::to_value(sections)?;
            println!("{}", format_pretty(&value));
        }
        OutputData::Pages { section_id, pages } => {
            println!(
                "{} {}",
                "Pages in section".dimmed(),
                section_id.cyan().bold()
            );
            println!();
            let value = serde_json::to_value(pages)?;
            println!("{}", format_pretty(&value));
        }
        OutputData::PageContent { page, content } => {
            println!("{}", name_of(page).bold());
            println!();
            println!("{}", content);
        }
        OutputData::PageCreated(page) => {
            println!(
                "{} {} ({})",
                "Created".green().bold(),
                name_of(page).bold(),
                id_of(page).dimmed()
            );
        }
        OutputData::SearchResults { query, pages } => {
            println!("{} {}", "Search:".dimmed(), query.cyan().bold());
            println!();
            let value = serde_json::to_value(pages)?;
            println!("{}", format_pretty(&value));
        }
        OutputData::Groups(groups) => {
            println!("{}", "Groups".cyan().bold());
            println!();
            let value = serde_json::to_value(groups)?;
            println!("{}", format_pretty(&value));
        }
        OutputData::TokenStatus(status) => {
            println!("{}", "Token".cyan().bold());
            println!();
            println!("{}", format_pretty(status));
        }
        OutputData::ServerInfo(info) => {
            println!("{}", "OneNote MCP".cyan().bold());
            println!();
            println!("{}", format_pretty(info));
        }
    }
    Ok(())
}

fn format_markdown_output(data: &OutputData) -> Result<()> {
    match data {
        OutputData::Notebooks(notebooks) => {
            println!("# Notebooks\n");
            for notebook in notebooks {
                println!("- **{}** (`{}`)", name_of(notebook), id_of(notebook));
            }
            println!();
        }
        OutputData::Sections(sections) => {
            println!("# Sections\n");
            for section in sections {
                println!("- **{}** (`{}`)", name_of(section), id_of(section));
            }
            println!();
        }
        OutputData::Pages { section_id, pages } => {
            println!("# Pages\n");
            println!("**Section:** `{}`\n", section_id);
            for page in pages {
                println!("- **{}** (`{}`)", name_of(page), id_of(page));
            }
            println!();
        }
        OutputData::PageContent { page, content } => {
            println!("# {}\n", name_of(page));
            println!("```html");
            println!("{}", content);
            println!("```\n");
        }
        OutputData::PageCreated(page) => {
            println!("# Page Created\n");
            println!("**Title:** {}\n", name_of(page));
            println!("**ID:** `{}`\n", id_of(page));
        }
        OutputData::SearchResults { query, pages } => {
            println!("# Search Results\n");
            println!("**Query:** {}\n", query);
            for page in pages {
                println!("- **{}** (`{}`)", name_of(page), id_of(page));
            }
            println!();
        }
        OutputData::Groups(groups) => {
            println!("# Groups\n");
            for group in groups {
                println!("- **{}** (`{}`)", name_of(group), id_of(group));
            }
            println!();
        }
        OutputData::TokenStatus(status) => {
            println!("# Token Status\n");
            println!("```json");
            println!("{}", serde_json::to_string_pretty(status)?);
            println!("```\n");
        }
        OutputData::ServerInfo(info) => {
            println!("# Server Info\n");
            println!("```json");
            println!("{}", serde_json::to_string_pretty(info)?);
            println!("```\n");
        }
    }
    Ok(())
}

/// Display name of a Graph record: notebooks and sections carry
/// `displayName`, pages carry `title`.
pub fn name_of(record: &Value) -> &str {
    record
        .get("displayName")
        .or_else(|| record.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("(untitled)")
}

pub fn id_of(record: &Value) -> &str {
    record.get("id").and_then(Value::as_str).unwrap_or("")
}
