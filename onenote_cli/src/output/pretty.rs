//! Pretty formatter for terminal output.
//!
//! Design principles (from clig.dev and best CLI tools):
//! - Whitespace & breathing room between logical groups
//! - Visual hierarchy: bold titles, dimmed metadata, colored links
//! - Card-like grouping for notebooks, sections, and pages
//! - Truncate long text, don't wrap endlessly

use owo_colors::OwoColorize;
use serde_json::Value;

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Indent for card content (after number)
const CARD_INDENT: usize = 6;

/// Known keys that typically contain result lists
const LIST_KEYS: &[&str] = &[
    "notebooks",
    "sections",
    "pages",
    "groups",
    "value", // raw Graph collection envelope
    "results",
    "items",
];

/// Keys to show as primary (title-like). Graph names notebooks and
/// sections `displayName` and pages `title`.
const TITLE_KEYS: &[&str] = &["displayName", "title", "name", "query"];

/// Flat keys to show as links (the OneNote web link lives deeper, see
/// `web_url`)
const URL_KEYS: &[&str] = &["webUrl", "url", "link", "href"];

/// Keys to show as descriptions/snippets (groups carry `description`)
const SNIPPET_KEYS: &[&str] = &["description", "summary", "preview"];

/// Keys for metadata (shown dimmed) - ordered by importance
const META_KEYS: &[&str] = &[
    "id",
    "mail", // group mailbox address
    "createdDateTime",
    "lastModifiedDateTime",
    "userRole",
    "isDefault",
    "isShared",
];

// ============================================================================
// Public API
// ============================================================================

/// Format JSON value with card-like readable output
pub fn format_pretty(value: &Value) -> String {
    let mut output = String::new();
    let width = terminal_width();
    format_value(value, &mut output, width, 0);
    output
}

/// Format a list of items as cards (for page listings, search hits, etc.)
pub fn format_cards(items: &[Value], source_label: Option<&str>) -> String {
    let mut output = String::new();
    let width = terminal_width();

    if let Some(source) = source_label {
        output.push_str(&format_section_header(source, Some(items.len()), width));
        output.push('\n');
    }

    for (i, item) in items.iter().enumerate() {
        output.push_str(&format_card(item, i + 1, width));
        if i < items.len() - 1 {
            output.push('\n');
        }
    }

    output
}

// ============================================================================
// Core Formatting
// ============================================================================

fn format_value(value: &Value, output: &mut String, width: usize, depth: usize) {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            if arr.iter().any(|v| v.is_object()) {
                output.push_str(&format_cards(arr, None));
            } else {
                // Simple array - show as bullet list
                for item in arr {
                    output.push_str(&format!("  {} {}\n", "•".dimmed(), format_scalar(item)));
                }
            }
        }
        Value::Object(obj) => {
            if let Some((list_key, list_value)) = find_list_in_object(obj) {
                // Show top-level metadata first
                let metadata: Vec<_> = obj
                    .iter()
                    .filter(|(k, v)| *k != list_key && !v.is_array() && !v.is_object())
                    .collect();

                if !metadata.is_empty() {
                    for (key, val) in &metadata {
                        output.push_str(&format!("{}: {}\n", key.dimmed(), format_scalar(val)));
                    }
                    output.push('\n');
                }

                output.push_str(&format_cards(list_value, Some(list_key)));
            } else {
                // No list found - format as key-value pairs with hierarchy
                format_object_hierarchical(obj, output, width, depth);
            }
        }
        _ => {
            output.push_str(&format_scalar(value));
        }
    }
}

fn format_object_hierarchical(
    obj: &serde_json::Map<String, Value>,
    output: &mut String,
    width: usize,
    depth: usize,
) {
    let indent = "  ".repeat(depth);

    let mut scalars: Vec<(&String, &Value)> = Vec::new();
    let mut arrays: Vec<(&String, &Value)> = Vec::new();
    let mut objects: Vec<(&String, &Value)> = Vec::new();

    for (key, value) in obj {
        match value {
            Value::Array(_) => arrays.push((key, value)),
            Value::Object(_) => objects.push((key, value)),
            _ => scalars.push((key, value)),
        }
    }

    for (key, value) in &scalars {
        let formatted_key = if TITLE_KEYS.contains(&key.as_str()) {
            key.bold().to_string()
        } else {
            key.dimmed().to_string()
        };

        let formatted_val = if URL_KEYS.contains(&key.as_str()) {
            format_scalar(value).blue().to_string()
        } else {
            format_scalar(value)
        };

        output.push_str(&format!("{}{}: {}\n", indent, formatted_key, formatted_val));
    }

    for (key, value) in &arrays {
        if let Value::Array(arr) = value {
            output.push('\n');
            output.push_str(&format!(
                "{}{} ({} items):\n",
                indent,
                key.cyan().bold(),
                arr.len()
            ));
            for item in arr {
                if item.is_object() {
                    output.push_str(&format_card(item, 0, width));
                } else {
                    output.push_str(&format!(
                        "{}  {} {}\n",
                        indent,
                        "•".dimmed(),
                        format_scalar(item)
                    ));
                }
            }
        }
    }

    for (key, value) in &objects {
        if let Value::Object(nested) = value {
            output.push('\n');
            output.push_str(&format!("{}{}:\n", indent, key.cyan().bold()));
            format_object_hierarchical(nested, output, width, depth + 1);
        }
    }
}

// ============================================================================
// Card Formatting (the main visual pattern)
// ============================================================================

fn format_card(item: &Value, index: usize, width: usize) -> String {
    let mut output = String::new();

    let content_width = width.saturating_sub(CARD_INDENT + 2);

    let obj = match item.as_object() {
        Some(o) => o,
        None => {
            if index > 0 {
                output.push_str(&format!(
                    " {:>3}. {}\n",
                    index.to_string().cyan().bold(),
                    format_scalar(item)
                ));
            } else {
                output.push_str(&format!("   {} {}\n", "•".dimmed(), format_scalar(item)));
            }
            return output;
        }
    };

    let title = find_field(obj, TITLE_KEYS);
    let url = web_url(obj);
    let snippet = find_field(obj, SNIPPET_KEYS);
    let meta_fields = extract_meta_fields(obj);

    // Line 1: Index + Title
    let index_str = if index > 0 {
        format!(" {:>3}. ", index).cyan().bold().to_string()
    } else {
        "      ".to_string()
    };

    if let Some(t) = &title {
        output.push_str(&format!("{}{}\n", index_str, t.bold()));
    } else {
        output.push_str(&format!("{}(untitled)\n", index_str));
    }

    // URL: full clickable hyperlink
    if let Some(u) = &url {
        let hyperlink = format_hyperlink(u, u);
        output.push_str(&format!("      {}\n", hyperlink.blue()));
    }

    // Snippet/description, wrapped to the terminal
    if let Some(s) = &snippet {
        let clean = clean_snippet(s);
        if !clean.is_empty() {
            for line in textwrap::fill(&clean, content_width.max(20)).lines() {
                output.push_str(&format!("      {}\n", line.dimmed()));
            }
        }
    }

    // Metadata: show each field on its own line for readability
    if !meta_fields.is_empty() {
        for (key, value) in meta_fields.iter().take(6) {
            output.push_str(&format!("      {}: {}\n", key.dimmed(), value.dimmed()));
        }
    }

    output
}

fn find_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = obj.get(*key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// The clickable link for a OneNote record. Pages and notebooks nest it
/// under `links.oneNoteWebUrl.href`; other records carry a flat URL key.
fn web_url(obj: &serde_json::Map<String, Value>) -> Option<String> {
    if let Some(href) = obj
        .get("links")
        .and_then(|links| links.get("oneNoteWebUrl"))
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
    {
        if !href.is_empty() {
            return Some(href.to_string());
        }
    }
    find_field(obj, URL_KEYS)
}

fn extract_meta_fields(obj: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    let mut meta = Vec::new();

    for key in META_KEYS {
        if let Some(val) = obj.get(*key) {
            let formatted = match val {
                Value::String(s) if !s.is_empty() => {
                    // For ISO dates, show just the date part (YYYY-MM-DD)
                    if s.len() > 10 && s.contains('T') {
                        s.split('T').next().unwrap_or(s).to_string()
                    } else {
                        s.clone()
                    }
                }
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };

            if !formatted.is_empty() {
                meta.push((key.to_string(), formatted));
            }
        }
    }

    // Parent breadcrumbs Graph attaches to pages and sections
    for (key, label) in [("parentSection", "section"), ("parentNotebook", "notebook")] {
        if let Some(name) = obj
            .get(key)
            .and_then(|parent| parent.get("displayName"))
            .and_then(Value::as_str)
        {
            meta.push((label.to_string(), name.to_string()));
        }
    }

    meta
}

// ============================================================================
// Section Headers
// ============================================================================

fn format_section_header(label: &str, count: Option<usize>, width: usize) -> String {
    let count_str = match count {
        Some(n) => format!(" ({} results)", n),
        None => String::new(),
    };

    let header_text = format!("{}{}", label, count_str);
    let line_len = (width.saturating_sub(header_text.len() + 4)).min(60);
    let line = "─".repeat(line_len);

    format!(
        "{} {} {}",
        "──".cyan(),
        header_text.green().bold(),
        line.cyan()
    )
}

// ============================================================================
// Utility Functions
// ============================================================================

fn find_list_in_object(obj: &serde_json::Map<String, Value>) -> Option<(&str, &Vec<Value>)> {
    // Check priority list keys first
    for key in LIST_KEYS {
        if let Some(Value::Array(arr)) = obj.get(*key) {
            if !arr.is_empty() {
                return Some((key, arr));
            }
        }
    }

    // Fallback: any non-empty array of objects
    for (key, value) in obj {
        if let Value::Array(arr) = value {
            if !arr.is_empty() && arr.iter().any(|v| v.is_object()) {
                return Some((key.as_str(), arr));
            }
        }
    }

    None
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".dimmed().to_string(),
        Value::Bool(b) => {
            if *b {
                "true".green().to_string()
            } else {
                "false".red().to_string()
            }
        }
        Value::Number(n) => n.yellow().to_string(),
        Value::String(s) => s.to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{}...}}", obj.len()),
    }
}

pub fn truncate_str(s: &str, max_len: usize) -> String {
    // Take first line only
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn clean_snippet(s: &str) -> String {
    s.replace("\\n", " ")
        .replace('\n', " ")
        .replace('\r', "")
        .replace("  ", " ")
        .trim()
        .to_string()
}

pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Format a URL as a clickable hyperlink using OSC 8 escape sequences.
/// Supported by most modern terminals (iTerm2, Hyper, Windows Terminal, GNOME Terminal, etc.)
fn format_hyperlink(url: &str, display_text: &str) -> String {
    // OSC 8 format: \x1b]8;;URL\x1b\\TEXT\x1b]8;;\x1b\\
    // Using \x07 (BEL) as terminator for broader compatibility
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, display_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_card_uses_display_name() {
        let item = json!({
            "displayName": "Work Notebook",
            "id": "1-abc",
            "lastModifiedDateTime": "2024-03-11T10:00:00Z"
        });
        let output = format_card(&item, 1, 80);
        assert!(output.contains("Work Notebook"));
        assert!(output.contains("2024-03-11"));
        assert!(!output.contains("T10:00:00"));
    }

    #[test]
    fn test_format_card_extracts_nested_web_url() {
        let item = json!({
            "title": "Meeting Notes",
            "links": {
                "oneNoteWebUrl": { "href": "https://onedrive.live.com/edit.aspx?id=x" }
            }
        });
        let output = format_card(&item, 1, 80);
        assert!(output.contains("onedrive.live.com"));
    }

    #[test]
    fn test_format_card_shows_parent_breadcrumbs() {
        let item = json!({
            "title": "Friday",
            "parentSection": { "displayName": "Journal" }
        });
        let output = format_card(&item, 1, 80);
        assert!(output.contains("Journal"));
    }

    #[test]
    fn test_truncate_str() {
        let long = "This is a very long string that should be truncated";
        let truncated = truncate_str(long, 20);
        assert!(truncated.ends_with("..."));
        assert!(truncated.chars().count() <= 20);
    }

    #[test]
    fn test_format_section_header() {
        let header = format_section_header("pages", Some(10), 80);
        assert!(header.contains("pages"));
        assert!(header.contains("10"));
    }
}
