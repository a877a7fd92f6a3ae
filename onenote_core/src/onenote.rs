use serde_json::Value;

use crate::error::ConnectorError;
use crate::graph::GraphClient;
use crate::pagination::fetch_all;
use crate::selection::{pick_by_name_or_id, PickOptions, Selection};

/// Which OneNote tree a request walks: the signed-in user's or a group's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnenoteRoot {
    Me,
    Group(String),
}

impl OnenoteRoot {
    pub fn path(&self) -> String {
        match self {
            OnenoteRoot::Me => "/me/onenote".to_string(),
            OnenoteRoot::Group(id) => format!("/groups/{}/onenote", id),
        }
    }
}

pub async fn list_notebooks(
    client: &GraphClient,
    root: &OnenoteRoot,
) -> Result<Vec<Value>, ConnectorError> {
    fetch_all(client, &format!("{}/notebooks", root.path())).await
}

/// Resolve a notebook by an id-or-name query. Anything short of exactly one
/// match reports the notebook as not found.
pub async fn resolve_notebook(
    client: &GraphClient,
    root: &OnenoteRoot,
    query: Option<&str>,
) -> Result<Value, ConnectorError> {
    let notebooks = list_notebooks(client, root).await?;
    match pick_by_name_or_id(&notebooks, query, PickOptions::default()) {
        Selection::Selected(notebook) => Ok(notebook),
        _ => Err(ConnectorError::NotFound("Notebook not found.".to_string())),
    }
}

/// Sections of one notebook when a notebook query is given, else every
/// section under the root.
pub async fn list_sections(
    client: &GraphClient,
    root: &OnenoteRoot,
    notebook_query: Option<&str>,
) -> Result<Vec<Value>, ConnectorError> {
    let path = match notebook_query {
        Some(query) => {
            let notebook = resolve_notebook(client, root, Some(query)).await?;
            let id = notebook
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| ConnectorError::Other("notebook record missing id".to_string()))?;
            format!("{}/notebooks/{}/sections", root.path(), id)
        }
        None => format!("{}/sections", root.path()),
    };
    fetch_all(client, &path).await
}

/// Inputs for locating a section. An explicit id short-circuits the lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionLookup<'a> {
    pub notebook_query: Option<&'a str>,
    pub section_id: Option<&'a str>,
    pub section_name: Option<&'a str>,
}

/// Resolve the target section id: an explicit id passes through untouched;
/// otherwise the (optionally notebook-scoped) section listing is picked
/// with an empty query allowed, so callers without a section name get the
/// first section.
pub async fn resolve_section_id(
    client: &GraphClient,
    root: &OnenoteRoot,
    lookup: SectionLookup<'_>,
) -> Result<String, ConnectorError> {
    if let Some(id) = lookup.section_id {
        return Ok(id.to_string());
    }
    let sections = list_sections(client, root, lookup.notebook_query).await?;
    let options = PickOptions {
        allow_empty_query: true,
        ..PickOptions::default()
    };
    match pick_by_name_or_id(&sections, lookup.section_name, options) {
        Selection::Selected(section) => section
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ConnectorError::Other("section record missing id".to_string())),
        _ => Err(ConnectorError::NotFound("Section not found.".to_string())),
    }
}

pub async fn list_pages_in_section(
    client: &GraphClient,
    root: &OnenoteRoot,
    section_id: &str,
) -> Result<Vec<Value>, ConnectorError> {
    fetch_all(
        client,
        &format!("{}/sections/{}/pages", root.path(), section_id),
    )
    .await
}

pub async fn list_all_pages(
    client: &GraphClient,
    root: &OnenoteRoot,
) -> Result<Vec<Value>, ConnectorError> {
    fetch_all(client, &format!("{}/pages", root.path())).await
}

/// Minimal XHTML document used when a caller creates a page without a body.
pub fn default_page_html(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>{}</title>\n  </head>\n  <body>\n    <p>Created by the OneNote MCP server.</p>\n  </body>\n</html>",
        title
    )
}

pub async fn create_page(
    client: &GraphClient,
    root: &OnenoteRoot,
    section_id: &str,
    title: Option<&str>,
    html: Option<&str>,
) -> Result<Value, ConnectorError> {
    let title = title.unwrap_or("New Page");
    let body = match html {
        Some(html) => html.to_string(),
        None => default_page_html(title),
    };
    client
        .post_html(
            &format!("{}/sections/{}/pages", root.path(), section_id),
            &body,
        )
        .await
}

/// Case-insensitive title filter over the full page listing. Pages without
/// a title never match.
pub async fn search_pages(
    client: &GraphClient,
    root: &OnenoteRoot,
    query: &str,
) -> Result<Vec<Value>, ConnectorError> {
    let pages = list_all_pages(client, root).await?;
    let needle = query.to_lowercase();
    Ok(pages
        .into_iter()
        .filter(|page| {
            page.get("title")
                .and_then(Value::as_str)
                .map(|title| title.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect())
}
