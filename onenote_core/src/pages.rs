use serde_json::Value;

use crate::error::ConnectorError;
use crate::graph::GraphClient;
use crate::onenote::{list_all_pages, OnenoteRoot};

/// Pick one page from a listing. Priority: exact id, id substring in either
/// direction, case-insensitive title substring, then the first page. Only
/// an empty listing fails.
pub fn select_page<'a>(
    pages: &'a [Value],
    page_id: Option<&str>,
    page_title: Option<&str>,
) -> Result<&'a Value, ConnectorError> {
    fn id_of(page: &Value) -> &str {
        page.get("id").and_then(Value::as_str).unwrap_or("")
    }
    if let Some(pid) = page_id {
        if let Some(page) = pages.iter().find(|p| id_of(p) == pid) {
            return Ok(page);
        }
        if let Some(page) = pages.iter().find(|p| {
            let id = id_of(p);
            !id.is_empty() && (id.contains(pid) || pid.contains(id))
        }) {
            return Ok(page);
        }
    }
    if let Some(title) = page_title {
        let needle = title.to_lowercase();
        if let Some(page) = pages.iter().find(|p| {
            p.get("title")
                .and_then(Value::as_str)
                .map(|t| t.to_lowercase().contains(&needle))
                .unwrap_or(false)
        }) {
            return Ok(page);
        }
    }
    pages
        .first()
        .ok_or_else(|| ConnectorError::NotFound("Page not found.".to_string()))
}

/// Drain the page listing, select a page, and fetch its XHTML body.
/// Returns the page record alongside the raw content.
pub async fn get_page_content(
    client: &GraphClient,
    root: &OnenoteRoot,
    page_id: Option<&str>,
    page_title: Option<&str>,
) -> Result<(Value, String), ConnectorError> {
    let pages = list_all_pages(client, root).await?;
    let page = select_page(&pages, page_id, page_title)?.clone();
    let id = page
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ConnectorError::Other("page record missing id".to_string()))?;
    let content = client
        .get_text(&format!("{}/pages/{}/content", root.path(), id))
        .await?;
    Ok((page, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_pages() -> Vec<Value> {
        vec![
            json!({"id": "1-abc123", "title": "Meeting Notes"}),
            json!({"id": "1-def456", "title": "Shopping List"}),
            json!({"id": "1-ghi789", "title": "Project Plan"}),
        ]
    }

    #[test]
    fn exact_id_wins() {
        let pages = sample_pages();
        let page = select_page(&pages, Some("1-def456"), None).unwrap();
        assert_eq!(page["title"], "Shopping List");
    }

    #[test]
    fn id_substring_matches_either_direction() {
        let pages = sample_pages();
        let page = select_page(&pages, Some("ghi789"), None).unwrap();
        assert_eq!(page["title"], "Project Plan");

        // Caller passed a longer string that contains a real id.
        let page = select_page(&pages, Some("prefix-1-abc123-suffix"), None).unwrap();
        assert_eq!(page["title"], "Meeting Notes");
    }

    #[test]
    fn title_substring_is_case_insensitive() {
        let pages = sample_pages();
        let page = select_page(&pages, None, Some("shopping")).unwrap();
        assert_eq!(page["id"], "1-def456");
    }

    #[test]
    fn unmatched_query_falls_back_to_first_page() {
        let pages = sample_pages();
        let page = select_page(&pages, Some("zzz"), Some("zzz")).unwrap();
        assert_eq!(page["id"], "1-abc123");
    }

    #[test]
    fn empty_listing_is_an_error() {
        let err = select_page(&[], Some("anything"), None).unwrap_err();
        assert_eq!(err.to_string(), "Page not found.");
    }
}
