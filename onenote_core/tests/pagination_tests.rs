use async_trait::async_trait;
use onenote_core::error::ConnectorError;
use onenote_core::pagination::{fetch_all, PageFetcher};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned responses keyed by URL, recording every request made.
struct RecordingFetcher {
    responses: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    fn new(responses: Vec<(&str, Value)>) -> Self {
        Self {
            responses: responses
                .into_iter()
                .map(|(url, body)| (url.to_string(), body))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for RecordingFetcher {
    async fn fetch_page(&self, url: &str) -> Result<Value, ConnectorError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ConnectorError::Other(format!("unexpected request: {}", url)))
    }
}

#[tokio::test]
async fn test_two_pages_drain_in_order() {
    let fetcher = RecordingFetcher::new(vec![
        (
            "/me/onenote/pages",
            json!({
                "value": [{"id": "p1"}, {"id": "p2"}],
                "@odata.nextLink": "https://graph.microsoft.com/v1.0/me/onenote/pages?$skip=2"
            }),
        ),
        (
            "https://graph.microsoft.com/v1.0/me/onenote/pages?$skip=2",
            json!({ "value": [{"id": "p3"}] }),
        ),
    ]);

    let items = fetch_all(&fetcher, "/me/onenote/pages").await.unwrap();

    let ids: Vec<&str> = items.iter().map(|v| v["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
    assert_eq!(fetcher.requests().len(), 2);
}

#[tokio::test]
async fn test_single_page_makes_one_request() {
    let fetcher = RecordingFetcher::new(vec![(
        "/me/onenote/notebooks",
        json!({ "value": [{"id": "n1"}] }),
    )]);

    let items = fetch_all(&fetcher, "/me/onenote/notebooks").await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(fetcher.requests(), vec!["/me/onenote/notebooks"]);
}

#[tokio::test]
async fn test_page_without_value_array_contributes_nothing() {
    let fetcher = RecordingFetcher::new(vec![
        (
            "/me/onenote/sections",
            json!({
                "value": {"not": "an array"},
                "@odata.nextLink": "/me/onenote/sections?page=2"
            }),
        ),
        ("/me/onenote/sections?page=2", json!({ "value": [{"id": "s1"}] })),
    ]);

    let items = fetch_all(&fetcher, "/me/onenote/sections").await.unwrap();

    // The malformed first page is skipped but its cursor is still followed.
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "s1");
    assert_eq!(fetcher.requests().len(), 2);
}

#[tokio::test]
async fn test_empty_next_link_stops_the_drain() {
    let fetcher = RecordingFetcher::new(vec![(
        "/me/onenote/pages",
        json!({ "value": [{"id": "p1"}], "@odata.nextLink": "" }),
    )]);

    let items = fetch_all(&fetcher, "/me/onenote/pages").await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let fetcher = RecordingFetcher::new(vec![(
        "/me/onenote/pages",
        json!({
            "value": [{"id": "p1"}],
            "@odata.nextLink": "/me/onenote/pages?page=2"
        }),
    )]);

    // The second page has no canned response, so the fetcher errors.
    let result = fetch_all(&fetcher, "/me/onenote/pages").await;
    assert!(result.is_err());
}
