use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectorError;

/// One request against a listing endpoint. The Graph client implements
/// this; the seam keeps the drain loop testable without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Value, ConnectorError>;
}

/// Drain a cursor-linked listing into one sequence, following
/// `@odata.nextLink` until the server stops returning one. Item order is
/// the server's order across pages; nothing is deduplicated or capped, so
/// an upstream that loops a cursor forever loops this too. A page whose
/// `value` is missing or not an array contributes no items.
pub async fn fetch_all(
    fetcher: &dyn PageFetcher,
    resource: &str,
) -> Result<Vec<Value>, ConnectorError> {
    let mut items = Vec::new();
    let mut next_url = Some(resource.to_string());
    while let Some(url) = next_url {
        let response = fetcher.fetch_page(&url).await?;
        if let Some(page) = response.get("value").and_then(Value::as_array) {
            items.extend(page.iter().cloned());
        }
        next_url = response
            .get("@odata.nextLink")
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
            .map(str::to_string);
    }
    Ok(items)
}
