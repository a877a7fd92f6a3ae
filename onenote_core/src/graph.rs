use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::ConnectorError;
use crate::pagination::PageFetcher;

pub const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Authenticated Microsoft Graph caller: one HTTP client plus the bearer
/// token it sends. Built per operation from the resolved credential rather
/// than cached anywhere.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    token: String,
}

impl GraphClient {
    pub fn new(http: reqwest::Client, token: String) -> Self {
        Self { http, token }
    }

    /// Convenience constructor for callers that do not manage their own
    /// connection pool.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(reqwest::Client::new(), token.into())
    }

    /// Continuation links arrive absolute; everything else is relative to
    /// the Graph base.
    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", GRAPH_BASE, path)
        }
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, ConnectorError> {
        let url = self.absolute_url(path);
        debug!(url = %url, "graph GET");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ConnectorError::Other(format!("Failed to parse Graph response: {}", e)))
    }

    pub async fn get_text(&self, path: &str) -> Result<String, ConnectorError> {
        let url = self.absolute_url(path);
        debug!(url = %url, "graph GET (text)");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }
        resp.text()
            .await
            .map_err(|e| ConnectorError::Other(format!("Failed to read Graph response: {}", e)))
    }

    pub async fn post_html(&self, path: &str, body: &str) -> Result<Value, ConnectorError> {
        let url = self.absolute_url(path);
        debug!(url = %url, "graph POST");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/xhtml+xml")
            .body(body.to_string())
            .send()
            .await
            .map_err(ConnectorError::HttpRequest)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ConnectorError::Other(format!("Failed to parse Graph response: {}", e)))
    }
}

fn error_for_status(status: reqwest::StatusCode, body: String) -> ConnectorError {
    let message = format!("Graph request failed ({}): {}", status, body);
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ConnectorError::Authentication(message)
    } else {
        ConnectorError::Other(message)
    }
}

#[async_trait]
impl PageFetcher for GraphClient {
    async fn fetch_page(&self, url: &str) -> Result<Value, ConnectorError> {
        self.get_json(url).await
    }
}
