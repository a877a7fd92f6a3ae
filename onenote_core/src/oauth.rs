use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConnectorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceAuthStart {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    /// Human-readable sign-in instruction from the identity endpoint.
    pub message: Option<String>,
    pub expires_in: i64,
    pub interval: Option<i64>,
}

impl DeviceAuthStart {
    /// The endpoint's instruction, or an equivalent built from the code and
    /// verification URL when the endpoint omitted it.
    pub fn verification_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, use a web browser to open the page {} and enter the code {} to authenticate.",
                self.verification_uri, self.user_code
            )
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

pub async fn device_authorize(
    tenant_id: &str,
    client_id: &str,
    scopes: &str,
) -> Result<DeviceAuthStart, ConnectorError> {
    let url = format!(
        "https://login.microsoftonline.com/{}/oauth2/v2.0/devicecode",
        if tenant_id.is_empty() {
            "common"
        } else {
            tenant_id
        }
    );
    let body = [
        ("client_id", client_id.to_string()),
        ("scope", scopes.to_string()),
    ];
    let resp = reqwest::Client::new()
        .post(url)
        .form(&body)
        .send()
        .await
        .map_err(ConnectorError::HttpRequest)?;
    let status = resp.status();
    let v = resp
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ConnectorError::Other(e.to_string()))?;
    if !status.is_success() {
        return Err(ConnectorError::Authentication(format!("device authorize failed: {}", v)));
    }
    Ok(DeviceAuthStart {
        device_code: v["device_code"].as_str().unwrap_or_default().to_string(),
        user_code: v["user_code"].as_str().unwrap_or_default().to_string(),
        verification_uri: v["verification_uri"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        verification_uri_complete: v
            .get("verification_uri_complete")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        message: v
            .get("message")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        expires_in: v["expires_in"].as_i64().unwrap_or(900),
        interval: v.get("interval").and_then(|i| i.as_i64()),
    })
}

pub async fn device_poll(
    tenant_id: &str,
    client_id: &str,
    device_code: &str,
) -> Result<OAuthTokens, ConnectorError> {
    let url = format!(
        "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
        if tenant_id.is_empty() {
            "common"
        } else {
            tenant_id
        }
    );
    let body = [
        (
            "grant_type",
            "urn:ietf:params:oauth:grant-type:device_code".to_string(),
        ),
        ("client_id", client_id.to_string()),
        ("device_code", device_code.to_string()),
    ];
    let resp = reqwest::Client::new()
        .post(url)
        .form(&body)
        .send()
        .await
        .map_err(ConnectorError::HttpRequest)?;
    let status = resp.status();
    let v = resp
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ConnectorError::Other(e.to_string()))?;
    if !status.is_success() {
        return Err(ConnectorError::Authentication(format!("poll failed: {}", v)));
    }
    Ok(OAuthTokens {
        access_token: v["access_token"].as_str().unwrap_or_default().to_string(),
        expires_in: v.get("expires_in").and_then(|i| i.as_i64()),
        scope: v
            .get("scope")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        token_type: v
            .get("token_type")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
    })
}

/// Poll the token endpoint until the user completes sign-in, the code
/// expires, or the endpoint reports a terminal error. `authorization_pending`
/// keeps the current interval; `slow_down` stretches it by five seconds.
pub async fn device_poll_until_complete(
    tenant_id: &str,
    client_id: &str,
    start: &DeviceAuthStart,
) -> Result<OAuthTokens, ConnectorError> {
    let mut wait = start.interval.unwrap_or(5).max(1) as u64;
    let deadline =
        tokio::time::Instant::now() + Duration::from_secs(start.expires_in.max(0) as u64);
    loop {
        tokio::time::sleep(Duration::from_secs(wait)).await;
        match device_poll(tenant_id, client_id, &start.device_code).await {
            Ok(tokens) => return Ok(tokens),
            Err(e) => {
                let text = e.to_string();
                if text.contains("authorization_pending") {
                    debug!("device authorization pending");
                } else if text.contains("slow_down") {
                    wait += 5;
                    debug!(wait_secs = wait, "token endpoint asked to slow down");
                } else {
                    return Err(e);
                }
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ConnectorError::Timeout(
                "device code expired before sign-in completed".to_string(),
            ));
        }
    }
}
