use onenote_core::config::{Config, StorageMode};
use onenote_core::mcp_server::{JsonRpcHandler, McpServer};
use onenote_core::{CallToolResult, InitializeResult, OneNoteConnector};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

fn scratch_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "onenote-dispatch-test-{}-{}-{}",
        std::process::id(),
        name,
        nanos
    ))
}

/// A handler whose connector never touches the OS keychain or the real
/// token env var, so the tests run the same everywhere.
fn handler_with(token_file: PathBuf, env_var: &str) -> JsonRpcHandler {
    let mut config = Config::default();
    config.storage = StorageMode::File;
    config.token_file = token_file;
    config.token_env_var = env_var.to_string();
    let connector = OneNoteConnector::new(config);
    JsonRpcHandler::new(McpServer::new(Arc::new(connector)))
}

fn structured(response: &Value) -> Value {
    let result: CallToolResult =
        serde_json::from_value(response["result"].clone()).expect("tool call result");
    result.structured_content.expect("structured content")
}

#[tokio::test]
async fn test_tools_list_names_every_tool() {
    let handler = handler_with(scratch_path("tools-list"), "ONENOTE_TEST_TOOLS_LIST");
    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {}}))
        .await;

    assert_eq!(response["id"], 1);
    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "authenticate",
        "saveAccessToken",
        "listNotebooks",
        "getNotebook",
        "listSections",
        "listPages",
        "getPage",
        "createPage",
        "searchPages",
        "info",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
    assert_eq!(tools.len(), 10);
}

#[tokio::test]
async fn test_initialize_reports_server_identity() {
    let handler = handler_with(scratch_path("init"), "ONENOTE_TEST_INIT");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-06-18",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.0.0"}
            }
        }))
        .await;

    assert_eq!(response["id"], 2);
    let result: InitializeResult = serde_json::from_value(response["result"].clone()).unwrap();
    assert_eq!(result.server_info.name, "onenote");
    assert!(result.capabilities.tools.is_some());
}

#[tokio::test]
async fn test_ping_returns_empty_result() {
    let handler = handler_with(scratch_path("ping"), "ONENOTE_TEST_PING");
    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}))
        .await;

    assert_eq!(response["id"], 3);
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_unknown_method_is_rejected() {
    let handler = handler_with(scratch_path("unknown-method"), "ONENOTE_TEST_METHOD");
    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "id": 7, "method": "bogus/method", "params": {}}))
        .await;

    assert_eq!(response["id"], 7);
    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["message"], "Method not found");
}

#[tokio::test]
async fn test_unknown_tool_is_rejected() {
    let handler = handler_with(scratch_path("unknown-tool"), "ONENOTE_TEST_TOOL");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 4, "method": "tools/call",
            "params": {"name": "explode", "arguments": {}}
        }))
        .await;

    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(response["error"]["message"], "Tool not found");
}

#[tokio::test]
async fn test_missing_required_param_is_rejected() {
    let handler = handler_with(scratch_path("missing-param"), "ONENOTE_TEST_PARAM");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "saveAccessToken", "arguments": {}}
        }))
        .await;

    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(response["error"]["message"], "Missing 'token' parameter");
}

#[tokio::test]
async fn test_save_access_token_persists_to_file() {
    let path = scratch_path("save-token");
    let handler = handler_with(path.clone(), "ONENOTE_TEST_SAVE");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 6, "method": "tools/call",
            "params": {"name": "saveAccessToken", "arguments": {"token": "tok-dispatch"}}
        }))
        .await;

    let payload = structured(&response);
    assert_eq!(payload["message"], "Access token saved successfully.");
    assert_eq!(payload["storage"], "file");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("tok-dispatch"));
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_save_access_token_accepts_alias() {
    let path = scratch_path("save-alias");
    let handler = handler_with(path.clone(), "ONENOTE_TEST_ALIAS");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 8, "method": "tools/call",
            "params": {"name": "saveAccessToken", "arguments": {"accessToken": "tok-alias"}}
        }))
        .await;

    let payload = structured(&response);
    assert_eq!(payload["message"], "Access token saved successfully.");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("tok-alias"));
    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_tool_calls_without_token_require_auth() {
    let handler = handler_with(scratch_path("no-token"), "ONENOTE_TEST_NO_TOKEN");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "listNotebooks", "arguments": {}}
        }))
        .await;

    assert_eq!(response["error"]["code"], -32603);
    let message = response["error"]["message"].as_str().unwrap();
    assert!(message.contains("Access token not found"), "{}", message);
}

#[tokio::test]
async fn test_info_works_without_credentials() {
    let handler = handler_with(scratch_path("info"), "ONENOTE_TEST_INFO");
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0", "id": 10, "method": "tools/call",
            "params": {"name": "info", "arguments": {}}
        }))
        .await;

    let payload = structured(&response);
    assert_eq!(payload["name"], "onenote");
    assert_eq!(payload["token_storage"]["storage_mode"], "file");
    assert_eq!(payload["env"]["graph_access_token_set"], false);
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let handler = handler_with(scratch_path("notify"), "ONENOTE_TEST_NOTIFY");
    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;

    assert!(response.is_null());
}
