// src/lib.rs
pub mod config;
pub mod connectors;
pub mod error;
pub mod graph;
pub mod groups;
pub mod mcp_server;
pub mod oauth;
pub mod onenote;
pub mod pages;
pub mod pagination;
pub mod selection;
pub mod token_store;
pub mod transport;
pub mod utils;

// Re-export types from rmcp that users of this library might need
pub use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, InitializeRequestParam,
    InitializeResult, ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities,
    Tool,
};

use crate::error::ConnectorError;
use async_trait::async_trait;

pub use crate::config::Config;
pub use crate::connectors::OneNoteConnector;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the unique name of the connector (acting as the MCP server name).
    fn name(&self) -> &'static str;

    /// Returns a description of the connector.
    fn description(&self) -> &'static str;

    /// Returns the MCP capabilities of this connector.
    async fn capabilities(&self) -> ServerCapabilities;

    // --- MCP Request Handlers (One for each relevant MCP request type) ---
    async fn initialize(
        &self,
        request: InitializeRequestParam,
    ) -> Result<InitializeResult, ConnectorError>;
    async fn list_tools(
        &self,
        request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError>;
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ConnectorError>;
}
