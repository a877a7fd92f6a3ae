use async_trait::async_trait;
use rmcp::model::*;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::ConnectorError;
use crate::graph::GraphClient;
use crate::oauth;
use crate::onenote::{self, OnenoteRoot, SectionLookup};
use crate::pages;
use crate::token_store::TokenChain;
use crate::utils::structured_result_with_text;
use crate::Connector;

mod params;

/// OneNote over Microsoft Graph. Owns the resolved configuration, the token
/// backend chain, and one HTTP client; a Graph client is built per call
/// from whatever credential currently resolves. The session slot holds a
/// token acquired this process when persistence was refused or failed.
pub struct OneNoteConnector {
    config: Config,
    tokens: TokenChain,
    http: reqwest::Client,
    session_token: Mutex<Option<String>>,
}

impl OneNoteConnector {
    pub fn new(config: Config) -> Self {
        let tokens = TokenChain::from_config(&config);
        Self {
            config,
            tokens,
            http: reqwest::Client::new(),
            session_token: Mutex::new(None),
        }
    }

    async fn current_token(&self) -> Option<String> {
        if let Some(token) = self.session_token.lock().await.clone() {
            return Some(token);
        }
        self.tokens.read(true)
    }

    async fn graph_client(&self) -> Result<GraphClient, ConnectorError> {
        let token = self.current_token().await.ok_or_else(|| {
            ConnectorError::Authentication(
                "Access token not found. Please save access token first.".to_string(),
            )
        })?;
        Ok(GraphClient::new(self.http.clone(), token))
    }

    async fn authenticate(&self) -> Result<CallToolResult, ConnectorError> {
        if self.current_token().await.is_some() {
            return structured_result_with_text(
                &json!({
                    "status": "authenticated",
                    "message": "Already authenticated with an access token.",
                }),
                None,
            );
        }

        let scopes = self.config.scopes.join(" ");
        let start = oauth::device_authorize("common", &self.config.client_id, &scopes).await?;
        let prompt = start.verification_message();
        info!(user_code = %start.user_code, "device authorization started");

        let tokens =
            oauth::device_poll_until_complete("common", &self.config.client_id, &start).await?;
        if tokens.access_token.is_empty() {
            return Err(ConnectorError::Authentication(
                "token endpoint returned no access token".to_string(),
            ));
        }

        // Persistence failure is a warning here, not a hard failure: the
        // token stays usable through the session slot.
        let (storage, warning) = match self.tokens.write(&tokens.access_token) {
            Ok(outcome) => (Some(outcome.destination), outcome.warning),
            Err(e) => {
                warn!(error = %e, "failed to persist token, continuing with in-memory token");
                (
                    None,
                    Some(format!(
                        "failed to persist token ({}); continuing with in-memory token",
                        e
                    )),
                )
            }
        };
        *self.session_token.lock().await = Some(tokens.access_token.clone());

        let mut message = String::from("Authentication complete.");
        if let Some(w) = &warning {
            message.push_str(&format!(" Warning: {}", w));
        }
        structured_result_with_text(
            &json!({
                "status": "authenticated",
                "message": message,
                "verification": prompt,
                "storage": storage,
                "warning": warning,
            }),
            None,
        )
    }

    async fn save_access_token(
        &self,
        args: &Map<String, Value>,
    ) -> Result<CallToolResult, ConnectorError> {
        let token = params::required_string(args, &["token", "accessToken", "random_string"])?;
        let outcome = self.tokens.write(&token)?;
        *self.session_token.lock().await = Some(token);
        structured_result_with_text(
            &json!({
                "message": "Access token saved successfully.",
                "storage": outcome.destination,
                "warning": outcome.warning,
            }),
            None,
        )
    }

    async fn server_info(&self) -> Result<CallToolResult, ConnectorError> {
        structured_result_with_text(
            &json!({
                "name": self.name(),
                "version": env!("CARGO_PKG_VERSION"),
                "token_storage": {
                    "storage_mode": self.config.storage.as_str(),
                    "secure_store_available": self.tokens.secure_store_available(),
                },
                "logging": {
                    "log_file": self.config.log_file.display().to_string(),
                    "log_level": self.config.log_level,
                    "console_logging": self.config.console_logging,
                },
                "env": {
                    "client_id_configured": self.config.client_id_from_env,
                    "graph_access_token_set": self.config.env_token_set(),
                },
            }),
            None,
        )
    }
}

#[async_trait]
impl Connector for OneNoteConnector {
    fn name(&self) -> &'static str {
        "onenote"
    }

    fn description(&self) -> &'static str {
        "Microsoft OneNote via Microsoft Graph: notebooks, sections, pages, search, and page creation."
    }

    async fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: Some(Default::default()),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
    ) -> Result<InitializeResult, ConnectorError> {
        Ok(InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: self.capabilities().await,
            server_info: Implementation {
                name: self.name().to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "OneNote over Microsoft Graph. Sign in with authenticate (device code) or saveAccessToken, then list notebooks/sections/pages, fetch page content with getPage, create pages, or search page titles."
                    .to_string(),
            ),
        })
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError> {
        let tools = vec![
            Tool {
                name: Cow::Borrowed("authenticate"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Authenticate with Microsoft Graph using the device code flow. Prints a verification URL and code, then waits for the sign-in to complete.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {},
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("saveAccessToken"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Save a Microsoft Graph access token for subsequent requests.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "token": { "type": "string", "minLength": 1, "description": "Raw Graph access token (not a refresh token)." }
                        },
                        "required": ["token"]
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("listNotebooks"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List OneNote notebooks for the signed-in user.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {},
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("getNotebook"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get a single notebook by id or display name (exact, then partial match).",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "notebookId": { "type": "string", "description": "Notebook id." },
                            "notebookName": { "type": "string", "description": "Notebook display name, exact or partial." }
                        },
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("listSections"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List sections, optionally restricted to one notebook.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "notebookId": { "type": "string", "description": "Notebook id." },
                            "notebookName": { "type": "string", "description": "Notebook display name, exact or partial." }
                        },
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("listPages"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List pages in a section. The section resolves by id or name; without either the first section is used.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "notebookId": { "type": "string", "description": "Notebook id scoping the section lookup." },
                            "notebookName": { "type": "string", "description": "Notebook display name scoping the section lookup." },
                            "sectionId": { "type": "string", "description": "Section id (skips resolution)." },
                            "sectionName": { "type": "string", "description": "Section display name, exact or partial." }
                        },
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("getPage"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Fetch a page's XHTML content. The page is matched by id, then id fragment, then title substring.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "pageId": { "type": "string", "description": "Page id or id fragment." },
                            "pageTitle": { "type": "string", "description": "Page title substring, case-insensitive." }
                        },
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("createPage"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Create a page in a section with an optional title and XHTML body.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "notebookId": { "type": "string", "description": "Notebook id scoping the section lookup." },
                            "notebookName": { "type": "string", "description": "Notebook display name scoping the section lookup." },
                            "sectionId": { "type": "string", "description": "Section id (skips resolution)." },
                            "sectionName": { "type": "string", "description": "Section display name, exact or partial." },
                            "title": { "type": "string", "description": "Page title. Defaults to 'New Page'." },
                            "html": { "type": "string", "description": "XHTML body. A minimal document is generated when omitted." }
                        },
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("searchPages"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Search page titles across all pages (case-insensitive substring).",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {
                            "query": { "type": "string", "minLength": 1, "description": "Text to look for in page titles." }
                        },
                        "required": ["query"]
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("info"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Report server version, token storage mode, and logging configuration. Works without a credential.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": {},
                        "required": []
                    }).as_object().expect("Schema object").clone()
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ConnectorError> {
        let args = request.arguments.unwrap_or_default();
        match request.name.as_ref() {
            "authenticate" => self.authenticate().await,
            "saveAccessToken" => self.save_access_token(&args).await,
            "listNotebooks" => {
                let client = self.graph_client().await?;
                let notebooks = onenote::list_notebooks(&client, &OnenoteRoot::Me).await?;
                structured_result_with_text(&json!({ "notebooks": notebooks }), None)
            }
            "getNotebook" => {
                let query = params::optional_string(&args, &["notebookId", "id"]).or_else(|| {
                    params::optional_string(&args, &["notebookName", "name", "title"])
                });
                let client = self.graph_client().await?;
                let notebook =
                    onenote::resolve_notebook(&client, &OnenoteRoot::Me, query.as_deref()).await?;
                structured_result_with_text(&json!({ "notebook": notebook }), None)
            }
            "listSections" => {
                let notebook_query = params::optional_string(&args, &["notebookId", "id"])
                    .or_else(|| params::optional_string(&args, &["notebookName", "name", "title"]));
                let client = self.graph_client().await?;
                let sections =
                    onenote::list_sections(&client, &OnenoteRoot::Me, notebook_query.as_deref())
                        .await?;
                structured_result_with_text(&json!({ "sections": sections }), None)
            }
            "listPages" => {
                let notebook_query =
                    params::optional_string(&args, &["notebookId", "notebook", "id"]).or_else(|| {
                        params::optional_string(&args, &["notebookName", "notebookTitle", "name"])
                    });
                let section_id = params::optional_string(&args, &["sectionId", "section"]);
                let section_name =
                    params::optional_string(&args, &["sectionName", "sectionTitle", "name"]);
                let client = self.graph_client().await?;
                let section_id = onenote::resolve_section_id(
                    &client,
                    &OnenoteRoot::Me,
                    SectionLookup {
                        notebook_query: notebook_query.as_deref(),
                        section_id: section_id.as_deref(),
                        section_name: section_name.as_deref(),
                    },
                )
                .await?;
                let pages =
                    onenote::list_pages_in_section(&client, &OnenoteRoot::Me, &section_id).await?;
                structured_result_with_text(
                    &json!({ "section_id": section_id, "pages": pages }),
                    None,
                )
            }
            "getPage" => {
                let page_id = params::optional_string(&args, &["pageId", "id"]);
                let page_title = params::optional_string(&args, &["pageTitle", "title", "name"]);
                let client = self.graph_client().await?;
                let (page, content) = pages::get_page_content(
                    &client,
                    &OnenoteRoot::Me,
                    page_id.as_deref(),
                    page_title.as_deref(),
                )
                .await?;
                structured_result_with_text(&json!({ "page": page, "content": content }), None)
            }
            "createPage" => {
                let notebook_query =
                    params::optional_string(&args, &["notebookId", "notebook", "id"]).or_else(|| {
                        params::optional_string(&args, &["notebookName", "notebookTitle", "name"])
                    });
                let section_id = params::optional_string(&args, &["sectionId", "section", "id"]);
                let section_name =
                    params::optional_string(&args, &["sectionName", "sectionTitle", "name"]);
                let title = params::optional_string(&args, &["title"]);
                let html = params::optional_string(&args, &["html", "content"]);
                let client = self.graph_client().await?;
                let section_id = onenote::resolve_section_id(
                    &client,
                    &OnenoteRoot::Me,
                    SectionLookup {
                        notebook_query: notebook_query.as_deref(),
                        section_id: section_id.as_deref(),
                        section_name: section_name.as_deref(),
                    },
                )
                .await?;
                let page = onenote::create_page(
                    &client,
                    &OnenoteRoot::Me,
                    &section_id,
                    title.as_deref(),
                    html.as_deref(),
                )
                .await?;
                structured_result_with_text(&json!({ "page": page }), None)
            }
            "searchPages" => {
                let query =
                    params::required_string(&args, &["query", "searchTerm", "random_string"])?;
                let client = self.graph_client().await?;
                let pages = onenote::search_pages(&client, &OnenoteRoot::Me, &query).await?;
                structured_result_with_text(&json!({ "query": query, "pages": pages }), None)
            }
            "info" => self.server_info().await,
            _ => Err(ConnectorError::ToolNotFound),
        }
    }
}
