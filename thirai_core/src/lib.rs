// src/lib.rs
pub mod api;
pub mod auth;
pub mod auth_store;
pub mod capabilities; // Keep for config schema
pub mod connectors;
pub mod error;
pub mod mcp_server;
pub mod playlist_ops;
pub mod resolver;
pub mod transport;
pub mod utils;
use std::sync::Arc;

// Re-export types from rmcp that users of your library might need
pub use rmcp::model::{
    Annotated, CallToolRequestParam, CallToolResult, Content, Implementation,
    InitializeRequestParam, InitializeResult, IntoContents, ListPromptsResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, Prompt, ProtocolVersion, RawContent, RawResource,
    ReadResourceRequestParam, Resource, ResourceContents, ServerCapabilities, TextContent, Tool,
};

use crate::auth::AuthDetails;
use crate::error::ConnectorError;
pub use crate::capabilities::ConnectorConfigSchema; // Export for CLI usage
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the unique name of the connector (acting as the MCP server name).
    fn name(&self) -> &'static str;

    /// Returns a description of the connector.
    fn description(&self) -> &'static str;

    /// Returns the canonical provider name for credential lookup.
    ///
    /// This is the key used to look up credentials in the auth store.
    /// Defaults to the connector name. Override for connectors that share
    /// credentials with other systems.
    ///
    /// # Example
    /// - `videos`, `playlists` and `channels` all return `"youtube"` to share
    ///   one Data API credential
    /// - `transcripts` returns `"transcripts"` (same as name, uses default)
    fn credential_provider(&self) -> &'static str {
        self.name()
    }

    /// Returns the MCP capabilities of this connector.
    async fn capabilities(&self) -> ServerCapabilities; // Use MCP's ServerCapabilities

    // --- MCP Request Handlers (One for each relevant MCP request type) ---
    async fn initialize(
        &self,
        request: InitializeRequestParam,
    ) -> Result<InitializeResult, ConnectorError>;
    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
    ) -> Result<ListResourcesResult, ConnectorError>;
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
    ) -> Result<Vec<ResourceContents>, ConnectorError>;
    async fn list_tools(
        &self,
        request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError>;
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ConnectorError>;
    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
    ) -> Result<ListPromptsResult, ConnectorError>;
    async fn get_prompt(&self, name: &str) -> Result<Prompt, ConnectorError>; // Still a single prompt

    // --- Authentication and Configuration ---

    async fn get_auth_details(&self) -> Result<AuthDetails, ConnectorError>;
    async fn set_auth_details(&mut self, details: AuthDetails) -> Result<(), ConnectorError>;
    async fn test_auth(&self) -> Result<(), ConnectorError>;
    fn config_schema(&self) -> ConnectorConfigSchema;
}

pub struct ProviderRegistry {
    pub providers: HashMap<String, Arc<tokio::sync::Mutex<Box<dyn Connector>>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        ProviderRegistry {
            providers: HashMap::new(),
        }
    }
    pub fn register_provider(&mut self, provider: Box<dyn Connector>) {
        self.providers.insert(
            provider.name().to_string(),
            Arc::new(tokio::sync::Mutex::new(provider)),
        );
    }
    pub fn get_provider(&self, name: &str) -> Option<&Arc<tokio::sync::Mutex<Box<dyn Connector>>>> {
        self.providers.get(name)
    }
    pub fn list_providers(&self) -> Vec<ServerInfo> {
        self.providers
            .iter()
            .map(|(name, connector)| {
                if let Ok(c) = connector.try_lock() {
                    ServerInfo {
                        name: name.clone(),
                        description: c.description().to_string(),
                    }
                } else {
                    ServerInfo {
                        name: name.clone(),
                        description: String::new(),
                    }
                }
            })
            .collect()
    }

    pub async fn get_provider_capabilities(&self) -> Vec<ServerCapabilities> {
        let mut results = Vec::new();
        for provider in self.providers.values() {
            let c = provider.lock().await;
            results.push(c.capabilities().await);
        }
        results
    }

    pub async fn get_provider_tools(&self) -> Vec<Tool> {
        let mut all_tools = Vec::new();
        for provider in self.providers.values() {
            let c = provider.lock().await;
            if let Ok(response) = c.list_tools(None).await {
                all_tools.extend(response.tools);
            }
        }
        all_tools
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a registry that registers only connectors enabled via Cargo features.
/// This is useful for downstream apps to depend on a minimal feature set and get
/// a ready-to-use registry without manually wiring each connector.
///
/// The three Data API connectors share a single client handle seeded from
/// `YOUTUBE_API_KEY` if present; credentials can be replaced later through
/// `set_auth_details`.
pub async fn build_registry_enabled_only() -> ProviderRegistry {
    #[allow(unused_mut)]
    let mut registry = ProviderRegistry::new();

    #[cfg(any(feature = "videos", feature = "playlists", feature = "channels"))]
    let api: Arc<dyn api::YouTubeApi> = Arc::new(api::DataApiClient::from_env());

    #[cfg(feature = "videos")]
    {
        let connector = connectors::videos::VideosConnector::new(api.clone());
        registry.register_provider(Box::new(connector));
    }

    #[cfg(feature = "playlists")]
    {
        let connector = connectors::playlists::PlaylistsConnector::new(api.clone());
        registry.register_provider(Box::new(connector));
    }

    #[cfg(feature = "channels")]
    {
        let connector = connectors::channels::ChannelsConnector::new(api.clone());
        registry.register_provider(Box::new(connector));
    }

    #[cfg(feature = "transcripts")]
    {
        let connector = connectors::transcripts::TranscriptsConnector::new();
        registry.register_provider(Box::new(connector));
    }

    registry
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub description: String,
}
