use crate::api::{DataApiClient, PlaylistItemResource, SearchKind, SearchParams, YouTubeApi};
use crate::auth::AuthDetails;
use crate::capabilities::ConnectorConfigSchema;
use crate::connectors::youtube_config_schema;
use crate::error::ConnectorError;
use crate::playlist_ops::{self, RecentItem};
use crate::utils::{clean_html_entities, structured_result_with_text};
use crate::Connector;
use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, InitializeRequestParam, InitializeResult,
    ListPromptsResult, ListResourcesResult, ListToolsResult, PaginatedRequestParam, Prompt,
    ProtocolVersion, ReadResourceRequestParam, ResourceContents, ServerCapabilities, Tool,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

fn default_page_limit() -> u32 {
    50
}

fn default_search_limit() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPlaylistInput {
    /// Playlist id, e.g. "PLBCF2DAC6FFB574DE".
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPlaylistItemsInput {
    pub playlist_id: String,
    /// Number of items, 1-50. A single page is fetched.
    #[serde(default = "default_page_limit")]
    #[schemars(default = "default_page_limit")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPlaylistsInput {
    pub query: String,
    #[serde(default = "default_search_limit")]
    #[schemars(default = "default_search_limit")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindUnavailableInput {
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUnavailableInput {
    pub playlist_id: String,
    /// Playlist item ids (not video ids), as reported by find_unavailable_videos.
    pub playlist_item_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergePlaylistsInput {
    pub source_playlist_ids: Vec<String>,
    pub target_playlist_id: String,
    /// Skip videos already seen in an earlier source.
    #[serde(default = "default_true")]
    #[schemars(default = "default_true")]
    pub deduplicate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRecentItemsInput {
    pub playlist_id: String,
    /// ISO-8601 timestamp; only items added strictly after it are returned.
    pub added_after: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsOutput {
    pub playlist_id: String,
    pub items: Vec<PlaylistItemResource>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSearchItem {
    pub playlist_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPlaylistsOutput {
    pub query: String,
    pub results: Vec<PlaylistSearchItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItemsOutput {
    pub playlist_id: String,
    pub added_after: String,
    pub items: Vec<RecentItem>,
}

pub struct PlaylistsConnector {
    api: Arc<dyn YouTubeApi>,
}

impl PlaylistsConnector {
    pub fn new(api: Arc<dyn YouTubeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Connector for PlaylistsConnector {
    fn name(&self) -> &'static str {
        "playlists"
    }

    fn description(&self) -> &'static str {
        "Work with YouTube playlists: lookup, search, unavailable-video cleanup, merge planning, and recency filters."
    }

    fn credential_provider(&self) -> &'static str {
        "youtube"
    }

    async fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: None,
            ..Default::default()
        }
    }

    async fn get_auth_details(&self) -> Result<AuthDetails, ConnectorError> {
        // Secrets are never echoed back.
        Ok(AuthDetails::new())
    }

    async fn set_auth_details(&mut self, details: AuthDetails) -> Result<(), ConnectorError> {
        if details.is_empty() {
            self.api = Arc::new(DataApiClient::new(crate::api::ApiAuth::None));
            return Ok(());
        }
        self.api = Arc::new(DataApiClient::from_auth_details(&details)?);
        Ok(())
    }

    async fn test_auth(&self) -> Result<(), ConnectorError> {
        self.api.list_trending_videos("US", 1, None).await?;
        Ok(())
    }

    fn config_schema(&self) -> ConnectorConfigSchema {
        youtube_config_schema()
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
                version: "0.1.0".to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Playlist operations over the YouTube Data API: lookup, search, cleanup, merge planning"
                    .to_string(),
            ),
        })
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListResourcesResult, ConnectorError> {
        Ok(ListResourcesResult {
            resources: vec![],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        _request: ReadResourceRequestParam,
    ) -> Result<Vec<ResourceContents>, ConnectorError> {
        Err(ConnectorError::ResourceNotFound)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, ConnectorError> {
        let tools = vec![
            Tool {
                name: Cow::Borrowed("get_playlist"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get a playlist's title, description, and item count by id.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetPlaylistInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("get_playlist_items"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List up to 50 items from a playlist. Fetches a single page; use find_unavailable_videos for a full scan.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetPlaylistItemsInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("search_playlists"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Search public playlists by keyword.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(SearchPlaylistsInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("find_unavailable_videos"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Scan an entire playlist, page by page, and report every deleted or private video.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(FindUnavailableInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("remove_unavailable_videos"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Remove playlist items by id, one at a time, continuing past per-item failures. Needs write access on the playlist.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(RemoveUnavailableInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("merge_playlists"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Plan a merge of several playlists into a target: per-source stats, a deduplicated candidate list, and a summary. Nothing is written.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(MergePlaylistsInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("get_recent_items"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List items added strictly after an ISO-8601 timestamp. Inspects the newest 50 entries only.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetRecentItemsInput))
                        .map_err(|e| ConnectorError::Other(e.to_string()))?
                        .as_object()
                        .expect("Schema object")
                        .clone(),
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
        let name = request.name.as_ref();
        let args = request.arguments.unwrap_or_default();
        let args_map = serde_json::Map::from_iter(args);

        match name {
            "get_playlist" => {
                let input: GetPlaylistInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                match self.api.get_playlist(&input.playlist_id).await? {
                    Some(playlist) => {
                        let text = serde_json::to_string(&playlist)?;
                        Ok(structured_result_with_text(&playlist, Some(text))?)
                    }
                    None => {
                        tracing::warn!(playlist_id = %input.playlist_id, "Playlist not found");
                        Err(ConnectorError::ResourceNotFound)
                    }
                }
            }
            "get_playlist_items" => {
                let input: GetPlaylistItemsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let page = self
                    .api
                    .list_playlist_items(&input.playlist_id, input.max_results.clamp(1, 50), None)
                    .await?;

                let output = PlaylistItemsOutput {
                    playlist_id: input.playlist_id,
                    items: page.items,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            "search_playlists" => {
                let input: SearchPlaylistsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let results = self
                    .api
                    .search(SearchParams {
                        query: Some(input.query.clone()),
                        kind: SearchKind::Playlist,
                        channel_id: None,
                        order: None,
                        max_results: input.max_results.clamp(1, 50),
                    })
                    .await?;

                let results: Vec<PlaylistSearchItem> = results
                    .iter()
                    .filter_map(|result| {
                        let playlist_id = result.playlist_id()?.to_string();
                        let url = format!("https://www.youtube.com/playlist?list={}", playlist_id);
                        Some(PlaylistSearchItem {
                            playlist_id,
                            title: clean_html_entities(result.title()),
                            description: clean_html_entities(result.description()),
                            channel_title: clean_html_entities(result.channel_title()),
                            url,
                        })
                    })
                    .collect();

                let output = SearchPlaylistsOutput {
                    query: input.query,
                    results,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            "find_unavailable_videos" => {
                let input: FindUnavailableInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let report =
                    playlist_ops::find_unavailable(self.api.as_ref(), &input.playlist_id).await?;
                let text = serde_json::to_string(&report)?;
                Ok(structured_result_with_text(&report, Some(text))?)
            }
            "remove_unavailable_videos" => {
                let input: RemoveUnavailableInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let report = playlist_ops::remove_items(
                    self.api.as_ref(),
                    &input.playlist_id,
                    &input.playlist_item_ids,
                )
                .await?;
                let text = serde_json::to_string(&report)?;
                Ok(structured_result_with_text(&report, Some(text))?)
            }
            "merge_playlists" => {
                let input: MergePlaylistsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let report = playlist_ops::merge_playlists(
                    self.api.as_ref(),
                    &input.source_playlist_ids,
                    &input.target_playlist_id,
                    input.deduplicate,
                )
                .await?;
                let text = serde_json::to_string(&report)?;
                Ok(structured_result_with_text(&report, Some(text))?)
            }
            "get_recent_items" => {
                let input: GetRecentItemsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let items = playlist_ops::items_added_after(
                    self.api.as_ref(),
                    &input.playlist_id,
                    &input.added_after,
                )
                .await?;

                let output = RecentItemsOutput {
                    playlist_id: input.playlist_id,
                    added_after: input.added_after,
                    items,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            _ => Err(ConnectorError::ToolNotFound),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListPromptsResult, ConnectorError> {
        Ok(ListPromptsResult {
            prompts: vec![],
            next_cursor: None,
        })
    }

    async fn get_prompt(&self, _name: &str) -> Result<Prompt, ConnectorError> {
        Err(ConnectorError::MethodNotFound)
    }
}
