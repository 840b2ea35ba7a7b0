use crate::api::{DataApiClient, PlaylistResource, SearchKind, SearchParams, YouTubeApi};
use crate::auth::AuthDetails;
use crate::capabilities::ConnectorConfigSchema;
use crate::connectors::youtube_config_schema;
use crate::error::ConnectorError;
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

fn default_listing_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetChannelInput {
    /// Channel id, e.g. "UC_x5XG1OV2P6uZZ5FSM9Ttw".
    pub channel_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListChannelVideosInput {
    pub channel_id: String,
    /// Number of results, 1-50.
    #[serde(default = "default_listing_limit")]
    #[schemars(default = "default_listing_limit")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetChannelPlaylistsInput {
    pub channel_id: String,
    #[serde(default = "default_listing_limit")]
    #[schemars(default = "default_listing_limit")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetChannelStatsInput {
    pub channel_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVideoItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVideosOutput {
    pub channel_id: String,
    pub videos: Vec<ChannelVideoItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPlaylistsOutput {
    pub channel_id: String,
    pub playlists: Vec<PlaylistResource>,
}

pub struct ChannelsConnector {
    api: Arc<dyn YouTubeApi>,
}

impl ChannelsConnector {
    pub fn new(api: Arc<dyn YouTubeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Connector for ChannelsConnector {
    fn name(&self) -> &'static str {
        "channels"
    }

    fn description(&self) -> &'static str {
        "Inspect YouTube channels: profile, statistics, recent uploads, and playlists."
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
                "Channel lookup over the YouTube Data API: profile, uploads, playlists, stats"
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
                name: Cow::Borrowed("get_channel"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get a channel's snippet, statistics, and contentDetails by channel id.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetChannelInput))
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
                name: Cow::Borrowed("list_videos"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List a channel's most recent videos, newest first.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(ListChannelVideosInput))
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
                name: Cow::Borrowed("get_playlists"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List the public playlists a channel owns.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetChannelPlaylistsInput))
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
                name: Cow::Borrowed("get_statistics"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get only the statistics object (subscriberCount, viewCount, videoCount) for a channel.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetChannelStatsInput))
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
            "get_channel" => {
                let input: GetChannelInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                match self.api.get_channel(&input.channel_id).await? {
                    Some(channel) => {
                        let text = serde_json::to_string(&channel)?;
                        Ok(structured_result_with_text(&channel, Some(text))?)
                    }
                    None => {
                        tracing::warn!(channel_id = %input.channel_id, "Channel not found");
                        Err(ConnectorError::ResourceNotFound)
                    }
                }
            }
            "list_videos" => {
                let input: ListChannelVideosInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let results = self
                    .api
                    .search(SearchParams {
                        query: None,
                        kind: SearchKind::Video,
                        channel_id: Some(input.channel_id.clone()),
                        order: Some("date".to_string()),
                        max_results: input.max_results.clamp(1, 50),
                    })
                    .await?;

                let videos: Vec<ChannelVideoItem> = results
                    .iter()
                    .filter_map(|result| {
                        let video_id = result.video_id()?.to_string();
                        let url = format!("https://www.youtube.com/watch?v={}", video_id);
                        Some(ChannelVideoItem {
                            video_id,
                            title: clean_html_entities(result.title()),
                            description: clean_html_entities(result.description()),
                            published_at: result.published_at().map(|s| s.to_string()),
                            url,
                        })
                    })
                    .collect();

                let output = ChannelVideosOutput {
                    channel_id: input.channel_id,
                    videos,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            "get_playlists" => {
                let input: GetChannelPlaylistsInput =
                    serde_json::from_value(Value::Object(args_map))
                        .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let playlists = self
                    .api
                    .list_channel_playlists(&input.channel_id, input.max_results.clamp(1, 50))
                    .await?;

                let output = ChannelPlaylistsOutput {
                    channel_id: input.channel_id,
                    playlists,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            "get_statistics" => {
                let input: GetChannelStatsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                match self.api.get_channel(&input.channel_id).await? {
                    Some(channel) => {
                        let stats = channel.statistics.unwrap_or_default();
                        let text = serde_json::to_string(&stats)?;
                        Ok(structured_result_with_text(&stats, Some(text))?)
                    }
                    None => {
                        tracing::warn!(channel_id = %input.channel_id, "Channel not found");
                        Err(ConnectorError::ResourceNotFound)
                    }
                }
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
