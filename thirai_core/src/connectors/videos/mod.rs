use crate::api::{DataApiClient, SearchKind, SearchParams, YouTubeApi};
use crate::auth::AuthDetails;
use crate::capabilities::ConnectorConfigSchema;
use crate::connectors::youtube_config_schema;
use crate::error::ConnectorError;
use crate::utils::{clean_html_entities, extract_video_id, structured_result_with_text};
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

fn default_parts() -> Vec<String> {
    vec![
        "snippet".to_string(),
        "contentDetails".to_string(),
        "statistics".to_string(),
    ]
}

fn default_search_limit() -> u32 {
    10
}

fn default_trending_limit() -> u32 {
    10
}

fn default_region() -> String {
    "US".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetVideoInput {
    /// Video id, or a full watch/short/embed URL.
    pub video_id: String,
    /// Resource parts to request.
    #[serde(default = "default_parts")]
    #[schemars(default = "default_parts")]
    pub parts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchVideosInput {
    pub query: String,
    /// Number of results, 1-50.
    #[serde(default = "default_search_limit")]
    #[schemars(default = "default_search_limit")]
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetVideoStatsInput {
    /// Video id, or a full watch/short/embed URL.
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTrendingInput {
    /// ISO 3166-1 alpha-2 region, e.g. "US" or "DE".
    #[serde(default = "default_region")]
    #[schemars(default = "default_region")]
    pub region_code: String,
    #[serde(default = "default_trending_limit")]
    #[schemars(default = "default_trending_limit")]
    pub max_results: u32,
    /// Optional numeric category filter, e.g. "10" for music.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_category_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoSearchItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchVideosOutput {
    pub query: String,
    pub results: Vec<VideoSearchItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingOutput {
    pub region_code: String,
    pub videos: Vec<crate::api::VideoResource>,
}

pub struct VideosConnector {
    api: Arc<dyn YouTubeApi>,
}

impl VideosConnector {
    pub fn new(api: Arc<dyn YouTubeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Connector for VideosConnector {
    fn name(&self) -> &'static str {
        "videos"
    }

    fn description(&self) -> &'static str {
        "Look up YouTube videos: metadata, search, statistics, and trending charts."
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
        // Cheapest authenticated probe.
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
                "Video lookup over the YouTube Data API: details, search, stats, trending"
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
                name: Cow::Borrowed("get_video"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get a video's full resource (snippet, contentDetails, statistics) by id or URL.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetVideoInput))
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
                name: Cow::Borrowed("search_videos"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Search YouTube videos by keyword. Returns up to 50 results with title, description, channel, and URL.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(SearchVideosInput))
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
                name: Cow::Borrowed("get_video_stats"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Get only the statistics object (viewCount, likeCount, commentCount) for a video.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetVideoStatsInput))
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
                name: Cow::Borrowed("get_trending_videos"),
                title: None,
                description: Some(Cow::Borrowed(
                    "List the mostPopular chart for a region, optionally narrowed to a category.",
                )),
                input_schema: Arc::new(
                    serde_json::to_value(schemars::schema_for!(GetTrendingInput))
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
            "get_video" => {
                let input: GetVideoInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;
                let video_id = extract_video_id(&input.video_id);
                let parts = if input.parts.is_empty() {
                    default_parts()
                } else {
                    input.parts
                };

                match self.api.get_video(&video_id, &parts).await? {
                    Some(video) => {
                        let text = serde_json::to_string(&video)?;
                        Ok(structured_result_with_text(&video, Some(text))?)
                    }
                    None => {
                        tracing::warn!(video_id = %video_id, "Video not found");
                        Err(ConnectorError::ResourceNotFound)
                    }
                }
            }
            "search_videos" => {
                let input: SearchVideosInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let results = self
                    .api
                    .search(SearchParams {
                        query: Some(input.query.clone()),
                        kind: SearchKind::Video,
                        channel_id: None,
                        order: None,
                        max_results: input.max_results.clamp(1, 50),
                    })
                    .await?;

                let results: Vec<VideoSearchItem> = results
                    .iter()
                    .filter_map(|result| {
                        let video_id = result.video_id()?.to_string();
                        let url = format!("https://www.youtube.com/watch?v={}", video_id);
                        Some(VideoSearchItem {
                            video_id,
                            title: clean_html_entities(result.title()),
                            description: clean_html_entities(result.description()),
                            channel_title: clean_html_entities(result.channel_title()),
                            published_at: result.published_at().map(|s| s.to_string()),
                            url,
                        })
                    })
                    .collect();

                let output = SearchVideosOutput {
                    query: input.query,
                    results,
                };
                let text = serde_json::to_string(&output)?;
                Ok(structured_result_with_text(&output, Some(text))?)
            }
            "get_video_stats" => {
                let input: GetVideoStatsInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;
                let video_id = extract_video_id(&input.video_id);
                let parts = vec!["statistics".to_string()];

                match self.api.get_video(&video_id, &parts).await? {
                    Some(video) => {
                        let stats = video.statistics.unwrap_or_default();
                        let text = serde_json::to_string(&stats)?;
                        Ok(structured_result_with_text(&stats, Some(text))?)
                    }
                    None => {
                        tracing::warn!(video_id = %video_id, "Video not found");
                        Err(ConnectorError::ResourceNotFound)
                    }
                }
            }
            "get_trending_videos" => {
                let input: GetTrendingInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let videos = self
                    .api
                    .list_trending_videos(
                        &input.region_code,
                        input.max_results.clamp(1, 50),
                        input.video_category_id.as_deref(),
                    )
                    .await?;

                let output = TrendingOutput {
                    region_code: input.region_code,
                    videos,
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
