use crate::auth::AuthDetails;
use crate::capabilities::ConnectorConfigSchema;
use crate::error::ConnectorError;
use crate::utils::{
    clean_html_entities, extract_video_id, strip_multiple_newlines, structured_result_with_text,
};
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
use yt_transcript_rs::YouTubeTranscriptApi;

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTranscriptInput {
    /// Video id, or a full watch/short/embed URL.
    pub video_id: String,
    /// Preferred transcript languages, tried in order.
    #[serde(default = "default_languages")]
    #[schemars(default = "default_languages")]
    pub languages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptOutput {
    pub video_id: String,
    /// Human-readable language name, e.g. "English".
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub snippet_count: usize,
    pub text: String,
}

#[derive(Default)]
pub struct TranscriptsConnector;

impl TranscriptsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TranscriptsConnector {
    fn name(&self) -> &'static str {
        "transcripts"
    }

    fn description(&self) -> &'static str {
        "Fetch YouTube video transcripts as clean plain text. No credential required."
    }

    async fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            tools: None,
            ..Default::default()
        }
    }

    async fn get_auth_details(&self) -> Result<AuthDetails, ConnectorError> {
        Ok(AuthDetails::new())
    }

    async fn set_auth_details(&mut self, _details: AuthDetails) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn test_auth(&self) -> Result<(), ConnectorError> {
        Ok(())
    }

    fn config_schema(&self) -> ConnectorConfigSchema {
        ConnectorConfigSchema { fields: vec![] }
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
                "Transcript retrieval for YouTube videos; works without an API key".to_string(),
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
        let tools = vec![Tool {
            name: Cow::Borrowed("get_transcript"),
            title: None,
            description: Some(Cow::Borrowed(
                "Fetch a video's transcript (manual or auto-generated) as plain text, by video id or URL.",
            )),
            input_schema: Arc::new(
                serde_json::to_value(schemars::schema_for!(GetTranscriptInput))
                    .map_err(|e| ConnectorError::Other(e.to_string()))?
                    .as_object()
                    .expect("Schema object")
                    .clone(),
            ),
            output_schema: None,
            annotations: None,
            icons: None,
        }];

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
            "get_transcript" => {
                let input: GetTranscriptInput = serde_json::from_value(Value::Object(args_map))
                    .map_err(|e| ConnectorError::InvalidParams(e.to_string()))?;

                let video_id = extract_video_id(&input.video_id);
                let languages = if input.languages.is_empty() {
                    default_languages()
                } else {
                    input.languages
                };
                let langs: Vec<&str> = languages.iter().map(String::as_str).collect();

                let api = YouTubeTranscriptApi::new(None, None, None)
                    .map_err(|e| ConnectorError::Other(e.to_string()))?;
                let fetched = api
                    .fetch_transcript(&video_id, &langs, false)
                    .await
                    .map_err(|e| {
                        ConnectorError::Api(format!(
                            "transcript fetch failed for {}: {}",
                            video_id, e
                        ))
                    })?;

                let parts = fetched.parts();
                let snippet_count = parts.len();
                let raw_text = parts
                    .iter()
                    .map(|p| p.text.clone())
                    .collect::<Vec<_>>()
                    .join(" ");
                let text = strip_multiple_newlines(&clean_html_entities(&raw_text));

                let output = TranscriptOutput {
                    video_id,
                    language: fetched.language.clone(),
                    language_code: fetched.language_code.clone(),
                    is_generated: fetched.is_generated,
                    snippet_count,
                    text,
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
