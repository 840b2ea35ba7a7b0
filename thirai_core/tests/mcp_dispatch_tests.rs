#![cfg(feature = "playlists")]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use thirai_core::api::types::{
    ChannelResource, ItemStatus, PlaylistItemPage, PlaylistItemResource, PlaylistItemSnippet,
    PlaylistResource, ResourceId, SearchResult, VideoResource,
};
use thirai_core::api::{SearchParams, YouTubeApi};
use thirai_core::connectors::playlists::PlaylistsConnector;
use thirai_core::error::ConnectorError;
use thirai_core::mcp_server::{JsonRpcHandler, McpServer};
use thirai_core::{
    CallToolResult, InitializeResult, ListToolsResult, ProtocolVersion, ProviderRegistry,
};
use tokio::sync::Mutex;

/// Serves one canned playlist page; everything else is empty.
struct StubApi;

fn stub_item(id: &str, video_id: &str, title: &str, privacy: &str) -> PlaylistItemResource {
    PlaylistItemResource {
        id: id.to_string(),
        snippet: Some(PlaylistItemSnippet {
            title: Some(title.to_string()),
            description: None,
            published_at: None,
            playlist_id: Some("PLdemo".to_string()),
            position: Some(0),
            resource_id: Some(ResourceId {
                kind: Some("youtube#video".to_string()),
                video_id: Some(video_id.to_string()),
            }),
        }),
        content_details: None,
        status: Some(ItemStatus {
            privacy_status: Some(privacy.to_string()),
        }),
    }
}

#[async_trait]
impl YouTubeApi for StubApi {
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        _max_results: u32,
        _page_token: Option<&str>,
    ) -> Result<PlaylistItemPage, ConnectorError> {
        if playlist_id != "PLdemo" {
            return Err(ConnectorError::Api(format!(
                "playlist {} not found",
                playlist_id
            )));
        }
        Ok(PlaylistItemPage {
            items: vec![
                stub_item("item-deleted", "v1", "Deleted video", "private"),
                stub_item("item-ok", "v2", "Crust of Rust", "public"),
            ],
            next_page_token: None,
            page_info: None,
        })
    }

    async fn delete_playlist_item(&self, _playlist_item_id: &str) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn get_playlist(
        &self,
        _playlist_id: &str,
    ) -> Result<Option<PlaylistResource>, ConnectorError> {
        Ok(None)
    }

    async fn list_channel_playlists(
        &self,
        _channel_id: &str,
        _max_results: u32,
    ) -> Result<Vec<PlaylistResource>, ConnectorError> {
        Ok(Vec::new())
    }

    async fn get_video(
        &self,
        _video_id: &str,
        _parts: &[String],
    ) -> Result<Option<VideoResource>, ConnectorError> {
        Ok(None)
    }

    async fn list_trending_videos(
        &self,
        _region_code: &str,
        _max_results: u32,
        _video_category_id: Option<&str>,
    ) -> Result<Vec<VideoResource>, ConnectorError> {
        Ok(Vec::new())
    }

    async fn search(&self, _params: SearchParams) -> Result<Vec<SearchResult>, ConnectorError> {
        Ok(Vec::new())
    }

    async fn get_channel(
        &self,
        _channel_id: &str,
    ) -> Result<Option<ChannelResource>, ConnectorError> {
        Ok(None)
    }
}

fn handler() -> JsonRpcHandler {
    let api: Arc<dyn YouTubeApi> = Arc::new(StubApi);
    let mut registry = ProviderRegistry::new();
    registry.register_provider(Box::new(PlaylistsConnector::new(api)));
    JsonRpcHandler::new(McpServer::new(Arc::new(Mutex::new(registry))))
}

#[tokio::test]
async fn test_tools_list_namespaces_and_injects_auth_tools() {
    let handler = handler();

    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
        .await;
    assert_eq!(response["id"], 1);

    let result: ListToolsResult =
        serde_json::from_value(response["result"].clone()).expect("tools/list result");
    let names: Vec<String> = result.tools.iter().map(|t| t.name.to_string()).collect();

    assert!(names.contains(&"playlists/find_unavailable_videos".to_string()));
    assert!(names.contains(&"playlists/merge_playlists".to_string()));

    // One auth tool set for the shared youtube provider
    assert!(names.contains(&"auth/youtube/set".to_string()));
    assert!(names.contains(&"auth/youtube/test".to_string()));
    assert!(names.contains(&"auth/youtube/get_schema".to_string()));

    // Every non-auth tool carries its connector prefix
    for name in &names {
        assert!(
            name.starts_with("playlists/") || name.starts_with("auth/"),
            "unprefixed tool name: {}",
            name
        );
    }
}

#[tokio::test]
async fn test_tools_call_routes_by_connector_prefix() {
    let handler = handler();

    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "name": "playlists/find_unavailable_videos",
                "arguments": {"playlistId": "PLdemo"}
            }
        }))
        .await;

    let result: CallToolResult =
        serde_json::from_value(response["result"].clone()).expect("tools/call result");
    let payload = result.structured_content.expect("structured content");

    assert_eq!(payload["playlistId"], "PLdemo");
    assert_eq!(payload["totalItems"], 2);
    assert_eq!(payload["unavailableCount"], 1);
    assert_eq!(payload["unavailableItems"][0]["id"], "item-deleted");
}

#[tokio::test]
async fn test_unknown_method_maps_to_json_rpc_error() {
    let handler = handler();

    let response = handler
        .handle_request(json!({"jsonrpc": "2.0", "id": 7, "method": "shell/exec"}))
        .await;

    assert_eq!(response["id"], 7);
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_unknown_connector_is_rejected() {
    let handler = handler();

    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "podcasts/list_episodes", "arguments": {}}
        }))
        .await;

    assert_eq!(response["error"]["code"], -32602);
    let message = response["error"]["message"].as_str().unwrap();
    assert!(message.contains("Unknown connector"), "got: {}", message);
}

#[tokio::test]
async fn test_initialize_reports_server_identity() {
    let handler = handler();

    let version = serde_json::to_value(ProtocolVersion::LATEST).unwrap();
    let response = handler
        .handle_request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "initialize",
            "params": {
                "protocolVersion": version,
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.0.0"}
            }
        }))
        .await;

    let result: InitializeResult =
        serde_json::from_value(response["result"].clone()).expect("initialize result");
    assert_eq!(result.server_info.name, "thirai");
    assert!(result.instructions.unwrap().contains("playlist"));
}
