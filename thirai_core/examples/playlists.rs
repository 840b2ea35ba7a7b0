use serde_json::json;
use std::sync::Arc;
use thirai_core::api::{DataApiClient, YouTubeApi};
use thirai_core::connectors::playlists::PlaylistsConnector;
use thirai_core::{CallToolRequestParam, Connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads YOUTUBE_API_KEY from the environment.
    let api: Arc<dyn YouTubeApi> = Arc::new(DataApiClient::from_env());
    let connector = PlaylistsConnector::new(api);
    connector.test_auth().await?;

    let search_response = connector
        .call_tool(CallToolRequestParam {
            name: "search_playlists".into(),
            arguments: Some(
                json!({
                    "query": "rust conference talks",
                    "maxResults": 5
                })
                .as_object()
                .unwrap()
                .clone(),
            ),
        })
        .await?;

    let structured = search_response
        .structured_content
        .unwrap_or_else(|| json!({}));
    println!(
        "Search response:\n{}",
        serde_json::to_string_pretty(&structured)?
    );

    // Scan the first result for deleted or private entries (if present)
    let first_id = structured
        .get("results")
        .and_then(|v| v.as_array())
        .and_then(|results| results.first())
        .and_then(|hit| hit.get("playlistId"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    if let Some(id) = first_id {
        let scan_response = connector
            .call_tool(CallToolRequestParam {
                name: "find_unavailable_videos".into(),
                arguments: Some(json!({ "playlistId": id }).as_object().unwrap().clone()),
            })
            .await?;
        let scan_structured = scan_response
            .structured_content
            .unwrap_or_else(|| json!({}));
        println!(
            "Unavailable-video scan:\n{}",
            serde_json::to_string_pretty(&scan_structured)?
        );
    }

    Ok(())
}
