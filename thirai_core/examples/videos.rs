use serde_json::json;
use std::sync::Arc;
use thirai_core::api::{DataApiClient, YouTubeApi};
use thirai_core::connectors::videos::VideosConnector;
use thirai_core::{CallToolRequestParam, Connector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads YOUTUBE_API_KEY from the environment.
    let api: Arc<dyn YouTubeApi> = Arc::new(DataApiClient::from_env());
    let connector = VideosConnector::new(api);
    connector.test_auth().await?;

    let search_response = connector
        .call_tool(CallToolRequestParam {
            name: "search_videos".into(),
            arguments: Some(
                json!({
                    "query": "rust async runtime",
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

    // Fetch full details for the first result (if present)
    let first_id = structured
        .get("results")
        .and_then(|v| v.as_array())
        .and_then(|results| results.first())
        .and_then(|hit| hit.get("videoId"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    if let Some(id) = first_id {
        let video_response = connector
            .call_tool(CallToolRequestParam {
                name: "get_video".into(),
                arguments: Some(json!({ "videoId": id }).as_object().unwrap().clone()),
            })
            .await?;
        let video_structured = video_response
            .structured_content
            .unwrap_or_else(|| json!({}));
        println!(
            "First video:\n{}",
            serde_json::to_string_pretty(&video_structured)?
        );
    }

    Ok(())
}
