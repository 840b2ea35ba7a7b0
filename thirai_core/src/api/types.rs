//! Typed projections of Data API resources.
//!
//! Every field the API marks optional really is absent in practice (deleted
//! videos lose their resource reference, hidden channels drop statistics), so
//! each projection decodes with defaults and exposes accessor helpers with
//! explicit fallbacks instead of assuming shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_per_page: Option<i64>,
}

/// One page of `playlistItems.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemPage {
    #[serde(default)]
    pub items: Vec<PlaylistItemResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResource {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<PlaylistItemSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_details: Option<PlaylistItemContentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the item was added to the playlist (not the video upload date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_status: Option<String>,
}

impl PlaylistItemResource {
    /// Video id from the embedded resource reference, with a fallback to
    /// contentDetails. Absent entirely for some unavailable items.
    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .as_ref()
            .and_then(|s| s.resource_id.as_ref())
            .and_then(|r| r.video_id.as_deref())
            .or_else(|| {
                self.content_details
                    .as_ref()
                    .and_then(|c| c.video_id.as_deref())
            })
    }

    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.description.as_deref())
            .unwrap_or("")
    }

    pub fn privacy_status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.privacy_status.as_deref())
    }

    pub fn position(&self) -> u32 {
        self.snippet.as_ref().and_then(|s| s.position).unwrap_or(0)
    }

    /// Timestamp the item was added to the playlist, RFC 3339 when present.
    pub fn added_at(&self) -> Option<&str> {
        self.snippet.as_ref().and_then(|s| s.published_at.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_details: Option<VideoContentDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Counters arrive as decimal strings on the wire; they are passed through
/// unparsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SearchResultId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl SearchResult {
    pub fn video_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.video_id.as_deref())
    }

    pub fn playlist_id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|id| id.playlist_id.as_deref())
    }

    /// Search snippets come back HTML-escaped; callers unescape when
    /// projecting.
    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.description.as_deref())
            .unwrap_or("")
    }

    pub fn channel_title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.channel_title.as_deref())
            .unwrap_or("")
    }

    pub fn published_at(&self) -> Option<&str> {
        self.snippet.as_ref().and_then(|s| s.published_at.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResource {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_subscriber_count: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPlaylists {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResource {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<PlaylistSnippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
}

impl PlaylistResource {
    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.snippet
            .as_ref()
            .and_then(|s| s.description.as_deref())
            .unwrap_or("")
    }

    pub fn item_count(&self) -> Option<u32> {
        self.content_details.as_ref().and_then(|c| c.item_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn playlist_item_decodes_with_most_fields_absent() {
        let raw = json!({
            "kind": "youtube#playlistItem",
            "id": "UExhYmNk",
            "snippet": {"title": "Deleted video"}
        });
        let item: PlaylistItemResource = serde_json::from_value(raw).unwrap();
        assert_eq!(item.id, "UExhYmNk");
        assert_eq!(item.title(), "Deleted video");
        assert_eq!(item.video_id(), None);
        assert_eq!(item.privacy_status(), None);
        assert_eq!(item.position(), 0);
        assert_eq!(item.added_at(), None);
    }

    #[test]
    fn playlist_item_video_id_prefers_resource_reference() {
        let raw = json!({
            "id": "UExhYmNk",
            "snippet": {
                "resourceId": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"}
            },
            "contentDetails": {"videoId": "stale_id"}
        });
        let item: PlaylistItemResource = serde_json::from_value(raw).unwrap();
        assert_eq!(item.video_id(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn playlist_item_video_id_falls_back_to_content_details() {
        let raw = json!({
            "id": "UExhYmNk",
            "snippet": {"title": "t"},
            "contentDetails": {"videoId": "dQw4w9WgXcQ"}
        });
        let item: PlaylistItemResource = serde_json::from_value(raw).unwrap();
        assert_eq!(item.video_id(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn last_page_has_no_next_token() {
        let raw = json!({
            "items": [],
            "pageInfo": {"totalResults": 0, "resultsPerPage": 50}
        });
        let page: PlaylistItemPage = serde_json::from_value(raw).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn video_statistics_stay_decimal_strings() {
        let raw = json!({
            "id": "dQw4w9WgXcQ",
            "statistics": {"viewCount": "1614556418", "likeCount": "17054443"}
        });
        let video: VideoResource = serde_json::from_value(raw).unwrap();
        let stats = video.statistics.unwrap();
        assert_eq!(stats.view_count.as_deref(), Some("1614556418"));
        assert_eq!(stats.like_count.as_deref(), Some("17054443"));
        assert_eq!(stats.comment_count, None);
    }

    #[test]
    fn serialized_resources_omit_absent_fields() {
        let video = VideoResource {
            id: "abc12345678".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value, json!({"id": "abc12345678"}));
    }
}
