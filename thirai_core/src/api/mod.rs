pub mod client;
pub mod types;

pub use client::{ApiAuth, DataApiClient, API_BASE_URL};
pub use types::{
    ChannelResource, PlaylistItemPage, PlaylistItemResource, PlaylistResource, SearchResult,
    VideoResource,
};

use crate::error::ConnectorError;
use async_trait::async_trait;

/// What `search.list` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Video,
    Playlist,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Video => "video",
            SearchKind::Playlist => "playlist",
        }
    }
}

/// Parameters for a `search.list` call. `query` and `channel_id` are both
/// optional on the wire; callers set whichever combination they need.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: Option<String>,
    pub kind: SearchKind,
    pub channel_id: Option<String>,
    pub order: Option<String>,
    pub max_results: u32,
}

/// Typed boundary to the YouTube Data API v3, one method per consumed
/// endpoint operation.
///
/// Connectors hold this as an `Arc<dyn YouTubeApi>` injected at
/// construction; tests substitute fakes through the same trait. The real
/// implementation is [`DataApiClient`].
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    /// One page of `playlistItems.list` (parts `snippet,contentDetails,status`).
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemPage, ConnectorError>;

    /// `playlistItems.delete` by playlist item id (not video id).
    async fn delete_playlist_item(&self, playlist_item_id: &str) -> Result<(), ConnectorError>;

    /// `playlists.list` by playlist id; `None` when the id matches nothing.
    async fn get_playlist(
        &self,
        playlist_id: &str,
    ) -> Result<Option<PlaylistResource>, ConnectorError>;

    /// `playlists.list` by owning channel.
    async fn list_channel_playlists(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlaylistResource>, ConnectorError>;

    /// `videos.list` by video id with caller-chosen parts.
    async fn get_video(
        &self,
        video_id: &str,
        parts: &[String],
    ) -> Result<Option<VideoResource>, ConnectorError>;

    /// `videos.list` with `chart=mostPopular`.
    async fn list_trending_videos(
        &self,
        region_code: &str,
        max_results: u32,
        video_category_id: Option<&str>,
    ) -> Result<Vec<VideoResource>, ConnectorError>;

    /// `search.list` over videos or playlists.
    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, ConnectorError>;

    /// `channels.list` by channel id; `None` when the id matches nothing.
    async fn get_channel(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelResource>, ConnectorError>;
}
