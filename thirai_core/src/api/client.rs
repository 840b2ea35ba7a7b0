use crate::api::types::{
    ChannelResource, PlaylistItemPage, PlaylistResource, SearchResult, VideoResource,
};
use crate::api::{SearchParams, YouTubeApi};
use crate::auth::AuthDetails;
use crate::error::ConnectorError;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential mode for Data API requests.
#[derive(Debug, Clone)]
pub enum ApiAuth {
    /// Appended to every request as the `key` query parameter.
    ApiKey(String),
    /// Sent as an `Authorization: Bearer` header.
    Bearer(String),
    /// No credential yet; every request fails with an authentication error
    /// until one is supplied.
    None,
}

/// The real [`YouTubeApi`] implementation over HTTPS.
pub struct DataApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: ApiAuth,
}

impl DataApiClient {
    pub fn new(auth: ApiAuth) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: API_BASE_URL.to_string(),
            auth,
        }
    }

    /// Seed credentials from `YOUTUBE_API_KEY` when set; otherwise start
    /// unauthenticated and wait for `set_auth_details`.
    pub fn from_env() -> Self {
        match std::env::var("YOUTUBE_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Self::new(ApiAuth::ApiKey(key.trim().to_string())),
            _ => Self::new(ApiAuth::None),
        }
    }

    /// Build a client from stored credential fields. `api_key` wins over
    /// `access_token` when both are present.
    pub fn from_auth_details(details: &AuthDetails) -> Result<Self, ConnectorError> {
        if let Some(key) = details.get("api_key") {
            if !key.trim().is_empty() {
                return Ok(Self::new(ApiAuth::ApiKey(key.trim().to_string())));
            }
        }
        if let Some(token) = details.get("access_token") {
            if !token.trim().is_empty() {
                return Ok(Self::new(ApiAuth::Bearer(token.trim().to_string())));
            }
        }
        Err(ConnectorError::InvalidParams(
            "expected an api_key or access_token field".to_string(),
        ))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConnectorError> {
        Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| ConnectorError::InternalError(format!("invalid API url: {}", e)))
    }

    fn authorized(
        &self,
        method: Method,
        mut url: Url,
    ) -> Result<reqwest::RequestBuilder, ConnectorError> {
        match &self.auth {
            ApiAuth::ApiKey(key) => {
                url.query_pairs_mut().append_pair("key", key);
                Ok(self.http.request(method, url))
            }
            ApiAuth::Bearer(token) => Ok(self.http.request(method, url).bearer_auth(token)),
            ApiAuth::None => Err(ConnectorError::Authentication(
                "no YouTube credential configured; set YOUTUBE_API_KEY or use auth/youtube/set"
                    .to_string(),
            )),
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ConnectorError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ConnectorError::Timeout(format!("Data API request timed out: {}", e))
            } else {
                ConnectorError::from(e)
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(decode_api_error(status, &body));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ConnectorError> {
        let response = self.send(self.authorized(Method::GET, url)?).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Common `{"items": [...]}` envelope of the list endpoints.
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn decode_api_error(status: StatusCode, body: &str) -> ConnectorError {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        let message = envelope
            .error
            .message
            .unwrap_or_else(|| format!("HTTP {}", status));
        return match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ConnectorError::Authentication(message)
            }
            _ => ConnectorError::Api(message),
        };
    }
    ConnectorError::Api(format!("HTTP {} from the Data API", status))
}

#[async_trait]
impl YouTubeApi for DataApiClient {
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemPage, ConnectorError> {
        let mut url = self.endpoint("playlistItems")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,contentDetails,status")
            .append_pair("playlistId", playlist_id)
            .append_pair("maxResults", &max_results.min(50).to_string());
        if let Some(token) = page_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }
        self.get_json(url).await
    }

    async fn delete_playlist_item(&self, playlist_item_id: &str) -> Result<(), ConnectorError> {
        let mut url = self.endpoint("playlistItems")?;
        url.query_pairs_mut().append_pair("id", playlist_item_id);
        // Success is 204 with an empty body.
        self.send(self.authorized(Method::DELETE, url)?).await?;
        Ok(())
    }

    async fn get_playlist(
        &self,
        playlist_id: &str,
    ) -> Result<Option<PlaylistResource>, ConnectorError> {
        let mut url = self.endpoint("playlists")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,contentDetails")
            .append_pair("id", playlist_id);
        let page: ListEnvelope<PlaylistResource> = self.get_json(url).await?;
        Ok(page.items.into_iter().next())
    }

    async fn list_channel_playlists(
        &self,
        channel_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlaylistResource>, ConnectorError> {
        let mut url = self.endpoint("playlists")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,contentDetails")
            .append_pair("channelId", channel_id)
            .append_pair("maxResults", &max_results.min(50).to_string());
        let page: ListEnvelope<PlaylistResource> = self.get_json(url).await?;
        Ok(page.items)
    }

    async fn get_video(
        &self,
        video_id: &str,
        parts: &[String],
    ) -> Result<Option<VideoResource>, ConnectorError> {
        let mut url = self.endpoint("videos")?;
        url.query_pairs_mut()
            .append_pair("part", &parts.join(","))
            .append_pair("id", video_id);
        let page: ListEnvelope<VideoResource> = self.get_json(url).await?;
        Ok(page.items.into_iter().next())
    }

    async fn list_trending_videos(
        &self,
        region_code: &str,
        max_results: u32,
        video_category_id: Option<&str>,
    ) -> Result<Vec<VideoResource>, ConnectorError> {
        let mut url = self.endpoint("videos")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,contentDetails,statistics")
            .append_pair("chart", "mostPopular")
            .append_pair("regionCode", region_code)
            .append_pair("maxResults", &max_results.min(50).to_string());
        if let Some(category) = video_category_id {
            url.query_pairs_mut().append_pair("videoCategoryId", category);
        }
        let page: ListEnvelope<VideoResource> = self.get_json(url).await?;
        Ok(page.items)
    }

    async fn search(&self, params: SearchParams) -> Result<Vec<SearchResult>, ConnectorError> {
        let mut url = self.endpoint("search")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("part", "snippet")
                .append_pair("type", params.kind.as_str())
                .append_pair("maxResults", &params.max_results.min(50).to_string());
            if let Some(q) = &params.query {
                query.append_pair("q", q);
            }
            if let Some(channel_id) = &params.channel_id {
                query.append_pair("channelId", channel_id);
            }
            if let Some(order) = &params.order {
                query.append_pair("order", order);
            }
        }
        let page: ListEnvelope<SearchResult> = self.get_json(url).await?;
        Ok(page.items)
    }

    async fn get_channel(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelResource>, ConnectorError> {
        let mut url = self.endpoint("channels")?;
        url.query_pairs_mut()
            .append_pair("part", "snippet,statistics,contentDetails");
        // "@handle" inputs resolve through forHandle, everything else is an id
        if channel_id.starts_with('@') {
            url.query_pairs_mut().append_pair("forHandle", channel_id);
        } else {
            url.query_pairs_mut().append_pair("id", channel_id);
        }
        let page: ListEnvelope<ChannelResource> = self.get_json(url).await?;
        Ok(page.items.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_envelope_surfaces_message() {
        let body = r#"{"error": {"code": 404, "message": "Playlist not found.",
            "errors": [{"reason": "playlistNotFound"}]}}"#;
        let err = decode_api_error(StatusCode::NOT_FOUND, body);
        assert!(matches!(err, ConnectorError::Api(m) if m == "Playlist not found."));
    }

    #[test]
    fn forbidden_maps_to_authentication_error() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid."}}"#;
        let err = decode_api_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, ConnectorError::Authentication(m) if m == "API key not valid."));
    }

    #[test]
    fn non_json_error_body_still_reports_status() {
        let err = decode_api_error(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        assert!(matches!(err, ConnectorError::Api(m) if m.contains("502")));
    }

    #[test]
    fn list_envelope_tolerates_missing_items() {
        let envelope: ListEnvelope<VideoResource> =
            serde_json::from_str(r#"{"kind": "youtube#videoListResponse"}"#).unwrap();
        assert!(envelope.items.is_empty());
    }

    #[test]
    fn unauthenticated_client_refuses_to_build_requests() {
        let client = DataApiClient::new(ApiAuth::None);
        let url = client.endpoint("videos").unwrap();
        let err = client.authorized(Method::GET, url).unwrap_err();
        assert!(matches!(err, ConnectorError::Authentication(_)));
    }

    #[test]
    fn auth_details_pick_api_key_over_access_token() {
        let mut details = AuthDetails::new();
        details.insert("access_token".to_string(), "tok".to_string());
        details.insert("api_key".to_string(), "AIza-example".to_string());
        let client = DataApiClient::from_auth_details(&details).unwrap();
        assert!(matches!(client.auth, ApiAuth::ApiKey(ref k) if k == "AIza-example"));

        let err = DataApiClient::from_auth_details(&AuthDetails::new()).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidParams(_)));
    }
}
