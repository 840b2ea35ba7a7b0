#[cfg(feature = "channels")]
pub mod channels;
#[cfg(feature = "playlists")]
pub mod playlists;
#[cfg(feature = "transcripts")]
pub mod transcripts;
#[cfg(feature = "videos")]
pub mod videos;

#[cfg(any(feature = "videos", feature = "playlists", feature = "channels"))]
use crate::capabilities::{ConnectorConfigSchema, Field, FieldType};

/// Credential schema shared by every connector that rides the `youtube` provider.
#[cfg(any(feature = "videos", feature = "playlists", feature = "channels"))]
pub(crate) fn youtube_config_schema() -> ConnectorConfigSchema {
    ConnectorConfigSchema {
        fields: vec![Field {
            name: "api_key".to_string(),
            label: "YouTube Data API key".to_string(),
            field_type: FieldType::Secret,
            required: true,
            description: Some(
                "Google Cloud API key with the YouTube Data API v3 enabled. One key serves the videos, playlists and channels connectors."
                    .to_string(),
            ),
        }],
    }
}
