//! Smart input resolver that detects URLs, IDs, and queries and routes them to the appropriate connector.
//!
//! This module provides a pattern-matching layer on top of connectors. Given an arbitrary input string,
//! it determines which connector and tool to use, and extracts the relevant parameters.
//!
//! # Example
//!
//! ```rust,ignore
//! use thirai_core::resolver::{SmartResolver, ResolvedAction};
//!
//! let resolver = SmartResolver::new();
//!
//! // Watch URL -> videos/get_video
//! let action = resolver.resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
//! assert_eq!(action.connector, "videos");
//! assert_eq!(action.tool, "get_video");
//!
//! // Playlist URL -> playlists/get_playlist
//! let action = resolver.resolve("https://www.youtube.com/playlist?list=PLBCF2DAC6FFB574DE");
//! assert_eq!(action.connector, "playlists");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A resolved action ready to be executed against a connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAction {
    /// The connector to use (e.g., "videos", "playlists")
    pub connector: String,
    /// The tool to call on the connector (e.g., "get_video", "get_playlist")
    pub tool: String,
    /// Arguments to pass to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Confidence score (0.0 - 1.0) for this match
    pub confidence: f32,
    /// Human-readable description of what was detected
    pub description: String,
}

/// Pattern definition for matching inputs
#[derive(Debug, Clone)]
pub struct InputPattern {
    /// Unique identifier for this pattern
    pub id: &'static str,
    /// The connector this pattern routes to
    pub connector: &'static str,
    /// The tool to call when matched
    pub tool: &'static str,
    /// Regex pattern to match against input
    pub pattern: Regex,
    /// Names of capture groups to extract as arguments
    pub captures: &'static [&'static str],
    /// How to map captures to tool arguments (capture_name -> arg_name)
    pub arg_mapping: &'static [(&'static str, &'static str)],
    /// Priority (higher = checked first)
    pub priority: u32,
    /// Human-readable description
    pub description: &'static str,
}

/// Smart resolver that matches inputs to connector actions
pub struct SmartResolver {
    patterns: Vec<InputPattern>,
}

impl Default for SmartResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartResolver {
    /// Create a new resolver with all default patterns
    pub fn new() -> Self {
        Self {
            patterns: build_default_patterns(),
        }
    }

    /// Resolve an input string to an action
    ///
    /// Returns `None` if no pattern matches the input.
    pub fn resolve(&self, input: &str) -> Option<ResolvedAction> {
        let input = input.trim();

        for pattern in &self.patterns {
            if let Some(captures) = pattern.pattern.captures(input) {
                let mut arguments = HashMap::new();

                // Extract captures and map to arguments
                for (capture_name, arg_name) in pattern.arg_mapping {
                    if let Some(m) = captures.name(capture_name) {
                        arguments.insert(
                            arg_name.to_string(),
                            serde_json::Value::String(m.as_str().to_string()),
                        );
                    }
                }

                return Some(ResolvedAction {
                    connector: pattern.connector.to_string(),
                    tool: pattern.tool.to_string(),
                    arguments,
                    confidence: 1.0,
                    description: pattern.description.to_string(),
                });
            }
        }

        None
    }

    /// Resolve input, returning all possible matches sorted by confidence
    pub fn resolve_all(&self, input: &str) -> Vec<ResolvedAction> {
        let input = input.trim();
        let mut results = Vec::new();

        for pattern in &self.patterns {
            if let Some(captures) = pattern.pattern.captures(input) {
                let mut arguments = HashMap::new();

                for (capture_name, arg_name) in pattern.arg_mapping {
                    if let Some(m) = captures.name(capture_name) {
                        arguments.insert(
                            arg_name.to_string(),
                            serde_json::Value::String(m.as_str().to_string()),
                        );
                    }
                }

                results.push(ResolvedAction {
                    connector: pattern.connector.to_string(),
                    tool: pattern.tool.to_string(),
                    arguments,
                    confidence: 1.0,
                    description: pattern.description.to_string(),
                });
            }
        }

        results
    }

    /// Check if an input matches any pattern
    pub fn can_resolve(&self, input: &str) -> bool {
        let input = input.trim();
        self.patterns.iter().any(|p| p.pattern.is_match(input))
    }

    /// Get list of all supported patterns (for documentation/help)
    pub fn list_patterns(&self) -> Vec<PatternInfo> {
        self.patterns
            .iter()
            .map(|p| PatternInfo {
                id: p.id.to_string(),
                connector: p.connector.to_string(),
                tool: p.tool.to_string(),
                description: p.description.to_string(),
                example: get_pattern_example(p.id),
            })
            .collect()
    }
}

/// Information about a pattern for documentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternInfo {
    pub id: String,
    pub connector: String,
    pub tool: String,
    pub description: String,
    pub example: String,
}

/// Build the default set of patterns
fn build_default_patterns() -> Vec<InputPattern> {
    let mut patterns = vec![
        // === Video URLs ===
        InputPattern {
            id: "video_url_watch",
            connector: "videos",
            tool: "get_video",
            pattern: Regex::new(r"(?:https?://)?(?:www\.|m\.)?youtube\.com/watch\?v=(?P<video_id>[a-zA-Z0-9_-]{11})").unwrap(),
            captures: &["video_id"],
            arg_mapping: &[("video_id", "videoId")],
            priority: 100,
            description: "YouTube video URL (youtube.com/watch?v=...)",
        },
        InputPattern {
            id: "video_url_short",
            connector: "videos",
            tool: "get_video",
            pattern: Regex::new(r"(?:https?://)?youtu\.be/(?P<video_id>[a-zA-Z0-9_-]{11})").unwrap(),
            captures: &["video_id"],
            arg_mapping: &[("video_id", "videoId")],
            priority: 100,
            description: "YouTube short URL (youtu.be/...)",
        },
        InputPattern {
            id: "video_url_embed",
            connector: "videos",
            tool: "get_video",
            pattern: Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/embed/(?P<video_id>[a-zA-Z0-9_-]{11})").unwrap(),
            captures: &["video_id"],
            arg_mapping: &[("video_id", "videoId")],
            priority: 100,
            description: "YouTube embed URL",
        },
        InputPattern {
            id: "video_url_shorts",
            connector: "videos",
            tool: "get_video",
            pattern: Regex::new(r"(?:https?://)?(?:www\.|m\.)?youtube\.com/shorts/(?P<video_id>[a-zA-Z0-9_-]{11})").unwrap(),
            captures: &["video_id"],
            arg_mapping: &[("video_id", "videoId")],
            priority: 100,
            description: "YouTube Shorts URL",
        },
        InputPattern {
            id: "video_id",
            connector: "videos",
            tool: "get_video",
            pattern: Regex::new(r"^(?P<video_id>[a-zA-Z0-9_-]{11})$").unwrap(),
            captures: &["video_id"],
            arg_mapping: &[("video_id", "videoId")],
            priority: 10, // Low priority - only match bare 11-char strings
            description: "YouTube video ID (11 characters)",
        },

        // === Playlists ===
        InputPattern {
            id: "playlist_url",
            connector: "playlists",
            tool: "get_playlist",
            pattern: Regex::new(r"(?:https?://)?(?:www\.|m\.)?youtube\.com/playlist\?list=(?P<playlist_id>[a-zA-Z0-9_-]+)").unwrap(),
            captures: &["playlist_id"],
            arg_mapping: &[("playlist_id", "playlistId")],
            priority: 100,
            description: "YouTube playlist URL",
        },
        InputPattern {
            id: "playlist_id",
            connector: "playlists",
            tool: "get_playlist",
            pattern: Regex::new(r"^(?P<playlist_id>(?:PL|UU|LL)[a-zA-Z0-9_-]{10,})$").unwrap(),
            captures: &["playlist_id"],
            arg_mapping: &[("playlist_id", "playlistId")],
            priority: 60,
            description: "YouTube playlist ID (PL/UU/LL prefix)",
        },

        // === Channels ===
        InputPattern {
            id: "channel_url",
            connector: "channels",
            tool: "get_channel",
            pattern: Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/channel/(?P<channel_id>UC[a-zA-Z0-9_-]+)").unwrap(),
            captures: &["channel_id"],
            arg_mapping: &[("channel_id", "channelId")],
            priority: 100,
            description: "YouTube channel URL (/channel/UC...)",
        },
        InputPattern {
            id: "channel_handle_url",
            connector: "channels",
            tool: "get_channel",
            pattern: Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/(?P<channel_id>@[a-zA-Z0-9_.-]+)").unwrap(),
            captures: &["channel_id"],
            arg_mapping: &[("channel_id", "channelId")],
            priority: 90,
            description: "YouTube handle URL (youtube.com/@name)",
        },
        InputPattern {
            id: "channel_id",
            connector: "channels",
            tool: "get_channel",
            pattern: Regex::new(r"^(?P<channel_id>UC[a-zA-Z0-9_-]{22})$").unwrap(),
            captures: &["channel_id"],
            arg_mapping: &[("channel_id", "channelId")],
            priority: 60,
            description: "YouTube channel ID (UC prefix, 24 characters)",
        },
        InputPattern {
            id: "channel_handle",
            connector: "channels",
            tool: "get_channel",
            pattern: Regex::new(r"^(?P<channel_id>@[a-zA-Z0-9_.-]{3,30})$").unwrap(),
            captures: &["channel_id"],
            arg_mapping: &[("channel_id", "channelId")],
            priority: 50,
            description: "YouTube handle (@name)",
        },
    ];

    // Sort by priority (highest first)
    patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
    patterns
}

/// Get an example input for a pattern
fn get_pattern_example(pattern_id: &str) -> String {
    match pattern_id {
        "video_url_watch" => "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "video_url_short" => "https://youtu.be/dQw4w9WgXcQ",
        "video_url_embed" => "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "video_url_shorts" => "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        "video_id" => "dQw4w9WgXcQ",
        "playlist_url" => "https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf",
        "playlist_id" => "PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf",
        "channel_url" => "https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw",
        "channel_handle_url" => "https://www.youtube.com/@veritasium",
        "channel_id" => "UC_x5XG1OV2P6uZZ5FSM9Ttw",
        "channel_handle" => "@veritasium",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_urls() {
        let resolver = SmartResolver::new();

        // Standard watch URL
        let action = resolver
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(action.connector, "videos");
        assert_eq!(action.tool, "get_video");
        assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");

        // Short URL
        let action = resolver.resolve("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(action.connector, "videos");
        assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");

        // Shorts URL
        let action = resolver
            .resolve("https://www.youtube.com/shorts/dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(action.connector, "videos");
        assert_eq!(action.arguments.get("videoId").unwrap(), "dQw4w9WgXcQ");

        // Bare video ID
        let action = resolver.resolve("dQw4w9WgXcQ").unwrap();
        assert_eq!(action.connector, "videos");
    }

    #[test]
    fn test_playlists() {
        let resolver = SmartResolver::new();

        let action = resolver
            .resolve("https://www.youtube.com/playlist?list=PLBCF2DAC6FFB574DE")
            .unwrap();
        assert_eq!(action.connector, "playlists");
        assert_eq!(action.tool, "get_playlist");
        assert_eq!(
            action.arguments.get("playlistId").unwrap(),
            "PLBCF2DAC6FFB574DE"
        );

        // Bare playlist ID
        let action = resolver
            .resolve("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf")
            .unwrap();
        assert_eq!(action.connector, "playlists");
    }

    #[test]
    fn test_channels() {
        let resolver = SmartResolver::new();

        let action = resolver
            .resolve("https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw")
            .unwrap();
        assert_eq!(action.connector, "channels");
        assert_eq!(action.tool, "get_channel");
        assert_eq!(
            action.arguments.get("channelId").unwrap(),
            "UC_x5XG1OV2P6uZZ5FSM9Ttw"
        );

        // Handle URL keeps the @ so the client can route to forHandle
        let action = resolver
            .resolve("https://www.youtube.com/@veritasium")
            .unwrap();
        assert_eq!(action.connector, "channels");
        assert_eq!(action.arguments.get("channelId").unwrap(), "@veritasium");

        // Bare handle
        let action = resolver.resolve("@veritasium").unwrap();
        assert_eq!(action.connector, "channels");

        // Bare channel ID
        let action = resolver.resolve("UC_x5XG1OV2P6uZZ5FSM9Ttw").unwrap();
        assert_eq!(action.connector, "channels");
    }

    #[test]
    fn test_priority() {
        let resolver = SmartResolver::new();

        // A watch URL must route to videos even though the playlist
        // query parameter is also present
        let action = resolver
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(action.connector, "videos");

        // Plain text is not resolvable
        assert!(resolver.resolve("best rust talks 2024").is_none());
        assert!(!resolver.can_resolve("best rust talks 2024"));
    }

    #[test]
    fn test_pattern_listing_has_examples() {
        let resolver = SmartResolver::new();
        for info in resolver.list_patterns() {
            assert!(!info.example.is_empty(), "missing example for {}", info.id);
        }
    }
}
