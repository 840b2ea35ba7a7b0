use crate::error::ConnectorError;
use rmcp::model::CallToolResult;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use url::Url;

/// Accepts a watch/short/embed URL or a bare video id and returns the id.
/// Unrecognized input passes through unchanged; the API rejects it with a
/// clearer message than a local guess could.
pub fn extract_video_id(input: &str) -> String {
    if input.starts_with("http") {
        if let Ok(url) = Url::parse(input) {
            if let Some(pair) = url.query_pairs().find(|(key, _)| key == "v") {
                return pair.1.to_string();
            }
            let path = url.path();
            if url.host_str() == Some("youtu.be") && path.len() > 1 {
                return path[1..].to_string();
            }
            let mut segments = path.split('/').filter(|s| !s.is_empty());
            if let (Some(kind), Some(id)) = (segments.next(), segments.next()) {
                if kind == "shorts" || kind == "embed" {
                    return id.to_string();
                }
            }
        }
    }
    input.to_string()
}

pub fn strip_multiple_newlines(text: &str) -> String {
    let mut result = String::new();
    let mut consecutive_newlines = 0;

    for line in text.lines() {
        if line.trim().is_empty() {
            consecutive_newlines += 1;
            if consecutive_newlines <= 1 {
                result.push('\n');
            }
        } else {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(line);
            consecutive_newlines = 0;
        }
    }

    result
}

/// Decode HTML entities left in Data API text fields.
///
/// Search results and transcript fragments come back entity-escaped, sometimes
/// twice (`&amp;#39;`).
pub fn clean_html_entities(text: &str) -> String {
    let mut cleaned = text.to_string();
    // Try decoding multiple times in case of double-encoding
    for _ in 0..2 {
        let decoded = html_escape::decode_html_entities(&cleaned).into_owned();
        if decoded == cleaned {
            break;
        }
        cleaned = decoded;
    }

    // Handle any remaining common entities manually
    cleaned
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Build a CallToolResult that carries only structured JSON (no text fallback).
/// This prioritizes first-class machine-readable results for modern MCP clients.
const RESULT_LIST_KEYS: &[&str] = &[
    "results",
    "items",
    "videos",
    "playlists",
    "channels",
    "candidates",
    "unavailableItems",
    "transcript",
    "data",
];

const COUNT_KEYS: &[&str] = &["totalResults", "totalItems", "count", "resultCount"];

const QUERY_FIELD_KEYS: &[&str] = &["query", "q"];

fn build_no_results_message(key: &str, query_hint: Option<String>) -> String {
    let label = match key {
        "data" | "results" | "totalResults" | "totalItems" | "count" | "resultCount" => {
            "results".to_string()
        }
        "unavailableItems" => "unavailable items".to_string(),
        "candidates" => "candidate videos".to_string(),
        other => other.replace('_', " "),
    };

    match query_hint {
        Some(query) => format!("No {} found for \"{}\".", label, query),
        None => format!("No {} found for the requested input.", label),
    }
}

fn maybe_attach_no_results_message(map: &mut JsonMap<String, JsonValue>) -> Option<String> {
    // Any non-empty result list means we have data and should not set a no-results message.
    for key in RESULT_LIST_KEYS {
        if let Some(JsonValue::Array(items)) = map.get(*key) {
            if !items.is_empty() {
                return None;
            }
        }
    }

    // Capture a query hint if the payload includes one.
    let query_hint = map
        .iter()
        .find_map(|(key, value)| {
            if QUERY_FIELD_KEYS.iter().any(|candidate| candidate == key) {
                value.as_str().map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .filter(|s| !s.is_empty());

    let mut message: Option<String> = None;

    for key in RESULT_LIST_KEYS {
        if let Some(value) = map.get(*key) {
            match value {
                JsonValue::Array(items) if items.is_empty() => {
                    message = Some(build_no_results_message(key, query_hint.clone()));
                    break;
                }
                JsonValue::Null => {
                    message = Some(build_no_results_message(key, query_hint.clone()));
                    break;
                }
                JsonValue::String(s) if s.trim().is_empty() => {
                    message = Some(build_no_results_message(key, query_hint.clone()));
                    break;
                }
                JsonValue::Object(obj) if obj.is_empty() => {
                    message = Some(build_no_results_message(key, query_hint.clone()));
                    break;
                }
                JsonValue::Number(num) if num.as_u64() == Some(0) => {
                    message = Some(build_no_results_message(key, query_hint.clone()));
                    break;
                }
                _ => {}
            }
        }
    }

    if message.is_none() {
        if let Some(JsonValue::Array(items)) = map.get("data") {
            if items.is_empty() {
                message = Some(build_no_results_message("results", query_hint.clone()));
            }
        } else if let Some(JsonValue::Object(obj)) = map.get("data") {
            if obj.is_empty() {
                message = Some(build_no_results_message("results", query_hint.clone()));
            }
        }
    }

    if message.is_none() {
        for key in COUNT_KEYS {
            if let Some(value) = map.get(*key) {
                if value.as_u64() == Some(0) {
                    message = Some(build_no_results_message("results", query_hint.clone()));
                    break;
                }
                if let Some(as_str) = value.as_str() {
                    if as_str.trim() == "0" {
                        message = Some(build_no_results_message("results", query_hint.clone()));
                        break;
                    }
                }
            }
        }
    }

    if message.is_none() && map.is_empty() {
        message = Some(build_no_results_message("results", query_hint.clone()));
    }

    if let Some(message_text) = message.clone() {
        map.entry("message".to_string())
            .or_insert(JsonValue::String(message_text.clone()));
        map.entry("no_results".to_string())
            .or_insert(JsonValue::Bool(true));
    }

    message
}

pub fn structured_result_with_text<T: Serialize>(
    data: &T,
    _text_fallback: Option<String>,
) -> Result<CallToolResult, ConnectorError> {
    let value = serde_json::to_value(data).map_err(|e| ConnectorError::Other(e.to_string()))?;

    // Convert to an object map; if it's not an object, wrap under a `data` key.
    let mut map: JsonMap<String, JsonValue> = match value {
        JsonValue::Object(m) => m,
        other => {
            let mut m = JsonMap::new();
            m.insert("data".to_string(), other);
            m
        }
    };

    maybe_attach_no_results_message(&mut map);

    Ok(CallToolResult {
        content: Vec::new(),
        structured_content: Some(JsonValue::Object(map)),
        is_error: Some(false),
        meta: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_extracted_from_common_url_shapes() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn entities_decode_even_when_double_escaped() {
        assert_eq!(clean_html_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(clean_html_entities("it&amp;#39;s"), "it's");
    }

    #[test]
    fn blank_line_runs_collapse_to_one() {
        let text = "a\n\n\n\nb\n\nc";
        assert_eq!(strip_multiple_newlines(text), "a\n\nb\n\nc");
    }

    #[test]
    fn empty_list_payload_gets_an_advisory() {
        #[derive(Serialize)]
        struct Out {
            query: String,
            results: Vec<String>,
        }
        let out = Out {
            query: "rust async".to_string(),
            results: Vec::new(),
        };
        let result = structured_result_with_text(&out, None).unwrap();
        let content = result.structured_content.unwrap();
        assert_eq!(content["no_results"], JsonValue::Bool(true));
        assert_eq!(
            content["message"],
            JsonValue::String("No results found for \"rust async\".".to_string())
        );
    }

    #[test]
    fn populated_list_payload_passes_through() {
        #[derive(Serialize)]
        struct Out {
            results: Vec<u32>,
        }
        let result = structured_result_with_text(&Out { results: vec![1] }, None).unwrap();
        let content = result.structured_content.unwrap();
        assert!(content.get("no_results").is_none());
        assert!(content.get("message").is_none());
    }
}
