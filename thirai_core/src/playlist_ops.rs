//! Playlist aggregation: full-pagination fetch, unavailability detection,
//! bulk removal, merge planning, and add-time filtering.
//!
//! Everything here is read-only except [`remove_items`]. All functions take
//! the API as a `&dyn YouTubeApi`, the handle the playlists connector holds.

use crate::api::types::PlaylistItemResource;
use crate::api::YouTubeApi;
use crate::error::ConnectorError;
use serde::Serialize;
use std::collections::HashSet;

/// Per-page maximum of `playlistItems.list`.
pub const PAGE_SIZE: u32 = 50;

const DELETED_TITLE: &str = "Deleted video";
const PRIVATE_TITLE: &str = "Private video";

fn fetch_error(playlist_id: &str, page_number: u32, err: ConnectorError) -> ConnectorError {
    match err {
        ConnectorError::Authentication(msg) => ConnectorError::Authentication(format!(
            "playlist {} page {}: {}",
            playlist_id, page_number, msg
        )),
        other => ConnectorError::Api(format!(
            "failed to fetch page {} of playlist {}: {}",
            page_number, playlist_id, other
        )),
    }
}

/// Fetch the complete ordered item sequence of a playlist, following
/// continuation tokens until the API stops returning one.
pub async fn fetch_all_items(
    api: &dyn YouTubeApi,
    playlist_id: &str,
) -> Result<Vec<PlaylistItemResource>, ConnectorError> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page_number = 1u32;

    loop {
        let page = api
            .list_playlist_items(playlist_id, PAGE_SIZE, page_token.as_deref())
            .await
            .map_err(|e| fetch_error(playlist_id, page_number, e))?;

        items.extend(page.items);

        match page.next_page_token {
            Some(next) => {
                // A token identical to the one just sent would page forever.
                if page_token.as_deref() == Some(next.as_str()) {
                    return Err(ConnectorError::Api(format!(
                        "page token repeated at page {} of playlist {}",
                        page_number, playlist_id
                    )));
                }
                page_token = Some(next);
                page_number += 1;
            }
            None => break,
        }
    }

    Ok(items)
}

/// Metadata-only unavailability heuristic.
///
/// The API substitutes sentinel titles and flips the privacy status when a
/// video becomes inaccessible; there is no dedicated flag. Region blocks and
/// takedowns that leave the metadata intact are not detected, and the
/// sentinel titles are English-only.
pub fn is_unavailable(item: &PlaylistItemResource) -> bool {
    let title = item.title();
    if title == DELETED_TITLE || title == PRIVATE_TITLE {
        return true;
    }
    matches!(
        item.privacy_status(),
        Some("private") | Some("privacyStatusUnspecified")
    )
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableItem {
    pub id: String,
    pub title: String,
    pub video_id: String,
    pub privacy_status: String,
    pub position: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableReport {
    pub playlist_id: String,
    pub total_items: usize,
    pub unavailable_count: usize,
    pub unavailable_items: Vec<UnavailableItem>,
}

/// Scan the whole playlist and report every item whose video looks
/// inaccessible. Absent fields project to empty strings so the report shape
/// is stable.
pub async fn find_unavailable(
    api: &dyn YouTubeApi,
    playlist_id: &str,
) -> Result<UnavailableReport, ConnectorError> {
    let items = fetch_all_items(api, playlist_id).await?;
    let total_items = items.len();

    let unavailable_items: Vec<UnavailableItem> = items
        .iter()
        .filter(|item| is_unavailable(item))
        .map(|item| UnavailableItem {
            id: item.id.clone(),
            title: item.title().to_string(),
            video_id: item.video_id().unwrap_or("").to_string(),
            privacy_status: item.privacy_status().unwrap_or("").to_string(),
            position: item.position(),
        })
        .collect();

    Ok(UnavailableReport {
        playlist_id: playlist_id.to_string(),
        total_items,
        unavailable_count: unavailable_items.len(),
        unavailable_items,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalStatus {
    Removed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOutcome {
    pub item_id: String,
    pub status: RemovalStatus,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalReport {
    pub total_attempted: usize,
    pub removed_count: usize,
    pub failed_count: usize,
    pub results: Vec<RemovalOutcome>,
}

/// Delete each listed playlist item, one request at a time, in input order.
/// A failing item is recorded in its outcome and the loop continues; nothing
/// is retried or rolled back. An empty id list returns a zero report without
/// touching the network.
pub async fn remove_items(
    api: &dyn YouTubeApi,
    playlist_id: &str,
    item_ids: &[String],
) -> Result<RemovalReport, ConnectorError> {
    if item_ids.is_empty() {
        return Ok(RemovalReport {
            total_attempted: 0,
            removed_count: 0,
            failed_count: 0,
            results: Vec::new(),
        });
    }

    let mut results = Vec::with_capacity(item_ids.len());
    let mut removed_count = 0usize;
    let mut failed_count = 0usize;

    for item_id in item_ids {
        match api.delete_playlist_item(item_id).await {
            Ok(()) => {
                removed_count += 1;
                results.push(RemovalOutcome {
                    item_id: item_id.clone(),
                    status: RemovalStatus::Removed,
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                failed_count += 1;
                tracing::warn!(
                    error = %e,
                    playlist_id = %playlist_id,
                    item_id = %item_id,
                    "Playlist item removal failed"
                );
                results.push(RemovalOutcome {
                    item_id: item_id.clone(),
                    status: RemovalStatus::Failed,
                    success: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    Ok(RemovalReport {
        total_attempted: item_ids.len(),
        removed_count,
        failed_count,
        results,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCandidate {
    pub video_id: String,
    pub title: String,
    pub source_playlist_id: String,
    pub position: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStats {
    pub playlist_id: String,
    /// Items seen with a resolvable video id. Items skipped for a missing id
    /// appear in `errors` only.
    pub item_count: usize,
    pub items_kept: usize,
    pub duplicates_skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSnapshot {
    pub playlist_id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub target_playlist_id: String,
    pub deduplicate: bool,
    pub sources: Vec<SourceStats>,
    pub total_items_processed: usize,
    pub unique_items: usize,
    pub duplicates_removed: usize,
    pub candidates: Vec<MergeCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_playlist: Option<TargetSnapshot>,
    pub errors: Vec<String>,
    pub summary: String,
}

/// Plan a merge of several source playlists into a target without writing
/// anything: fetch every source in order, collect candidates, and report
/// per-source and overall statistics.
///
/// With `deduplicate` set, one running set spans all sources, so the first
/// occurrence of a video across the ordered source list wins. A source whose
/// fetch fails is recorded in `errors` and skipped; the target metadata
/// lookup at the end is also best-effort.
pub async fn merge_playlists(
    api: &dyn YouTubeApi,
    source_playlist_ids: &[String],
    target_playlist_id: &str,
    deduplicate: bool,
) -> Result<MergeReport, ConnectorError> {
    if source_playlist_ids.is_empty() {
        return Err(ConnectorError::InvalidInput(
            "merge requires at least one source playlist id".to_string(),
        ));
    }
    if target_playlist_id.trim().is_empty() {
        return Err(ConnectorError::InvalidInput(
            "merge requires a target playlist id".to_string(),
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<MergeCandidate> = Vec::new();
    let mut sources: Vec<SourceStats> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut total_items_processed = 0usize;
    let mut duplicates_removed = 0usize;

    for source_id in source_playlist_ids {
        let items = match fetch_all_items(api, source_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    playlist_id = %source_id,
                    "Skipping merge source after fetch failure"
                );
                errors.push(format!("source {}: {}", source_id, e));
                sources.push(SourceStats {
                    playlist_id: source_id.clone(),
                    item_count: 0,
                    items_kept: 0,
                    duplicates_skipped: 0,
                });
                continue;
            }
        };

        let mut item_count = 0usize;
        let mut items_kept = 0usize;
        let mut duplicates_skipped = 0usize;

        for item in &items {
            let video_id = match item.video_id() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    errors.push(format!(
                        "source {}: item {} has no video id",
                        source_id, item.id
                    ));
                    continue;
                }
            };
            item_count += 1;

            if deduplicate && !seen.insert(video_id.clone()) {
                duplicates_skipped += 1;
                duplicates_removed += 1;
                continue;
            }

            items_kept += 1;
            candidates.push(MergeCandidate {
                video_id,
                title: item.title().to_string(),
                source_playlist_id: source_id.clone(),
                position: item.position(),
            });
        }

        total_items_processed += item_count;
        sources.push(SourceStats {
            playlist_id: source_id.clone(),
            item_count,
            items_kept,
            duplicates_skipped,
        });
    }

    let target_playlist = match api.get_playlist(target_playlist_id).await {
        Ok(Some(playlist)) => Some(TargetSnapshot {
            playlist_id: playlist.id.clone(),
            title: playlist.title().to_string(),
            description: playlist.description().to_string(),
            item_count: playlist.item_count(),
        }),
        Ok(None) => {
            errors.push(format!("target {}: playlist not found", target_playlist_id));
            None
        }
        Err(e) => {
            errors.push(format!("target {}: {}", target_playlist_id, e));
            None
        }
    };

    let unique_items = candidates.len();
    let summary = if deduplicate {
        format!(
            "Processed {} items from {} source playlists; {} unique videos would be added to playlist {} ({} duplicates removed).",
            total_items_processed,
            source_playlist_ids.len(),
            unique_items,
            target_playlist_id,
            duplicates_removed
        )
    } else {
        format!(
            "Processed {} items from {} source playlists; {} videos would be added to playlist {}.",
            total_items_processed,
            source_playlist_ids.len(),
            unique_items,
            target_playlist_id
        )
    };

    Ok(MergeReport {
        target_playlist_id: target_playlist_id.to_string(),
        deduplicate,
        sources,
        total_items_processed,
        unique_items,
        duplicates_removed,
        candidates,
        target_playlist,
        errors,
        summary,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: String,
    pub playlist_id: String,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub position: u32,
    pub added_at: String,
}

/// Items added to the playlist strictly after `added_after` (RFC 3339).
///
/// The API offers no server-side add-time filter, so this inspects a single
/// page of up to [`PAGE_SIZE`] items and filters locally. Playlists larger
/// than one page may have newer items beyond the cap. Items without a
/// parsable added-at timestamp cannot satisfy the strict ordering and are
/// left out.
pub async fn items_added_after(
    api: &dyn YouTubeApi,
    playlist_id: &str,
    added_after: &str,
) -> Result<Vec<RecentItem>, ConnectorError> {
    let boundary = chrono::DateTime::parse_from_rfc3339(added_after).map_err(|e| {
        ConnectorError::InvalidInput(format!(
            "addedAfter must be an ISO-8601 timestamp such as 2024-01-01T00:00:00Z: {}",
            e
        ))
    })?;

    let page = api
        .list_playlist_items(playlist_id, PAGE_SIZE, None)
        .await
        .map_err(|e| fetch_error(playlist_id, 1, e))?;

    let recent = page
        .items
        .into_iter()
        .filter_map(|item| {
            let added_at = item.added_at()?.to_string();
            let added = chrono::DateTime::parse_from_rfc3339(&added_at).ok()?;
            if added > boundary {
                Some(RecentItem {
                    id: item.id.clone(),
                    playlist_id: playlist_id.to_string(),
                    video_id: item.video_id().unwrap_or("").to_string(),
                    title: item.title().to_string(),
                    description: item.description().to_string(),
                    position: item.position(),
                    added_at,
                })
            } else {
                None
            }
        })
        .collect();

    Ok(recent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{
        ChannelResource, ItemStatus, PlaylistItemPage, PlaylistItemSnippet, PlaylistResource,
        PlaylistSnippet, ResourceId, SearchResult, VideoResource,
    };
    use crate::api::SearchParams;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn item(id: &str, video_id: Option<&str>, title: &str) -> PlaylistItemResource {
        item_full(id, video_id, title, None, 0, None)
    }

    fn item_full(
        id: &str,
        video_id: Option<&str>,
        title: &str,
        privacy: Option<&str>,
        position: u32,
        added_at: Option<&str>,
    ) -> PlaylistItemResource {
        PlaylistItemResource {
            id: id.to_string(),
            snippet: Some(PlaylistItemSnippet {
                title: Some(title.to_string()),
                description: Some(format!("description of {}", id)),
                published_at: added_at.map(|s| s.to_string()),
                playlist_id: None,
                position: Some(position),
                resource_id: video_id.map(|v| ResourceId {
                    kind: Some("youtube#video".to_string()),
                    video_id: Some(v.to_string()),
                }),
            }),
            content_details: None,
            status: privacy.map(|p| ItemStatus {
                privacy_status: Some(p.to_string()),
            }),
        }
    }

    /// Serves canned pages keyed by playlist id and records every call.
    /// Page tokens are the stringified index of the next page.
    #[derive(Default)]
    struct FakeApi {
        pages: HashMap<String, Vec<PlaylistItemPage>>,
        playlists: HashMap<String, PlaylistResource>,
        failing_playlists: Vec<String>,
        failing_deletes: Vec<String>,
        list_calls: AtomicUsize,
        deletes: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_items(playlist_id: &str, items: Vec<PlaylistItemResource>) -> Self {
            let mut fake = FakeApi::default();
            fake.add_playlist(playlist_id, vec![items]);
            fake
        }

        fn add_playlist(&mut self, playlist_id: &str, pages: Vec<Vec<PlaylistItemResource>>) {
            let last = pages.len().saturating_sub(1);
            let pages = pages
                .into_iter()
                .enumerate()
                .map(|(index, items)| PlaylistItemPage {
                    items,
                    next_page_token: if index == last {
                        None
                    } else {
                        Some((index + 1).to_string())
                    },
                    page_info: None,
                })
                .collect();
            self.pages.insert(playlist_id.to_string(), pages);
        }

        fn add_raw_pages(&mut self, playlist_id: &str, pages: Vec<PlaylistItemPage>) {
            self.pages.insert(playlist_id.to_string(), pages);
        }

        fn list_call_count(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        fn delete_log(&self) -> Vec<String> {
            self.deletes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl YouTubeApi for FakeApi {
        async fn list_playlist_items(
            &self,
            playlist_id: &str,
            _max_results: u32,
            page_token: Option<&str>,
        ) -> Result<PlaylistItemPage, ConnectorError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_playlists.iter().any(|p| p == playlist_id) {
                return Err(ConnectorError::Api("backend unavailable".to_string()));
            }
            let pages = self
                .pages
                .get(playlist_id)
                .cloned()
                .unwrap_or_else(|| vec![PlaylistItemPage::default()]);
            let index = match page_token {
                None => 0,
                Some(token) => token
                    .parse::<usize>()
                    .map_err(|_| ConnectorError::Api(format!("bad page token {}", token)))?,
            };
            Ok(pages.get(index).cloned().unwrap_or_default())
        }

        async fn delete_playlist_item(&self, playlist_item_id: &str) -> Result<(), ConnectorError> {
            self.deletes
                .lock()
                .unwrap()
                .push(playlist_item_id.to_string());
            if self.failing_deletes.iter().any(|id| id == playlist_item_id) {
                return Err(ConnectorError::Api(format!(
                    "cannot delete {}",
                    playlist_item_id
                )));
            }
            Ok(())
        }

        async fn get_playlist(
            &self,
            playlist_id: &str,
        ) -> Result<Option<PlaylistResource>, ConnectorError> {
            if self.failing_playlists.iter().any(|p| p == playlist_id) {
                return Err(ConnectorError::Api("backend unavailable".to_string()));
            }
            Ok(self.playlists.get(playlist_id).cloned())
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

    #[tokio::test]
    async fn three_pages_concatenate_in_order() {
        let mut fake = FakeApi::default();
        let pages: Vec<Vec<PlaylistItemResource>> = vec![
            (0..50).map(|i| item(&format!("i{}", i), Some(&format!("v{}", i)), "t")).collect(),
            (50..100).map(|i| item(&format!("i{}", i), Some(&format!("v{}", i)), "t")).collect(),
            (100..110).map(|i| item(&format!("i{}", i), Some(&format!("v{}", i)), "t")).collect(),
        ];
        fake.add_playlist("PLbig", pages);

        let items = fetch_all_items(&fake, "PLbig").await.unwrap();
        assert_eq!(items.len(), 110);
        assert_eq!(items[0].id, "i0");
        assert_eq!(items[49].id, "i49");
        assert_eq!(items[50].id, "i50");
        assert_eq!(items[109].id, "i109");
        assert_eq!(fake.list_call_count(), 3);
    }

    #[tokio::test]
    async fn repeated_page_token_aborts_fetch() {
        let mut fake = FakeApi::default();
        fake.add_raw_pages(
            "PLloop",
            vec![
                PlaylistItemPage {
                    items: vec![item("i0", Some("v0"), "t")],
                    next_page_token: Some("1".to_string()),
                    page_info: None,
                },
                PlaylistItemPage {
                    items: vec![item("i1", Some("v1"), "t")],
                    next_page_token: Some("1".to_string()),
                    page_info: None,
                },
            ],
        );

        let err = fetch_all_items(&fake, "PLloop").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PLloop"), "message was: {}", message);
        assert!(message.contains("repeated"), "message was: {}", message);
        // The guard fires instead of requesting page 2 again.
        assert_eq!(fake.list_call_count(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_names_playlist_and_page() {
        let fake = FakeApi {
            failing_playlists: vec!["PLgone".to_string()],
            ..Default::default()
        };

        let err = fetch_all_items(&fake, "PLgone").await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PLgone"), "message was: {}", message);
        assert!(message.contains("page 1"), "message was: {}", message);
    }

    #[test]
    fn classifier_matches_sentinels_and_privacy_states() {
        assert!(is_unavailable(&item("a", None, "Deleted video")));
        assert!(is_unavailable(&item("b", Some("v1"), "Private video")));
        assert!(is_unavailable(&item_full("c", Some("v2"), "Fine title", Some("private"), 0, None)));
        assert!(is_unavailable(&item_full(
            "d",
            Some("v3"),
            "Fine title",
            Some("privacyStatusUnspecified"),
            0,
            None
        )));

        assert!(!is_unavailable(&item_full("e", Some("v4"), "My Cat Video", Some("public"), 0, None)));
        assert!(!is_unavailable(&item_full("f", Some("v5"), "t", Some("unlisted"), 0, None)));
        // Sentinel match is exact, not case-insensitive.
        assert!(!is_unavailable(&item("g", Some("v6"), "deleted video")));
        assert!(!is_unavailable(&item("h", Some("v7"), "t")));
    }

    #[tokio::test]
    async fn find_unavailable_reports_only_flagged_items() {
        let fake = FakeApi::with_items(
            "PLmixed",
            vec![
                item_full("i0", None, "Deleted video", None, 0, None),
                item_full("i1", Some("v1"), "My Cat Video", Some("public"), 1, None),
            ],
        );

        let report = find_unavailable(&fake, "PLmixed").await.unwrap();
        assert_eq!(report.total_items, 2);
        assert_eq!(report.unavailable_count, 1);
        assert_eq!(report.unavailable_items.len(), 1);
        let flagged = &report.unavailable_items[0];
        assert_eq!(flagged.id, "i0");
        assert_eq!(flagged.title, "Deleted video");
        assert_eq!(flagged.video_id, "");
        assert_eq!(flagged.privacy_status, "");
        assert_eq!(flagged.position, 0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["playlistId"], "PLmixed");
        assert_eq!(value["totalItems"], 2);
        assert_eq!(value["unavailableCount"], 1);
        assert!(value["unavailableItems"].is_array());
    }

    #[tokio::test]
    async fn empty_removal_list_returns_zero_report_without_network() {
        let fake = FakeApi::default();
        let report = remove_items(&fake, "PLx", &[]).await.unwrap();

        assert_eq!(report.total_attempted, 0);
        assert_eq!(report.removed_count, 0);
        assert_eq!(report.failed_count, 0);
        assert!(report.results.is_empty());
        assert!(fake.delete_log().is_empty());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalAttempted"], 0);
        assert_eq!(value["removedCount"], 0);
        assert_eq!(value["failedCount"], 0);
        assert_eq!(value["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn removal_continues_past_failures() {
        let fake = FakeApi {
            failing_deletes: vec!["b".to_string()],
            ..Default::default()
        };
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let report = remove_items(&fake, "PLx", &ids).await.unwrap();
        assert_eq!(report.total_attempted, 3);
        assert_eq!(report.removed_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.removed_count + report.failed_count, report.total_attempted);
        assert_eq!(fake.delete_log(), vec!["a", "b", "c"]);

        assert_eq!(report.results[0].status, RemovalStatus::Removed);
        assert!(report.results[0].success);
        assert_eq!(report.results[1].status, RemovalStatus::Failed);
        assert!(!report.results[1].success);
        assert!(report.results[1].error.as_deref().unwrap().contains("b"));
        assert_eq!(report.results[2].status, RemovalStatus::Removed);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["results"][0]["status"], "removed");
        assert_eq!(value["results"][1]["status"], "failed");
    }

    #[tokio::test]
    async fn merge_dedupes_across_sources_first_occurrence_wins() {
        let mut fake = FakeApi::default();
        fake.add_playlist(
            "A",
            vec![vec![
                item_full("a0", Some("v1"), "one", None, 0, None),
                item_full("a1", Some("v2"), "two", None, 1, None),
                item_full("a2", Some("v3"), "three", None, 2, None),
            ]],
        );
        fake.add_playlist(
            "B",
            vec![vec![
                item_full("b0", Some("v2"), "two again", None, 0, None),
                item_full("b1", Some("v4"), "four", None, 1, None),
            ]],
        );
        fake.playlists.insert(
            "T".to_string(),
            PlaylistResource {
                id: "T".to_string(),
                snippet: Some(PlaylistSnippet {
                    title: Some("Target".to_string()),
                    description: Some("merged".to_string()),
                    ..Default::default()
                }),
                content_details: None,
            },
        );

        let sources = vec!["A".to_string(), "B".to_string()];
        let report = merge_playlists(&fake, &sources, "T", true).await.unwrap();

        let ids: Vec<&str> = report.candidates.iter().map(|c| c.video_id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3", "v4"]);
        assert_eq!(report.total_items_processed, 5);
        assert_eq!(report.unique_items, 4);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(
            report.unique_items + report.duplicates_removed,
            report.total_items_processed
        );
        // First occurrence wins: v2 is credited to source A.
        assert_eq!(report.candidates[1].source_playlist_id, "A");
        assert_eq!(report.candidates[1].title, "two");

        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.sources[0].item_count, 3);
        assert_eq!(report.sources[0].items_kept, 3);
        assert_eq!(report.sources[0].duplicates_skipped, 0);
        assert_eq!(report.sources[1].item_count, 2);
        assert_eq!(report.sources[1].items_kept, 1);
        assert_eq!(report.sources[1].duplicates_skipped, 1);
        let summed: usize = report.sources.iter().map(|s| s.item_count).sum();
        assert_eq!(report.total_items_processed, summed);

        let target = report.target_playlist.as_ref().unwrap();
        assert_eq!(target.title, "Target");
        assert!(report.errors.is_empty());
        assert!(report.summary.contains("5 items"));
        assert!(report.summary.contains("4 unique"));
        assert!(report.summary.contains("1 duplicates removed"));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalItemsProcessed"], 5);
        assert_eq!(value["uniqueItems"], 4);
        assert_eq!(value["duplicatesRemoved"], 1);
        assert_eq!(value["sources"][0]["itemCount"], 3);
    }

    #[tokio::test]
    async fn merge_without_dedupe_keeps_every_occurrence() {
        let mut fake = FakeApi::default();
        fake.add_playlist(
            "A",
            vec![vec![
                item("a0", Some("v1"), "one"),
                item("a1", Some("v2"), "two"),
                item("a2", Some("v3"), "three"),
            ]],
        );
        fake.add_playlist(
            "B",
            vec![vec![item("b0", Some("v2"), "two"), item("b1", Some("v4"), "four")]],
        );

        let sources = vec!["A".to_string(), "B".to_string()];
        let report = merge_playlists(&fake, &sources, "T", false).await.unwrap();

        assert_eq!(report.candidates.len(), 5);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.unique_items, 5);
        assert_eq!(report.total_items_processed, 5);
    }

    #[tokio::test]
    async fn merge_validates_input_before_any_fetch() {
        let fake = FakeApi::default();

        let err = merge_playlists(&fake, &[], "T", true).await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput(_)));

        let sources = vec!["A".to_string()];
        let err = merge_playlists(&fake, &sources, "  ", true).await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput(_)));

        assert_eq!(fake.list_call_count(), 0);
    }

    #[tokio::test]
    async fn merge_records_items_without_video_id_as_errors_only() {
        let mut fake = FakeApi::default();
        fake.add_playlist(
            "A",
            vec![vec![
                item("a0", Some("v1"), "one"),
                item("a1", None, "broken"),
            ]],
        );

        let sources = vec!["A".to_string()];
        let report = merge_playlists(&fake, &sources, "T", true).await.unwrap();

        assert_eq!(report.total_items_processed, 1);
        assert_eq!(report.unique_items, 1);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.sources[0].item_count, 1);
        assert_eq!(report.errors.iter().filter(|e| e.contains("a1")).count(), 1);
    }

    #[tokio::test]
    async fn merge_survives_a_failing_source() {
        let mut fake = FakeApi {
            failing_playlists: vec!["A".to_string()],
            ..Default::default()
        };
        fake.add_playlist("B", vec![vec![item("b0", Some("v1"), "one")]]);

        let sources = vec!["A".to_string(), "B".to_string()];
        let report = merge_playlists(&fake, &sources, "T", true).await.unwrap();

        assert_eq!(report.total_items_processed, 1);
        assert_eq!(report.unique_items, 1);
        assert_eq!(report.sources.len(), 2);
        assert_eq!(report.sources[0].item_count, 0);
        assert!(report.errors.iter().any(|e| e.contains("source A")));
    }

    #[tokio::test]
    async fn merge_records_target_lookup_failure_without_failing() {
        let mut fake = FakeApi::default();
        fake.add_playlist("A", vec![vec![item("a0", Some("v1"), "one")]]);
        // "T" is not in fake.playlists, so the lookup returns None.

        let sources = vec!["A".to_string()];
        let report = merge_playlists(&fake, &sources, "T", true).await.unwrap();

        assert!(report.target_playlist.is_none());
        assert!(report.errors.iter().any(|e| e.contains("target T")));
        assert_eq!(report.unique_items, 1);
    }

    #[tokio::test]
    async fn recent_items_use_strict_greater_than() {
        let fake = FakeApi::with_items(
            "PLtimes",
            vec![
                item_full("i0", Some("v0"), "after", None, 0, Some("2024-01-01T00:00:01Z")),
                item_full("i1", Some("v1"), "exactly at", None, 1, Some("2024-01-01T00:00:00Z")),
                item_full("i2", Some("v2"), "before", None, 2, Some("2023-12-31T23:59:59Z")),
                item_full("i3", Some("v3"), "no timestamp", None, 3, None),
                item_full("i4", Some("v4"), "junk timestamp", None, 4, Some("yesterday")),
            ],
        );

        let recent = items_added_after(&fake, "PLtimes", "2024-01-01T00:00:00Z")
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "i0");
        assert_eq!(recent[0].video_id, "v0");
        assert_eq!(recent[0].playlist_id, "PLtimes");
        assert_eq!(recent[0].added_at, "2024-01-01T00:00:01Z");

        let value = serde_json::to_value(&recent).unwrap();
        assert_eq!(value[0]["addedAt"], "2024-01-01T00:00:01Z");
        assert_eq!(value[0]["videoId"], "v0");
    }

    #[tokio::test]
    async fn recent_items_reject_bad_boundary_before_fetching() {
        let fake = FakeApi::default();
        let err = items_added_after(&fake, "PLx", "not-a-date").await.unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidInput(_)));
        assert_eq!(fake.list_call_count(), 0);
    }

    #[tokio::test]
    async fn recent_items_inspect_a_single_page_only() {
        let mut fake = FakeApi::default();
        fake.add_playlist(
            "PLtwo",
            vec![
                vec![item_full("i0", Some("v0"), "t", None, 0, Some("2024-06-01T00:00:00Z"))],
                vec![item_full("i1", Some("v1"), "t", None, 1, Some("2024-06-02T00:00:00Z"))],
            ],
        );

        let recent = items_added_after(&fake, "PLtwo", "2024-01-01T00:00:00Z")
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "i0");
        assert_eq!(fake.list_call_count(), 1);
    }

    #[tokio::test]
    async fn recent_items_accept_offset_timestamps() {
        let fake = FakeApi::with_items(
            "PLoffset",
            vec![item_full("i0", Some("v0"), "t", None, 0, Some("2024-01-01T05:00:00Z"))],
        );

        let recent = items_added_after(&fake, "PLoffset", "2024-01-01T00:00:00+01:00")
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
    }
}
