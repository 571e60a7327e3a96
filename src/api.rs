//! YouTube Data API v3 client.
//!
//! Three operation shapes, all read-only:
//!
//! 1. [`YouTubeClient::resolve_channel`] - `search.list` constrained to
//!    channels, mapping a human-readable handle to a [`ChannelId`]
//! 2. [`YouTubeClient::fetch_channel`] - `channels.list` with
//!    `snippet,statistics` for exactly one id
//! 3. [`YouTubeClient::fetch_videos`] - `search.list` for the most recent
//!    video ids (first page only, hard cap 50), then batched `videos.list`
//!    statistics lookups in id-list order
//!
//! The channel path parses strictly (a missing statistics field is a
//! [`ApiError::MalformedResponse`], because absent channel statistics mean
//! the API contract changed), while the per-video path parses leniently
//! (hidden like/comment counters are a normal API state and default to 0).

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{ChannelId, ChannelRecord, RenderPass, VideoRecord};

/// Production endpoint; integration tests point the client elsewhere.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// First-page cap on the recent-video listing. No further pages are
/// requested, so channels with more uploads still yield at most this many
/// records per render pass.
pub const MAX_RECENT_VIDEOS: u32 = 50;

/// `videos.list` accepts up to 50 comma-joined ids per call.
const IDS_PER_STATS_CALL: usize = 50;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Typed failure modes for every API call, replacing the one generic
/// failure bucket the calls would otherwise share.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered successfully but had nothing matching the query.
    #[error("{0}")]
    NotFound(String),

    /// Transport-level failure: connect, timeout, or body read/decode.
    #[error("YouTube API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API reported a non-success status.
    #[error("YouTube API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A successful response was missing a field the channel contract
    /// requires. Kept apart from `Http`/`Status`: it points at an API
    /// contract change rather than a transient fault.
    #[error("malformed YouTube API response: missing or invalid `{field}`")]
    MalformedResponse { field: &'static str },
}

impl ApiError {
    /// Expected absence (empty search result, unknown channel id), as
    /// opposed to an operational failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================
//
// Deserialization targets for the three response shapes. Only the fields the
// dashboard consumes are modeled; everything else in the payloads is
// ignored.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
struct SearchResultId {
    #[serde(default)]
    kind: String,
    #[serde(rename = "videoId")]
    video_id: Option<String>,
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    snippet: Option<ChannelSnippet>,
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: Option<String>,
}

/// Channel counters arrive as JSON strings, not numbers.
#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    #[serde(default)]
    id: String,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "likeCount")]
    like_count: Option<String>,
    #[serde(rename = "commentCount")]
    comment_count: Option<String>,
}

/// Error envelope the API wraps non-success responses in.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Explicitly constructed API client bound to one key; passed by reference
/// into the fetch pipeline. No ambient global credential state.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    /// Build a client with a bounded per-request timeout. An unbounded
    /// external call would stall the whole render pass, so the timeout is
    /// mandatory.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default endpoint URL is well-formed"),
        })
    }

    /// Redirect all calls to a different endpoint. Used by the integration
    /// tests to stand in a local mock API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    fn endpoint(&self, resource: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        url
    }

    /// Issue one GET and decode the JSON payload.
    ///
    /// Non-2xx statuses become [`ApiError::Status`] with the API's own
    /// error message when one is present; transport and decode failures
    /// become [`ApiError::Http`].
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.endpoint(resource))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorEnvelope>(&body).ok())
                .map_or_else(
                    || status.canonical_reason().unwrap_or("unknown error").to_string(),
                    |envelope| envelope.error.message,
                );
            return Err(ApiError::Status { status: status.as_u16(), message });
        }

        Ok(response.json::<T>().await?)
    }

    /// Map a human-readable handle to the stable channel identifier.
    ///
    /// Takes the first search match unconditionally - no ranking and no
    /// exact-match verification against the handle. A search can therefore
    /// resolve to a different, similarly-named channel; preserved as-is
    /// rather than silently changed.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] when the search has zero matches; transport
    /// and status failures per [`ApiError`].
    pub async fn resolve_channel(&self, handle: &str) -> Result<ChannelId, ApiError> {
        let query = normalize_handle(handle);
        debug!("resolving channel for handle {query:?}");

        let response: SearchResponse = self
            .get_json("search", &[("part", "id"), ("type", "channel"), ("q", query.as_str())])
            .await?;

        let first = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("no channel found for {handle:?}")))?;

        let id = first
            .id
            .channel_id
            .ok_or(ApiError::MalformedResponse { field: "id.channelId" })?;

        info!("resolved {handle:?} to channel {id}");
        Ok(ChannelId(id))
    }

    /// Fetch aggregate statistics and descriptive metadata for one channel.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] when the API reports zero items for the id -
    /// never a record with placeholder fields. Missing statistics or
    /// metadata keys are [`ApiError::MalformedResponse`].
    pub async fn fetch_channel(&self, id: &ChannelId) -> Result<ChannelRecord, ApiError> {
        let response: ChannelsResponse = self
            .get_json("channels", &[("part", "snippet,statistics"), ("id", id.0.as_str())])
            .await?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("no data found for channel id {id}")))?;

        channel_record_from_item(item)
    }

    /// Fetch statistics for the channel's most recent videos.
    ///
    /// One `search.list` page (most recent first, capped at
    /// [`MAX_RECENT_VIDEOS`]), then `videos.list` statistics lookups batched
    /// in id-list order. Ids the statistics call does not echo back are
    /// skipped. A channel with zero videos yields an empty table, not an
    /// error.
    ///
    /// # Errors
    /// Transport and status failures per [`ApiError`].
    pub async fn fetch_videos(
        &self,
        id: &ChannelId,
        max_videos: u32,
    ) -> Result<Vec<VideoRecord>, ApiError> {
        let cap = max_videos.min(MAX_RECENT_VIDEOS).to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "id"),
                    ("channelId", id.0.as_str()),
                    ("maxResults", cap.as_str()),
                    ("order", "date"),
                ],
            )
            .await?;

        let video_ids: Vec<String> = response
            .items
            .into_iter()
            .filter(|item| item.id.kind == "youtube#video")
            .filter_map(|item| item.id.video_id)
            .collect();

        debug!("channel {id}: {} recent video ids", video_ids.len());

        let mut by_id: HashMap<String, VideoItem> = HashMap::new();
        for chunk in video_ids.chunks(IDS_PER_STATS_CALL) {
            let joined = chunk.join(",");
            let stats: VideosResponse = self
                .get_json("videos", &[("part", "snippet,statistics"), ("id", joined.as_str())])
                .await?;
            for item in stats.items {
                by_id.insert(item.id.clone(), item);
            }
        }

        // Reassemble in search-result order; the statistics response makes
        // no ordering promise of its own.
        let table: Vec<VideoRecord> = video_ids
            .iter()
            .filter_map(|video_id| by_id.get(video_id))
            .map(video_record_from_item)
            .collect();

        info!("channel {id}: fetched statistics for {} videos", table.len());
        Ok(table)
    }
}

/// Run one full fetch pipeline: resolve the handle, then fetch the channel
/// record and the video table for the resolved id.
///
/// Fail-fast and non-partial: the first failure aborts the pass, so a
/// resolution miss never triggers any downstream fetch.
///
/// # Errors
/// The first [`ApiError`] any stage produces.
pub async fn run_render_pass(
    client: &YouTubeClient,
    handle: &str,
    max_videos: u32,
) -> Result<RenderPass, ApiError> {
    let channel_id = client.resolve_channel(handle).await?;
    let channel = client.fetch_channel(&channel_id).await?;
    let videos = client.fetch_videos(&channel_id, max_videos).await?;
    Ok(RenderPass { channel_id, channel, videos })
}

// =============================================================================
// RESPONSE → RECORD TRANSFORMS
// =============================================================================

/// Strict transform for the channel path: every expected key must be
/// present and parse, otherwise the whole record is malformed.
fn channel_record_from_item(item: ChannelItem) -> Result<ChannelRecord, ApiError> {
    let snippet = item.snippet.ok_or(ApiError::MalformedResponse { field: "snippet" })?;
    let statistics =
        item.statistics.ok_or(ApiError::MalformedResponse { field: "statistics" })?;

    Ok(ChannelRecord {
        name: snippet.title.ok_or(ApiError::MalformedResponse { field: "snippet.title" })?,
        subscribers: parse_count(
            statistics.subscriber_count.as_deref(),
            "statistics.subscriberCount",
        )?,
        total_views: parse_count(statistics.view_count.as_deref(), "statistics.viewCount")?,
        video_count: parse_count(statistics.video_count.as_deref(), "statistics.videoCount")?,
    })
}

/// Lenient transform for the per-video path: counters hidden by the
/// uploader are a normal API state and default to zero instead of failing
/// the record.
fn video_record_from_item(item: &VideoItem) -> VideoRecord {
    let statistics = item.statistics.as_ref();
    VideoRecord {
        title: item
            .snippet
            .as_ref()
            .and_then(|snippet| snippet.title.clone())
            .unwrap_or_default(),
        views: lenient_count(statistics.and_then(|s| s.view_count.as_deref())),
        likes: lenient_count(statistics.and_then(|s| s.like_count.as_deref())),
        comments: lenient_count(statistics.and_then(|s| s.comment_count.as_deref())),
    }
}

fn parse_count(value: Option<&str>, field: &'static str) -> Result<u64, ApiError> {
    value
        .and_then(|raw| raw.parse::<u64>().ok())
        .ok_or(ApiError::MalformedResponse { field })
}

fn lenient_count(value: Option<&str>) -> u64 {
    value.and_then(|raw| raw.parse::<u64>().ok()).unwrap_or(0)
}

/// Reduce handle input to the query text the search call wants.
///
/// Accepts a bare handle (`@cristiano`), a plain name, or a full channel
/// URL (`https://www.youtube.com/@cristiano`, `youtube.com/c/Name`), from
/// which the trailing path component is taken.
#[must_use]
pub fn normalize_handle(input: &str) -> String {
    let trimmed = input.trim();

    let parsed = Url::parse(trimmed).ok().or_else(|| {
        trimmed
            .starts_with("youtube.com")
            .then(|| Url::parse(&format!("https://{trimmed}")).ok())
            .flatten()
    });

    if let Some(url) = parsed {
        let is_youtube = url
            .host_str()
            .is_some_and(|host| host == "youtube.com" || host.ends_with(".youtube.com"));
        if is_youtube {
            if let Some(last) = url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            {
                return last.to_string();
            }
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_item(json: serde_json::Value) -> ChannelItem {
        serde_json::from_value(json).expect("valid channel item fixture")
    }

    fn video_item(json: serde_json::Value) -> VideoItem {
        serde_json::from_value(json).expect("valid video item fixture")
    }

    #[test]
    fn channel_record_parses_string_counters() {
        let item = channel_item(serde_json::json!({
            "snippet": { "title": "Example" },
            "statistics": {
                "subscriberCount": "1000",
                "viewCount": "50000",
                "videoCount": "10"
            }
        }));

        let record = channel_record_from_item(item).expect("complete item");
        assert_eq!(record.name, "Example");
        assert_eq!(record.subscribers, 1000);
        assert_eq!(record.total_views, 50_000);
        assert_eq!(record.video_count, 10);
    }

    #[test]
    fn channel_record_rejects_missing_statistics_field() {
        let item = channel_item(serde_json::json!({
            "snippet": { "title": "Example" },
            "statistics": { "subscriberCount": "1000", "viewCount": "50000" }
        }));

        let err = channel_record_from_item(item).expect_err("videoCount missing");
        assert!(matches!(
            err,
            ApiError::MalformedResponse { field: "statistics.videoCount" }
        ));
    }

    #[test]
    fn channel_record_rejects_unparsable_counter() {
        let item = channel_item(serde_json::json!({
            "snippet": { "title": "Example" },
            "statistics": {
                "subscriberCount": "many",
                "viewCount": "50000",
                "videoCount": "10"
            }
        }));

        let err = channel_record_from_item(item).expect_err("not a number");
        assert!(matches!(
            err,
            ApiError::MalformedResponse { field: "statistics.subscriberCount" }
        ));
    }

    #[test]
    fn video_record_defaults_hidden_counters_to_zero() {
        let item = video_item(serde_json::json!({
            "id": "abc",
            "snippet": { "title": "clip" },
            "statistics": { "viewCount": "100", "likeCount": "10" }
        }));

        let record = video_record_from_item(&item);
        assert_eq!(record.views, 100);
        assert_eq!(record.likes, 10);
        assert_eq!(record.comments, 0);
        assert_eq!(record.engagement_rate(), Some(10.0));
    }

    #[test]
    fn video_record_survives_missing_statistics_block() {
        let item = video_item(serde_json::json!({ "id": "abc" }));

        let record = video_record_from_item(&item);
        assert_eq!(record.title, "");
        assert_eq!(record.views, 0);
        assert_eq!(record.likes, 0);
        assert_eq!(record.comments, 0);
    }

    #[test]
    fn normalize_handle_passes_bare_handles_through() {
        assert_eq!(normalize_handle("@cristiano"), "@cristiano");
        assert_eq!(normalize_handle("  cristiano "), "cristiano");
    }

    #[test]
    fn normalize_handle_reduces_channel_urls() {
        assert_eq!(normalize_handle("https://www.youtube.com/@cristiano"), "@cristiano");
        assert_eq!(normalize_handle("https://youtube.com/c/SomeName"), "SomeName");
        assert_eq!(normalize_handle("youtube.com/user/legacy"), "legacy");
    }

    #[test]
    fn normalize_handle_ignores_foreign_urls() {
        assert_eq!(normalize_handle("https://example.com/@someone"), "https://example.com/@someone");
    }
}
