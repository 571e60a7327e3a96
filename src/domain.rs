//! Core domain records for one render pass.
//!
//! A render pass produces exactly one [`ChannelRecord`] and one video table
//! (`Vec<VideoRecord>`), both keyed by the same [`ChannelId`]. Records are
//! immutable after creation; every ratio and projection is recomputed from
//! the base fields on demand, so displayed numbers can never drift from the
//! fetched data.

// Counters are converted to f64 only for display-facing ratios
#![allow(clippy::cast_precision_loss)]

use std::fmt;

/// Stable channel identifier used by the API for all per-channel lookups.
///
/// Distinct from the human-readable handle (`@cristiano`), which is only
/// ever an input to channel resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregate statistics and descriptive metadata for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub name: String,
    pub subscribers: u64,
    pub total_views: u64,
    pub video_count: u64,
}

/// Growth numbers derived from a [`ChannelRecord`] and the slider value.
///
/// Illustrative linear extrapolations, reproduced exactly (including the
/// 0.1 subscriber sensitivity constant) for output parity with the
/// dashboard this replaces. Not statistically fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthProjection {
    pub additional_videos: u16,
    pub video_count: u64,
    pub views: f64,
    pub subscribers: f64,
}

impl ChannelRecord {
    /// Subscribers divided by total views; undefined for a channel with
    /// zero recorded views.
    #[must_use]
    pub fn subscribers_to_views(&self) -> Option<f64> {
        (self.total_views > 0).then(|| self.subscribers as f64 / self.total_views as f64)
    }

    /// Video count divided by subscribers; undefined for zero subscribers.
    #[must_use]
    pub fn videos_to_subscribers(&self) -> Option<f64> {
        (self.subscribers > 0).then(|| self.video_count as f64 / self.subscribers as f64)
    }

    /// Total views divided by video count; undefined for an empty channel.
    #[must_use]
    pub fn average_views_per_video(&self) -> Option<f64> {
        (self.video_count > 0).then(|| self.total_views as f64 / self.video_count as f64)
    }

    /// Project channel growth after uploading `additional_videos` more
    /// videos. Pure function of the record and the slider value; calling it
    /// twice with the same inputs yields identical output.
    ///
    /// Undefined (`None`) for a channel with zero videos, where the
    /// per-video averages behind the formulas do not exist.
    #[must_use]
    pub fn project(&self, additional_videos: u16) -> Option<GrowthProjection> {
        let average_views = self.average_views_per_video()?;
        let extra = f64::from(additional_videos);

        Some(GrowthProjection {
            additional_videos,
            video_count: self.video_count + u64::from(additional_videos),
            views: self.total_views as f64 + extra * average_views,
            subscribers: self.subscribers as f64
                * (1.0 + (extra / self.video_count as f64) * 0.1),
        })
    }
}

impl GrowthProjection {
    /// Projected views gained relative to the current record.
    #[must_use]
    pub fn views_delta(&self, current: &ChannelRecord) -> f64 {
        self.views - current.total_views as f64
    }

    /// Projected subscribers gained relative to the current record.
    #[must_use]
    pub fn subscribers_delta(&self, current: &ChannelRecord) -> f64 {
        self.subscribers - current.subscribers as f64
    }
}

/// Statistics for a single video, in the lenient form the fetcher produces:
/// counters the uploader has hidden arrive as zero, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
}

impl VideoRecord {
    /// Engagement rate as a percentage: (likes + comments) / views × 100.
    ///
    /// Undefined for a video with zero views - such videos are excluded
    /// from every engagement-dependent ranking and statistic.
    #[must_use]
    pub fn engagement_rate(&self) -> Option<f64> {
        (self.views > 0).then(|| (self.likes + self.comments) as f64 / self.views as f64 * 100.0)
    }
}

/// The two sibling outputs of one resolution, held only for the lifetime of
/// the render pass that produced them.
#[derive(Debug, Clone)]
pub struct RenderPass {
    pub channel_id: ChannelId,
    pub channel: ChannelRecord,
    pub videos: Vec<VideoRecord>,
}
