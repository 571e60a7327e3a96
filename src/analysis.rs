//! Descriptive statistics over the fetched video table.
//!
//! Everything here is a pure function of the in-memory table: five-number
//! summaries, fixed-width histograms, Pearson correlations, and the stable
//! top-N rankings behind both dashboard tables. Nothing is cached between
//! render passes.

// Statistics intentionally run in f64; the counters fit comfortably
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::domain::VideoRecord;
use std::cmp::Ordering;

/// Histogram bin count, matching the distribution charts this dashboard
/// reproduces.
pub const HISTOGRAM_BINS: usize = 30;

/// Rows shown in each top-N table.
pub const TOP_N: usize = 10;

/// The three per-video metrics every distribution and correlation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Views,
    Likes,
    Comments,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Views, Metric::Likes, Metric::Comments];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Metric::Views => "Views",
            Metric::Likes => "Likes",
            Metric::Comments => "Comments",
        }
    }

    #[must_use]
    pub fn value(self, video: &VideoRecord) -> u64 {
        match self {
            Metric::Views => video.views,
            Metric::Likes => video.likes,
            Metric::Comments => video.comments,
        }
    }

    /// Cycle to the next metric, wrapping around.
    #[must_use]
    pub fn next(self) -> Metric {
        match self {
            Metric::Views => Metric::Likes,
            Metric::Likes => Metric::Comments,
            Metric::Comments => Metric::Views,
        }
    }
}

/// Five-number summary plus mean and count for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One fixed-width histogram bin over `lower..upper` (the final bin is
/// closed on both ends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Descending comparator for floats; NaN compares equal so a stray
/// undefined value cannot poison a sort.
fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Quantile with linear interpolation between the two nearest ranks.
/// `sorted` must be ascending and non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
    }
}

/// Five-number summary of a sample; `None` for an empty sample.
#[must_use]
pub fn five_number_summary(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let sum: f64 = sorted.iter().sum();
    Some(Summary {
        count: sorted.len(),
        mean: sum / sorted.len() as f64,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Fixed-width histogram over the sample range. A constant sample collapses
/// into a single bin holding everything; an empty sample yields no bins.
/// Bin counts always sum to the sample count.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![HistogramBin { lower: min, upper: max, count: values.len() }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        // The maximum lands in the last bin rather than opening a new one
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Pearson correlation coefficient; `None` when either sample is constant
/// (zero variance) or the samples are empty/mismatched.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(covariance / (var_x * var_y).sqrt())
}

/// One metric's values in table order, as floats for the statistics above.
#[must_use]
pub fn metric_values(videos: &[VideoRecord], metric: Metric) -> Vec<f64> {
    videos.iter().map(|video| metric.value(video) as f64).collect()
}

/// 3×3 Pearson correlation matrix across views, likes, and comments,
/// indexed in [`Metric::ALL`] order.
#[must_use]
pub fn correlation_matrix(videos: &[VideoRecord]) -> [[Option<f64>; 3]; 3] {
    let columns: Vec<Vec<f64>> =
        Metric::ALL.iter().map(|&metric| metric_values(videos, metric)).collect();

    let mut matrix = [[None; 3]; 3];
    for (row, x) in columns.iter().enumerate() {
        for (col, y) in columns.iter().enumerate() {
            matrix[row][col] = pearson(x, y);
        }
    }
    matrix
}

/// Top `n` videos by one metric: strictly descending, ties broken by
/// original table order (the sort is stable), length `min(n, table size)`.
#[must_use]
pub fn top_by_metric(videos: &[VideoRecord], metric: Metric, n: usize) -> Vec<&VideoRecord> {
    let mut ranked: Vec<&VideoRecord> = videos.iter().collect();
    ranked.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    ranked.truncate(n);
    ranked
}

/// Top `n` videos by engagement rate. Videos with zero views have no
/// defined rate and are excluded before ranking; ties keep table order.
#[must_use]
pub fn top_by_engagement(videos: &[VideoRecord], n: usize) -> Vec<(&VideoRecord, f64)> {
    let mut ranked: Vec<(&VideoRecord, f64)> = videos
        .iter()
        .filter_map(|video| video.engagement_rate().map(|rate| (video, rate)))
        .collect();
    ranked.sort_by(|a, b| compare_desc(a.1, b.1));
    ranked.truncate(n);
    ranked
}

/// (views, engagement rate) points for the engagement scatter, in table
/// order, zero-view videos excluded.
#[must_use]
pub fn engagement_points(videos: &[VideoRecord]) -> Vec<(f64, f64)> {
    videos
        .iter()
        .filter_map(|video| video.engagement_rate().map(|rate| (video.views as f64, rate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, views: u64, likes: u64, comments: u64) -> VideoRecord {
        VideoRecord { title: title.to_string(), views, likes, comments }
    }

    #[test]
    fn summary_uses_linear_interpolation() {
        let summary = five_number_summary(&[1.0, 2.0, 3.0, 4.0]).expect("non-empty");
        assert_eq!(summary.count, 4);
        assert!((summary.mean - 2.5).abs() < 1e-12);
        assert!((summary.q1 - 1.75).abs() < 1e-12);
        assert!((summary.median - 2.5).abs() < 1e-12);
        assert!((summary.q3 - 3.25).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn summary_of_empty_sample_is_none() {
        assert_eq!(five_number_summary(&[]), None);
    }

    #[test]
    fn histogram_counts_sum_to_sample_size() {
        let values: Vec<f64> = (0..97).map(f64::from).collect();
        let bins = histogram(&values, HISTOGRAM_BINS);
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 97);
    }

    #[test]
    fn histogram_maximum_lands_in_last_bin() {
        let bins = histogram(&[0.0, 5.0, 10.0], 2);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 1);
    }

    #[test]
    fn histogram_of_constant_sample_is_single_bin() {
        let bins = histogram(&[7.0, 7.0, 7.0], 30);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn pearson_detects_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let doubled = [2.0, 4.0, 6.0, 8.0];
        let negated = [4.0, 3.0, 2.0, 1.0];
        assert!((pearson(&xs, &doubled).expect("defined") - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &negated).expect("defined") + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_sample_is_none() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn correlation_matrix_diagonal_is_one() {
        let videos =
            vec![video("a", 10, 1, 0), video("b", 20, 4, 1), video("c", 30, 9, 2)];
        let matrix = correlation_matrix(&videos);
        for (i, row) in matrix.iter().enumerate() {
            assert!((row[i].expect("non-constant column") - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn top_by_metric_is_descending_and_capped() {
        let videos: Vec<VideoRecord> =
            (0..15).map(|i| video(&format!("v{i}"), i * 10, 0, 0)).collect();
        let top = top_by_metric(&videos, Metric::Views, TOP_N);
        assert_eq!(top.len(), TOP_N);
        assert!(top.windows(2).all(|pair| pair[0].views >= pair[1].views));
        assert_eq!(top[0].views, 140);
    }

    #[test]
    fn top_by_metric_breaks_ties_by_table_order() {
        let videos = vec![
            video("first", 100, 0, 0),
            video("second", 100, 0, 0),
            video("third", 50, 0, 0),
        ];
        let top = top_by_metric(&videos, Metric::Views, 2);
        assert_eq!(top[0].title, "first");
        assert_eq!(top[1].title, "second");
    }

    #[test]
    fn top_by_metric_returns_whole_table_when_small() {
        let videos = vec![video("only", 1, 0, 0)];
        assert_eq!(top_by_metric(&videos, Metric::Views, TOP_N).len(), 1);
    }

    #[test]
    fn engagement_ranking_excludes_zero_view_videos() {
        let videos = vec![
            video("dead", 0, 50, 50),
            video("low", 1000, 10, 10),
            video("high", 100, 30, 10),
        ];
        let top = top_by_engagement(&videos, TOP_N);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.title, "high");
        assert!((top[0].1 - 40.0).abs() < 1e-12);
        assert_eq!(top[1].0.title, "low");
        assert!((top[1].1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn engagement_ranking_keeps_table_order_on_ties() {
        let videos = vec![
            video("a", 100, 10, 0),
            video("b", 200, 20, 0),
            video("c", 100, 5, 0),
        ];
        let top = top_by_engagement(&videos, TOP_N);
        assert_eq!(top[0].0.title, "a");
        assert_eq!(top[1].0.title, "b");
        assert_eq!(top[2].0.title, "c");
    }
}
