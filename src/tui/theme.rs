//! Color scheme for the dashboard.

use ratatui::style::Color;

/// Brand accent for headings and the active tab.
pub const ACCENT: Color = Color::Rgb(229, 57, 53);

/// Per-metric series colors, used consistently across every chart.
pub const VIEWS: Color = Color::Rgb(100, 181, 246);
pub const LIKES: Color = Color::Rgb(129, 199, 132);
pub const COMMENTS: Color = Color::Rgb(255, 183, 77);

/// De-emphasized chrome: hints, separators, axis labels.
pub const INFO_DIM: Color = Color::DarkGray;

/// Regular text.
pub const TEXT: Color = Color::Gray;

/// Positive deltas and healthy states.
pub const POSITIVE: Color = Color::Rgb(129, 199, 132);

/// Error states.
pub const ERROR: Color = Color::Rgb(239, 83, 80);

use crate::analysis::Metric;

/// The series color for one metric.
#[must_use]
pub fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::Views => VIEWS,
        Metric::Likes => LIKES,
        Metric::Comments => COMMENTS,
    }
}

/// Diverging blue→red grade for a correlation coefficient in [-1, 1],
/// mirroring the coolwarm heatmap this view reproduces.
#[must_use]
pub fn correlation_color(r: f64) -> Color {
    let clamped = r.clamp(-1.0, 1.0);
    let warmth = ((clamped + 1.0) / 2.0 * 255.0) as u8;
    Color::Rgb(warmth, 70, 255 - warmth)
}
