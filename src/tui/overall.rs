//! Overall Analysis tab.
//!
//! Pure function of the channel record and the slider value: headline
//! metrics, derived ratios, the two summary charts, and the growth
//! projection block. Ratios and projections are recomputed from the record
//! on every frame, never cached.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::format::{compact, group_digits, group_rounded};
use super::theme;
use crate::domain::ChannelRecord;

const STYLE_LABEL: Style = Style::new().fg(theme::INFO_DIM);
const STYLE_VALUE: Style = Style::new().fg(theme::TEXT).add_modifier(Modifier::BOLD);
const STYLE_DELTA: Style = Style::new().fg(theme::POSITIVE);

/// Displayed when a ratio's denominator is zero.
const UNDEFINED: &str = "--";

pub fn render(f: &mut Frame, area: Rect, channel: &ChannelRecord, additional_videos: u16) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Channel statistics
            Constraint::Length(4), // Performance metrics
            Constraint::Min(8),    // Visual analysis
            Constraint::Length(8), // Growth projections
        ])
        .split(area);

    render_statistics(f, rows[0], channel);
    render_ratios(f, rows[1], channel);
    render_charts(f, rows[2], channel);
    render_projections(f, rows[3], channel, additional_videos);
}

fn metric_box(f: &mut Frame, area: Rect, label: &str, value: &str, value_style: Style) {
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(label.to_string(), STYLE_LABEL)),
        Line::from(Span::styled(value.to_string(), value_style)),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(STYLE_LABEL));
    f.render_widget(widget, area);
}

fn render_statistics(f: &mut Frame, area: Rect, channel: &ChannelRecord) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    metric_box(f, cols[0], "Channel Name", &channel.name, STYLE_VALUE);
    metric_box(
        f,
        cols[1],
        "Subscribers",
        &group_digits(channel.subscribers),
        Style::new().fg(theme::LIKES).add_modifier(Modifier::BOLD),
    );
    metric_box(
        f,
        cols[2],
        "Total Views",
        &group_digits(channel.total_views),
        Style::new().fg(theme::VIEWS).add_modifier(Modifier::BOLD),
    );
    metric_box(
        f,
        cols[3],
        "Video Count",
        &group_digits(channel.video_count),
        Style::new().fg(theme::COMMENTS).add_modifier(Modifier::BOLD),
    );
}

fn render_ratios(f: &mut Frame, area: Rect, channel: &ChannelRecord) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let four_decimals =
        |ratio: Option<f64>| ratio.map_or_else(|| UNDEFINED.to_string(), |r| format!("{r:.4}"));

    metric_box(
        f,
        cols[0],
        "Subscribers-to-Views Ratio",
        &four_decimals(channel.subscribers_to_views()),
        STYLE_VALUE,
    );
    metric_box(
        f,
        cols[1],
        "Videos-to-Subscribers Ratio",
        &four_decimals(channel.videos_to_subscribers()),
        STYLE_VALUE,
    );
    metric_box(
        f,
        cols[2],
        "Average Views per Video",
        &channel
            .average_views_per_video()
            .map_or_else(|| UNDEFINED.to_string(), group_rounded),
        STYLE_VALUE,
    );
}

fn render_charts(f: &mut Frame, area: Rect, channel: &ChannelRecord) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_magnitude_chart(f, cols[0], channel);
    render_share_breakdown(f, cols[1], channel);
}

/// Bar chart of the three raw counts. The counts span orders of magnitude,
/// so bars scale by log10 while the annotation shows the real value.
fn render_magnitude_chart(f: &mut Frame, area: Rect, channel: &ChannelRecord) {
    let series = [
        ("Subscribers", channel.subscribers, theme::LIKES),
        ("Total Views", channel.total_views, theme::VIEWS),
        ("Video Count", channel.video_count, theme::COMMENTS),
    ];

    let bars: Vec<Bar> = series
        .iter()
        .map(|&(label, count, color)| {
            let scaled = if count > 0 { ((count as f64).log10() * 100.0) as u64 } else { 0 };
            Bar::default()
                .value(scaled)
                .text_value(compact(count as f64))
                .label(Line::from(label))
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(color).add_modifier(Modifier::REVERSED))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / 3).saturating_sub(2).clamp(3, 14);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Channel Metrics Comparison (log scale) ")
                .border_style(STYLE_LABEL),
        )
        .bar_width(bar_width)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

/// Share-of-total breakdown across the three raw counts, the terminal
/// rendering of the original pie.
fn render_share_breakdown(f: &mut Frame, area: Rect, channel: &ChannelRecord) {
    let series = [
        ("Subscribers", channel.subscribers, theme::LIKES),
        ("Total Views", channel.total_views, theme::VIEWS),
        ("Video Count", channel.video_count, theme::COMMENTS),
    ];
    let total: u64 = series.iter().map(|&(_, count, _)| count).sum();

    let mut lines = vec![Line::from("")];
    if total == 0 {
        lines.push(Line::from(Span::styled("  No counts reported yet.", STYLE_LABEL)));
    } else {
        const BAR_WIDTH: usize = 24;
        for &(label, count, color) in &series {
            let percentage = count as f64 / total as f64 * 100.0;
            let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
            let bar = format!("{}{}", "▓".repeat(filled), "░".repeat(BAR_WIDTH - filled));
            lines.push(Line::from(vec![
                Span::styled(format!("  {label:<12}"), STYLE_LABEL),
                Span::styled(bar, Style::new().fg(color)),
                Span::styled(format!(" {percentage:5.1}%"), STYLE_VALUE),
            ]));
            lines.push(Line::from(""));
        }
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Distribution of Channel Metrics ")
            .border_style(STYLE_LABEL),
    );
    f.render_widget(widget, area);
}

fn render_projections(f: &mut Frame, area: Rect, channel: &ChannelRecord, additional_videos: u16) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(5)])
        .split(area);

    // The one interactive control: project growth with additional videos
    let slider = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Growth Projections - additional videos (←→ ±1, ↑↓ ±10) ")
                .border_style(STYLE_LABEL),
        )
        .gauge_style(Style::new().fg(theme::ACCENT))
        .ratio(f64::from(additional_videos) / f64::from(super::SLIDER_MAX))
        .label(format!("{additional_videos} / {}", super::SLIDER_MAX));
    f.render_widget(slider, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[1]);

    let Some(projection) = channel.project(additional_videos) else {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Projections undefined: the channel has no videos.",
                STYLE_LABEL,
            )),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(STYLE_LABEL));
        f.render_widget(widget, rows[1]);
        return;
    };

    projection_box(
        f,
        cols[0],
        "Projected Video Count",
        &group_digits(projection.video_count),
        &format!("+{additional_videos}"),
    );
    projection_box(
        f,
        cols[1],
        "Projected Total Views",
        &group_rounded(projection.views),
        &format!("+{}", group_rounded(projection.views_delta(channel))),
    );
    projection_box(
        f,
        cols[2],
        "Projected Subscribers",
        &group_rounded(projection.subscribers),
        &format!("+{}", group_rounded(projection.subscribers_delta(channel))),
    );
}

fn projection_box(f: &mut Frame, area: Rect, label: &str, value: &str, delta: &str) {
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(label.to_string(), STYLE_LABEL)),
        Line::from(Span::styled(value.to_string(), STYLE_VALUE)),
        Line::from(Span::styled(delta.to_string(), STYLE_DELTA)),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(STYLE_LABEL));
    f.render_widget(widget, area);
}
