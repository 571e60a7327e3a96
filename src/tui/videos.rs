//! Video Analysis tab.
//!
//! Pure function of the fetched video table. The tab is organized into
//! four sections the user cycles through: top videos, per-metric
//! distributions, pairwise relationships, and engagement analysis.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType,
        Paragraph, Row, Table,
    },
    Frame,
};

use super::format::{compact, group_digits, truncate};
use super::theme;
use crate::analysis::{
    correlation_matrix, engagement_points, five_number_summary, histogram, metric_values,
    top_by_engagement, top_by_metric, Metric, Summary, HISTOGRAM_BINS, TOP_N,
};
use crate::domain::VideoRecord;

const STYLE_LABEL: Style = Style::new().fg(theme::INFO_DIM);
const STYLE_VALUE: Style = Style::new().fg(theme::TEXT).add_modifier(Modifier::BOLD);
const STYLE_HEADER: Style = Style::new().fg(theme::ACCENT).add_modifier(Modifier::BOLD);

/// Metric pairs shown in the relationship scatter, cycled with ←/→.
pub const SCATTER_PAIRS: [(Metric, Metric); 3] = [
    (Metric::Views, Metric::Likes),
    (Metric::Views, Metric::Comments),
    (Metric::Likes, Metric::Comments),
];

/// Sections of the Video Analysis tab, cycled with ↑/↓.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSection {
    TopVideos,
    Distributions,
    Relationships,
    Engagement,
}

impl VideoSection {
    pub const ALL: [VideoSection; 4] = [
        VideoSection::TopVideos,
        VideoSection::Distributions,
        VideoSection::Relationships,
        VideoSection::Engagement,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VideoSection::TopVideos => "Top Videos",
            VideoSection::Distributions => "Distributions",
            VideoSection::Relationships => "Relationships",
            VideoSection::Engagement => "Engagement",
        }
    }

    #[must_use]
    pub fn next(self) -> VideoSection {
        match self {
            VideoSection::TopVideos => VideoSection::Distributions,
            VideoSection::Distributions => VideoSection::Relationships,
            VideoSection::Relationships => VideoSection::Engagement,
            VideoSection::Engagement => VideoSection::TopVideos,
        }
    }

    #[must_use]
    pub fn previous(self) -> VideoSection {
        match self {
            VideoSection::TopVideos => VideoSection::Engagement,
            VideoSection::Distributions => VideoSection::TopVideos,
            VideoSection::Relationships => VideoSection::Distributions,
            VideoSection::Engagement => VideoSection::Relationships,
        }
    }
}

pub fn render(
    f: &mut Frame,
    area: Rect,
    videos: &[VideoRecord],
    section: VideoSection,
    dist_metric: Metric,
    pair_index: usize,
) {
    if videos.is_empty() {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No recent videos found for this channel.", STYLE_VALUE)),
            Line::from(""),
            Line::from(Span::styled(
                "The channel exists but its recent-video listing came back empty.",
                STYLE_LABEL,
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(STYLE_LABEL));
        f.render_widget(widget, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_section_selector(f, rows[0], section);

    match section {
        VideoSection::TopVideos => render_top_videos(f, rows[1], videos),
        VideoSection::Distributions => render_distribution(f, rows[1], videos, dist_metric),
        VideoSection::Relationships => render_relationships(f, rows[1], videos, pair_index),
        VideoSection::Engagement => render_engagement(f, rows[1], videos),
    }
}

fn render_section_selector(f: &mut Frame, area: Rect, current: VideoSection) {
    let mut spans = vec![Span::styled(" ", STYLE_LABEL)];
    for (i, section) in VideoSection::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ·  ", STYLE_LABEL));
        }
        if *section == current {
            spans.push(Span::styled(format!("▶ {}", section.label()), STYLE_HEADER));
        } else {
            spans.push(Span::styled(section.label(), STYLE_LABEL));
        }
    }
    f.render_widget(Paragraph::new(vec![Line::from(spans)]), area);
}

// =============================================================================
// SECTION: TOP VIDEOS
// =============================================================================

fn render_top_videos(f: &mut Frame, area: Rect, videos: &[VideoRecord]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let top = top_by_metric(videos, Metric::Views, TOP_N);

    let rows: Vec<Row> = top
        .iter()
        .enumerate()
        .map(|(rank, video)| {
            Row::new(vec![
                Cell::from(format!("{}", rank + 1)),
                Cell::from(truncate(&video.title, 32)),
                Cell::from(group_digits(video.views)).style(Style::new().fg(theme::VIEWS)),
                Cell::from(group_digits(video.likes)).style(Style::new().fg(theme::LIKES)),
                Cell::from(group_digits(video.comments)).style(Style::new().fg(theme::COMMENTS)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["#", "Video Title", "Views", "Likes", "Comments"]).style(STYLE_HEADER))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top 10 Videos by Views ")
            .border_style(STYLE_LABEL),
    );
    f.render_widget(table, cols[0]);

    let bars: Vec<Bar> = top
        .iter()
        .map(|video| {
            Bar::default()
                .value(video.views)
                .text_value(compact(video.views as f64))
                .label(Line::from(truncate(&video.title, 18)))
                .style(Style::new().fg(theme::VIEWS))
                .value_style(Style::new().fg(theme::VIEWS).add_modifier(Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Top Videos by Views ")
                .border_style(STYLE_LABEL),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, cols[1]);
}

// =============================================================================
// SECTION: DISTRIBUTIONS
// =============================================================================

fn render_distribution(f: &mut Frame, area: Rect, videos: &[VideoRecord], metric: Metric) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(9)])
        .split(area);

    let values = metric_values(videos, metric);
    render_histogram(f, rows[0], &values, metric);
    render_summary(f, rows[1], &values, metric);
}

fn render_histogram(f: &mut Frame, area: Rect, values: &[f64], metric: Metric) {
    let bins = histogram(values, HISTOGRAM_BINS);
    let color = theme::metric_color(metric);

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count as u64)
                .text_value(if bin.count > 0 { bin.count.to_string() } else { String::new() })
                .style(Style::new().fg(color))
                .value_style(Style::new().fg(color).add_modifier(Modifier::REVERSED))
        })
        .collect();

    // Squeeze the fixed bin count into whatever width is available
    let inner_width = area.width.saturating_sub(2) as usize;
    let per_bar = (inner_width / bins.len().max(1)).max(1);
    let (bar_width, bar_gap) = if per_bar >= 4 { (3, 1) } else if per_bar >= 2 { (1, 1) } else { (1, 0) };

    let range = bins.first().zip(bins.last()).map_or_else(String::new, |(first, last)| {
        format!("{} – {}", compact(first.lower), compact(last.upper))
    });

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Distribution of {} ({}) ", metric.label(), range))
                .border_style(STYLE_LABEL),
        )
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_summary(f: &mut Frame, area: Rect, values: &[f64], metric: Metric) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let Some(summary) = five_number_summary(values) else {
        return;
    };

    let stat = |label: &str, value: f64| {
        Line::from(vec![
            Span::styled(format!("  {label:<8}"), STYLE_LABEL),
            Span::styled(group_digits(value.round().max(0.0) as u64), STYLE_VALUE),
        ])
    };

    let stats = Paragraph::new(vec![
        Line::from(Span::styled(format!("  count   {}", summary.count), STYLE_LABEL)),
        stat("mean", summary.mean),
        stat("min", summary.min),
        stat("25%", summary.q1),
        stat("50%", summary.median),
        stat("75%", summary.q3),
        stat("max", summary.max),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Summary Statistics for {} ", metric.label()))
            .border_style(STYLE_LABEL),
    );
    f.render_widget(stats, cols[0]);

    render_box_plot(f, cols[1], &summary, metric);
}

/// Character-cell box plot: whiskers at min/max, box from Q1 to Q3, a
/// marker at the median.
fn render_box_plot(f: &mut Frame, area: Rect, summary: &Summary, metric: Metric) {
    let inner_width = area.width.saturating_sub(4).max(10) as usize;
    let span = summary.max - summary.min;

    let line = if span <= 0.0 {
        "█".repeat(inner_width)
    } else {
        let position = |value: f64| {
            (((value - summary.min) / span) * (inner_width - 1) as f64).round() as usize
        };
        let (q1, median, q3) = (position(summary.q1), position(summary.median), position(summary.q3));
        (0..inner_width)
            .map(|i| {
                if i == position(summary.min) || i == position(summary.max) {
                    '┃'
                } else if i == median {
                    '╋'
                } else if i >= q1 && i <= q3 {
                    '█'
                } else {
                    '─'
                }
            })
            .collect()
    };

    let widget = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {line}"), Style::new().fg(theme::metric_color(metric)))),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {:<12}", compact(summary.min)), STYLE_LABEL),
            Span::styled(
                format!("median {}", compact(summary.median)),
                STYLE_VALUE,
            ),
            Span::styled(format!("{:>12}", compact(summary.max)), STYLE_LABEL),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Box Plot of {} ", metric.label()))
            .border_style(STYLE_LABEL),
    );
    f.render_widget(widget, area);
}

// =============================================================================
// SECTION: RELATIONSHIPS
// =============================================================================

fn render_relationships(f: &mut Frame, area: Rect, videos: &[VideoRecord], pair_index: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let (x_metric, y_metric) = SCATTER_PAIRS[pair_index % SCATTER_PAIRS.len()];
    let xs = metric_values(videos, x_metric);
    let ys = metric_values(videos, y_metric);
    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();

    render_scatter(
        f,
        cols[0],
        &points,
        &format!(" {} vs {} (←→ next pair) ", x_metric.label(), y_metric.label()),
        x_metric.label(),
        y_metric.label(),
        theme::metric_color(y_metric),
    );
    render_correlation_matrix(f, cols[1], videos);
}

fn render_correlation_matrix(f: &mut Frame, area: Rect, videos: &[VideoRecord]) {
    let matrix = correlation_matrix(videos);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(Metric::ALL.iter().map(|m| Cell::from(m.label())))
            .collect::<Vec<Cell>>(),
    )
    .style(STYLE_HEADER);

    let rows: Vec<Row> = Metric::ALL
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let cells = std::iter::once(Cell::from(metric.label()).style(STYLE_HEADER))
                .chain(matrix[i].iter().map(|entry| match entry {
                    Some(r) => Cell::from(format!("{r:+.2}"))
                        .style(Style::new().fg(theme::correlation_color(*r))),
                    None => Cell::from(" n/a").style(STYLE_LABEL),
                }))
                .collect::<Vec<Cell>>();
            Row::new(cells)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Correlation Matrix ")
            .border_style(STYLE_LABEL),
    );
    f.render_widget(table, area);
}

// =============================================================================
// SECTION: ENGAGEMENT
// =============================================================================

fn render_engagement(f: &mut Frame, area: Rect, videos: &[VideoRecord]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let points = engagement_points(videos);
    if points.is_empty() {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No video in the table has any views, so engagement",
                STYLE_LABEL,
            )),
            Line::from(Span::styled("rates are undefined.", STYLE_LABEL)),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Views vs Engagement Rate ")
                .border_style(STYLE_LABEL),
        );
        f.render_widget(widget, cols[0]);
    } else {
        render_scatter(
            f,
            cols[0],
            &points,
            " Views vs Engagement Rate ",
            "Views",
            "Engagement %",
            theme::ACCENT,
        );
    }

    let top = top_by_engagement(videos, TOP_N);
    let rows: Vec<Row> = top
        .iter()
        .enumerate()
        .map(|(rank, (video, rate))| {
            Row::new(vec![
                Cell::from(format!("{}", rank + 1)),
                Cell::from(truncate(&video.title, 26)),
                Cell::from(group_digits(video.views)).style(Style::new().fg(theme::VIEWS)),
                Cell::from(format!("{rate:.2}%"))
                    .style(Style::new().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(12),
            Constraint::Length(9),
        ],
    )
    .header(Row::new(vec!["#", "Video Title", "Views", "Rate"]).style(STYLE_HEADER))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top 10 Videos by Engagement Rate ")
            .border_style(STYLE_LABEL),
    );
    f.render_widget(table, cols[1]);
}

// =============================================================================
// SHARED CHART PLUMBING
// =============================================================================

fn render_scatter(
    f: &mut Frame,
    area: Rect,
    points: &[(f64, f64)],
    title: &str,
    x_label: &str,
    y_label: &str,
    color: ratatui::style::Color,
) {
    let (x_min, x_max) = padded_bounds(points.iter().map(|&(x, _)| x));
    let (y_min, y_max) = padded_bounds(points.iter().map(|&(_, y)| y));

    let dataset = Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::new().fg(color))
        .data(points);

    let x_axis = Axis::default()
        .title(Span::styled(x_label.to_string(), STYLE_LABEL))
        .bounds([x_min, x_max])
        .labels(vec![
            Span::raw(compact(x_min)),
            Span::raw(compact((x_min + x_max) / 2.0)),
            Span::raw(compact(x_max)),
        ])
        .style(STYLE_LABEL);

    let y_axis = Axis::default()
        .title(Span::styled(y_label.to_string(), STYLE_LABEL))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(compact(y_min)),
            Span::raw(compact((y_min + y_max) / 2.0)),
            Span::raw(compact(y_max)),
        ])
        .style(STYLE_LABEL);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(STYLE_LABEL),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);
    f.render_widget(chart, area);
}

/// Axis bounds with a little headroom so edge points stay visible.
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        min = min.min(value);
        max = max.max(value);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let padding = ((max - min).abs()).max(1.0) * 0.05;
    ((min - padding).max(0.0), max + padding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_cycle_in_both_directions() {
        let mut section = VideoSection::TopVideos;
        for _ in 0..VideoSection::ALL.len() {
            section = section.next();
        }
        assert_eq!(section, VideoSection::TopVideos);

        for _ in 0..VideoSection::ALL.len() {
            section = section.previous();
        }
        assert_eq!(section, VideoSection::TopVideos);
    }

    #[test]
    fn padded_bounds_handle_single_point() {
        let (min, max) = padded_bounds([5.0].into_iter());
        assert!(min <= 5.0 && max >= 5.0 && min < max);
    }

    #[test]
    fn padded_bounds_handle_empty_input() {
        let (min, max) = padded_bounds(std::iter::empty());
        assert_eq!((min, max), (0.0, 1.0));
    }
}
