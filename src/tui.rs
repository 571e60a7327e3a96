//! # Terminal User Interface (TUI)
//!
//! Interactive dashboard using `ratatui`.
//!
//! ## Tabs
//!
//! - **Overall Analysis** - channel metrics, ratios, growth projections
//! - **Video Analysis** - recent-video tables, distributions, correlations
//!
//! ## Threading Model
//!
//! The dashboard runs on its own thread. Fetch results arrive through a
//! bounded channel as [`PassOutcome`] snapshots; the `r` key sends a
//! [`UiCommand::Refresh`] back to the pipeline, which runs exactly one
//! render pass at a time. The slider value lives here, in [`App`], and is
//! only ever touched by this thread.
//!
//! ## Sub-Modules
//!
//! - `overall` - Overall Analysis tab panels
//! - `videos` - Video Analysis tab sections
//! - `theme` - Color scheme

// TUI rendering intentionally uses precision-losing casts for display
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::items_after_statements
)]

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};

pub mod format;
pub mod overall;
mod theme;
pub mod videos;

use crate::analysis::Metric;
use crate::decoration::Decoration;
use crate::domain::RenderPass;
use videos::VideoSection;

// =============================================================================
// STYLE CONSTANTS
// =============================================================================

const STYLE_HEADING: Style = Style::new().fg(theme::ACCENT).add_modifier(Modifier::BOLD);
const STYLE_DIM: Style = Style::new().fg(theme::INFO_DIM);
const STYLE_KEY: Style = Style::new().fg(theme::COMMENTS);
const STYLE_TEXT: Style = Style::new().fg(theme::TEXT);
const STYLE_ERROR: Style = Style::new().fg(theme::ERROR).add_modifier(Modifier::BOLD);

/// Slider bounds and default, as shipped by the dashboard this reproduces.
pub const SLIDER_MIN: u16 = 0;
pub const SLIDER_MAX: u16 = 100;
pub const SLIDER_DEFAULT: u16 = 50;

// =============================================================================
// PIPELINE ↔ UI MESSAGES
// =============================================================================

/// Result of one render pass. The error side carries the user-facing
/// message; operational detail goes to the log.
pub type PassOutcome = std::result::Result<RenderPass, String>;

/// Commands the dashboard sends back to the fetch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Refresh,
    Quit,
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overall,
    Videos,
}

/// Current view mode determines how keys are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Dashboard,
    Help,
}

/// Session state for the dashboard.
///
/// Everything a render pass produced is replaced wholesale on refresh; the
/// only value that survives an interaction is the slider (and the cursor
/// positions of the Video tab).
pub struct App {
    handle: String,
    pass: Option<RenderPass>,
    error: Option<String>,
    refreshing: bool,

    tab: Tab,
    view_mode: ViewMode,

    /// Growth-projection slider: additional videos, 0..=100.
    additional_videos: u16,

    /// Video tab cursors.
    section: VideoSection,
    dist_metric: Metric,
    pair_index: usize,

    decoration: Option<Decoration>,
    started: Instant,
    should_quit: bool,
}

impl App {
    fn new(handle: String, decoration: Option<Decoration>) -> Self {
        Self {
            handle,
            pass: None,
            error: None,
            refreshing: true,
            tab: Tab::Overall,
            view_mode: ViewMode::Dashboard,
            additional_videos: SLIDER_DEFAULT,
            section: VideoSection::TopVideos,
            dist_metric: Metric::Views,
            pair_index: 0,
            decoration,
            started: Instant::now(),
            should_quit: false,
        }
    }

    fn apply_outcome(&mut self, outcome: PassOutcome) {
        self.refreshing = false;
        match outcome {
            Ok(pass) => {
                self.pass = Some(pass);
                self.error = None;
            }
            // Fail-fast, non-partial: a failed pass withholds the whole
            // report instead of showing stale charts next to an error
            Err(message) => {
                self.pass = None;
                self.error = Some(message);
            }
        }
    }

    fn request_refresh(&mut self, cmd_tx: &Sender<UiCommand>) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;
        if cmd_tx.send(UiCommand::Refresh).is_err() {
            self.should_quit = true;
        }
    }

    /// Process keyboard input based on current view mode and tab
    fn handle_key(&mut self, key: KeyCode, cmd_tx: &Sender<UiCommand>) {
        if self.view_mode == ViewMode::Help {
            // Any key closes help
            self.view_mode = ViewMode::Dashboard;
            return;
        }

        match key {
            KeyCode::Char('q' | 'Q') => self.should_quit = true,
            KeyCode::Char('?') => self.view_mode = ViewMode::Help,
            KeyCode::Char('r' | 'R') => self.request_refresh(cmd_tx),
            KeyCode::Char('1') => self.tab = Tab::Overall,
            KeyCode::Char('2') => self.tab = Tab::Videos,
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = match self.tab {
                    Tab::Overall => Tab::Videos,
                    Tab::Videos => Tab::Overall,
                };
            }
            _ => match self.tab {
                Tab::Overall => self.handle_overall_key(key),
                Tab::Videos => self.handle_videos_key(key),
            },
        }
    }

    fn handle_overall_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                self.additional_videos = self.additional_videos.saturating_sub(1);
            }
            KeyCode::Right => {
                self.additional_videos = (self.additional_videos + 1).min(SLIDER_MAX);
            }
            KeyCode::Down => {
                self.additional_videos = self.additional_videos.saturating_sub(10);
            }
            KeyCode::Up => {
                self.additional_videos = (self.additional_videos + 10).min(SLIDER_MAX);
            }
            _ => {}
        }
    }

    fn handle_videos_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => self.section = self.section.previous(),
            KeyCode::Down => self.section = self.section.next(),
            KeyCode::Left | KeyCode::Right => match self.section {
                VideoSection::Distributions => self.dist_metric = self.dist_metric.next(),
                VideoSection::Relationships => {
                    self.pair_index = (self.pair_index + 1) % videos::SCATTER_PAIRS.len();
                }
                _ => {}
            },
            _ => {}
        }
    }
}

// =============================================================================
// DASHBOARD ENTRY POINT
// =============================================================================

/// Run the dashboard event loop on the current thread.
///
/// Receives render-pass snapshots on `update_rx` and reports refresh/quit
/// requests on `cmd_tx`. Returns when the user quits or the pipeline side
/// disappears.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub fn run_dashboard(
    update_rx: &Receiver<PassOutcome>,
    cmd_tx: &Sender<UiCommand>,
    handle: String,
    decoration: Option<Decoration>,
) -> Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(handle, decoration);
    let mut last_update = Instant::now();
    const UPDATE_INTERVAL: Duration = Duration::from_millis(100); // 10 Hz refresh

    loop {
        // Drain pending pass outcomes (non-blocking)
        loop {
            match update_rx.try_recv() {
                Ok(outcome) => app.apply_outcome(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    app.should_quit = true;
                    break;
                }
            }
        }

        if last_update.elapsed() >= UPDATE_INTERVAL {
            terminal.draw(|f| draw(f, &app))?;
            last_update = Instant::now();
        }

        // Handle keyboard input
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, cmd_tx);
                }
            }
        }

        if app.should_quit {
            break;
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    cmd_tx.send(UiCommand::Quit).ok();

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

// =============================================================================
// TOP-LEVEL LAYOUT
// =============================================================================

fn draw(f: &mut ratatui::Frame, app: &App) {
    let outer_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(0),    // Active tab content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_header(f, outer_layout[0], app);
    draw_tabs(f, outer_layout[1], app);
    draw_content(f, outer_layout[2], app);
    draw_status_bar(f, outer_layout[3], app);

    if app.view_mode == ViewMode::Help {
        render_help_overlay(f, f.area());
    }
}

fn draw_header(f: &mut ratatui::Frame, area: Rect, app: &App) {
    let state = if app.refreshing {
        Span::styled("[FETCHING]", Style::new().fg(theme::COMMENTS).add_modifier(Modifier::BOLD))
    } else if app.error.is_some() {
        Span::styled("[ERROR]", STYLE_ERROR)
    } else {
        Span::styled("[READY]", Style::new().fg(theme::POSITIVE))
    };

    let mut spans = vec![
        Span::styled("TUBESCOPE", STYLE_HEADING),
        Span::styled(" | ", STYLE_DIM),
        Span::styled(app.handle.clone(), STYLE_TEXT),
        Span::styled(" | ", STYLE_DIM),
        state,
    ];

    if let Some(pass) = &app.pass {
        spans.push(Span::styled(" | ", STYLE_DIM));
        spans.push(Span::styled(pass.channel.name.clone(), Style::new().fg(theme::ACCENT)));
        spans.push(Span::styled(
            format!(" ({} recent videos)", pass.videos.len()),
            STYLE_DIM,
        ));
    }

    // Decorative spinner, animated at the fetched asset's frame rate
    if let Some(decoration) = &app.decoration {
        spans.push(Span::styled(" | ", STYLE_DIM));
        spans.push(Span::styled(
            decoration.glyph(app.started.elapsed()).to_string(),
            Style::new().fg(theme::ACCENT),
        ));
        if let Some(name) = &decoration.name {
            spans.push(Span::styled(format!(" {name}"), STYLE_DIM));
        }
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default().borders(Borders::ALL).border_style(Style::new().fg(theme::ACCENT)),
    );
    f.render_widget(header, area);
}

fn draw_tabs(f: &mut ratatui::Frame, area: Rect, app: &App) {
    let titles = vec![Line::from(" Overall Analysis [1] "), Line::from(" Video Analysis [2] ")];
    let selected = match app.tab {
        Tab::Overall => 0,
        Tab::Videos => 1,
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(STYLE_DIM)
        .highlight_style(Style::new().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .divider("|");
    f.render_widget(tabs, area);
}

fn draw_content(f: &mut ratatui::Frame, area: Rect, app: &App) {
    if let Some(pass) = &app.pass {
        match app.tab {
            Tab::Overall => {
                overall::render(f, area, &pass.channel, app.additional_videos);
            }
            Tab::Videos => videos::render(
                f,
                area,
                &pass.videos,
                app.section,
                app.dist_metric,
                app.pair_index,
            ),
        }
        return;
    }

    // No report to show: either the first pass is still running or the
    // last pass failed and the report is withheld.
    let lines = if let Some(message) = &app.error {
        vec![
            Line::from(""),
            Line::from(Span::styled("Unable to build the report", STYLE_ERROR)),
            Line::from(""),
            Line::from(Span::styled(message.clone(), STYLE_TEXT)),
            Line::from(""),
            Line::from(vec![
                Span::styled("[R]", STYLE_KEY),
                Span::styled(" retry    ", STYLE_DIM),
                Span::styled("[Q]", STYLE_KEY),
                Span::styled(" quit", STYLE_DIM),
            ]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled("Fetching channel statistics…", STYLE_TEXT)),
            Line::from(""),
            Line::from(Span::styled(
                "Resolving the handle, then loading channel and video data.",
                STYLE_DIM,
            )),
        ]
    };

    let placeholder = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(STYLE_DIM));
    f.render_widget(placeholder, area);
}

fn draw_status_bar(f: &mut ratatui::Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("Q", STYLE_KEY),
        Span::styled(":Quit ", STYLE_DIM),
        Span::styled("Tab", STYLE_KEY),
        Span::styled(":Switch ", STYLE_DIM),
        Span::styled("R", STYLE_KEY),
        Span::styled(":Refresh ", STYLE_DIM),
        Span::styled("?", STYLE_KEY),
        Span::styled(":Help ", STYLE_DIM),
    ];

    match app.tab {
        Tab::Overall => {
            spans.push(Span::styled("←→", STYLE_KEY));
            spans.push(Span::styled(":Videos ±1 ", STYLE_DIM));
            spans.push(Span::styled("↑↓", STYLE_KEY));
            spans.push(Span::styled(":±10 ", STYLE_DIM));
        }
        Tab::Videos => {
            spans.push(Span::styled("↑↓", STYLE_KEY));
            spans.push(Span::styled(":Section ", STYLE_DIM));
            spans.push(Span::styled("←→", STYLE_KEY));
            spans.push(Span::styled(":Metric ", STYLE_DIM));
        }
    }

    let mode = if app.refreshing {
        Span::styled("[Fetching]", Style::new().fg(theme::COMMENTS))
    } else if app.error.is_some() {
        Span::styled("[Error]", Style::new().fg(theme::ERROR))
    } else {
        Span::styled("[Ready]", Style::new().fg(theme::POSITIVE))
    };
    spans.push(mode);

    let status = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default().borders(Borders::ALL).border_style(Style::new().fg(theme::ACCENT)),
    );
    f.render_widget(status, area);
}

// =============================================================================
// OVERLAYS
// =============================================================================

/// Render the help overlay explaining the dashboard and keyboard shortcuts
fn render_help_overlay(f: &mut ratatui::Frame, area: Rect) {
    let popup_area = centered_popup(area, 76, 24);

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("  What You're Looking At", STYLE_HEADING)),
        Line::from(Span::styled(
            "  Public statistics for one YouTube channel and its most recent",
            STYLE_DIM,
        )),
        Line::from(Span::styled(
            "  videos (up to 50), fetched live from the YouTube Data API.",
            STYLE_DIM,
        )),
        Line::from(""),
        Line::from(Span::styled("  Tabs", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  Overall   ", STYLE_KEY),
            Span::styled("Channel totals, ratios, and growth projections.", STYLE_DIM),
        ]),
        Line::from(vec![
            Span::styled("  Videos    ", STYLE_KEY),
            Span::styled("Top-10 tables, distributions, correlations,", STYLE_DIM),
        ]),
        Line::from(Span::styled("            and engagement analysis.", STYLE_DIM)),
        Line::from(""),
        Line::from(Span::styled("  Keys", STYLE_HEADING)),
        Line::from(vec![
            Span::styled("  1/2/Tab", STYLE_KEY),
            Span::styled(" Switch tab   ", STYLE_TEXT),
            Span::styled("R", STYLE_KEY),
            Span::styled(" Refresh   ", STYLE_TEXT),
            Span::styled("Q", STYLE_KEY),
            Span::styled(" Quit", STYLE_TEXT),
        ]),
        Line::from(vec![
            Span::styled("  ←→/↑↓", STYLE_KEY),
            Span::styled("   Overall: projection slider (±1 / ±10)", STYLE_TEXT),
        ]),
        Line::from(vec![
            Span::styled("  ↑↓ ←→", STYLE_KEY),
            Span::styled("   Videos: cycle section / metric", STYLE_TEXT),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", STYLE_DIM)),
    ];

    let help_widget = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::new().bg(ratatui::style::Color::Black).fg(theme::TEXT)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(help_widget, popup_area);
}

/// Create a centered popup area with given width percentage and height in lines
fn centered_popup(area: Rect, width_percent: u16, height_lines: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(height_lines), Constraint::Fill(1)])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, ChannelRecord};
    use crossbeam_channel::bounded;

    fn app() -> App {
        App::new("@example".to_string(), None)
    }

    #[test]
    fn slider_clamps_to_bounds() {
        let mut app = app();
        app.additional_videos = SLIDER_MAX;
        app.handle_overall_key(KeyCode::Right);
        assert_eq!(app.additional_videos, SLIDER_MAX);

        app.additional_videos = SLIDER_MIN;
        app.handle_overall_key(KeyCode::Left);
        assert_eq!(app.additional_videos, SLIDER_MIN);

        app.additional_videos = 95;
        app.handle_overall_key(KeyCode::Up);
        assert_eq!(app.additional_videos, SLIDER_MAX);

        app.additional_videos = 5;
        app.handle_overall_key(KeyCode::Down);
        assert_eq!(app.additional_videos, SLIDER_MIN);
    }

    #[test]
    fn slider_survives_refresh_but_report_does_not() {
        let mut app = app();
        app.additional_videos = 75;
        app.apply_outcome(Ok(RenderPass {
            channel_id: ChannelId("UC123".to_string()),
            channel: ChannelRecord {
                name: "Example".to_string(),
                subscribers: 1,
                total_views: 1,
                video_count: 1,
            },
            videos: Vec::new(),
        }));
        assert!(app.pass.is_some());
        assert_eq!(app.additional_videos, 75);

        app.apply_outcome(Err("quota exceeded".to_string()));
        assert!(app.pass.is_none(), "failed pass must withhold the whole report");
        assert_eq!(app.error.as_deref(), Some("quota exceeded"));
        assert_eq!(app.additional_videos, 75);
    }

    #[test]
    fn refresh_requests_are_not_stacked() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut app = app();
        app.refreshing = false;

        app.handle_key(KeyCode::Char('r'), &cmd_tx);
        app.handle_key(KeyCode::Char('r'), &cmd_tx);

        assert_eq!(cmd_rx.try_recv(), Ok(UiCommand::Refresh));
        assert!(cmd_rx.try_recv().is_err(), "second refresh ignored while one is in flight");
    }

    #[test]
    fn any_key_closes_help() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut app = app();
        app.handle_key(KeyCode::Char('?'), &cmd_tx);
        assert_eq!(app.view_mode, ViewMode::Help);
        app.handle_key(KeyCode::Char('x'), &cmd_tx);
        assert_eq!(app.view_mode, ViewMode::Dashboard);
    }
}
