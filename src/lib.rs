//! # tubescope - Terminal Analytics Dashboard for a YouTube Channel
//!
//! tubescope resolves a channel handle through the YouTube Data API v3,
//! fetches the channel's aggregate statistics and its most recent videos,
//! and renders descriptive charts and summary metrics in an interactive
//! terminal dashboard.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  YouTube Data API v3                     │
//! │        search.list / channels.list / videos.list         │
//! └────────────────────────┬─────────────────────────────────┘
//!                          │ HTTPS (reqwest)
//!                          ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 tubescope (This Crate)                   │
//! │                                                          │
//! │  ┌───────────┐    ┌───────────┐    ┌────────────┐        │
//! │  │    api    │───▶│  domain   │───▶│    tui     │        │
//! │  │ (client)  │    │ (records) │    │ (terminal) │        │
//! │  └───────────┘    └─────┬─────┘    └────────────┘        │
//! │                         │                ▲               │
//! │                         ▼                │               │
//! │                   ┌───────────┐          │               │
//! │                   │ analysis  │──────────┘               │
//! │                   │  (stats)  │                          │
//! │                   └───────────┘                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`api`]: YouTube Data API client - channel resolution, channel
//!   statistics, recent-video statistics, and the typed error taxonomy
//! - [`domain`]: Core records (`ChannelRecord`, `VideoRecord`) with their
//!   derived ratios, engagement rate, and growth projection
//! - [`analysis`]: Descriptive statistics over the video table - summaries,
//!   histograms, correlations, stable top-N rankings
//! - [`tui`]: Interactive dashboard with the Overall and Video tabs
//! - [`decoration`]: Optional header animation fetched from a static asset
//! - [`config`]: API-key and client configuration from the environment
//! - [`cli`]: Command-line argument parsing
//!
//! ## Operational Modes
//!
//! 1. **Dashboard Mode** (default): interactive terminal interface
//! 2. **Headless Mode** (`--headless`): print the report to stdout and exit

// Expose modules for testing
pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod decoration;
pub mod domain;
pub mod tui;
