//! # tubescope - Main Entry Point
//!
//! Supports two operational modes:
//! - **Dashboard** (default): interactive terminal UI with live refresh
//! - **Headless** (`--headless`): print the report to stdout for scripting
//!
//! One render pass = resolve the handle, fetch the channel record, fetch
//! the recent-video table. The dashboard re-runs the pass only when the
//! user asks for a refresh; the growth slider re-derives its numbers from
//! the already-fetched record without touching the network.

// Report printing converts counters for display; precision loss is fine there
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info};

use tubescope::analysis::{correlation_matrix, top_by_engagement, top_by_metric, Metric, TOP_N};
use tubescope::api::{self, YouTubeClient};
use tubescope::cli::Args;
use tubescope::config;
use tubescope::decoration::{self, DEFAULT_DECORATION_URL};
use tubescope::domain::RenderPass;
use tubescope::tui::{
    self,
    format::{group_digits, truncate},
    PassOutcome, UiCommand, SLIDER_DEFAULT,
};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("api key") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();

    let config = config::load(&args)?;
    let client = YouTubeClient::new(config.api_key.clone(), config.timeout)
        .context("Failed to build the API client")?;

    if args.headless {
        let pass = api::run_render_pass(&client, &args.handle, args.max_videos)
            .await
            .with_context(|| format!("render pass for {:?} failed", args.handle))?;
        print_report(&pass);
        return Ok(());
    }

    // Decoration is best-effort: a missing asset never blocks the report
    let decoration = if args.no_decoration {
        None
    } else {
        decoration::load(DEFAULT_DECORATION_URL, config.timeout).await
    };

    let (update_tx, update_rx) = bounded::<PassOutcome>(4);
    let (cmd_tx, cmd_rx) = bounded::<UiCommand>(4);

    // Dashboard on its own thread; this task keeps doing the fetching
    let handle_display = args.handle.clone();
    let ui_handle =
        std::thread::spawn(move || tui::run_dashboard(&update_rx, &cmd_tx, handle_display, decoration));

    loop {
        let outcome: PassOutcome =
            match api::run_render_pass(&client, &args.handle, args.max_videos).await {
                Ok(pass) => {
                    info!(
                        "render pass complete: channel {}, {} videos",
                        pass.channel_id,
                        pass.videos.len()
                    );
                    Ok(pass)
                }
                Err(e) => {
                    if e.is_not_found() {
                        info!("render pass found nothing: {e}");
                    } else {
                        error!("render pass failed: {e}");
                    }
                    Err(e.to_string())
                }
            };

        if update_tx.send(outcome).is_err() {
            break; // dashboard already gone
        }

        // Park until the dashboard asks for another pass or quits
        match tokio::task::block_in_place(|| cmd_rx.recv()) {
            Ok(UiCommand::Refresh) => info!("refresh requested"),
            Ok(UiCommand::Quit) | Err(_) => break,
        }
    }

    match ui_handle.join() {
        Ok(result) => result.context("dashboard terminated with an error"),
        Err(_) => anyhow::bail!("dashboard thread panicked"),
    }
}

/// Textual report for headless mode, covering both tabs' headline content.
fn print_report(pass: &RenderPass) {
    let channel = &pass.channel;
    let videos = &pass.videos;
    let undefined = || "--".to_string();

    println!("tubescope v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Channel: {} ({})", channel.name, pass.channel_id);
    println!("  Subscribers:  {:>15}", group_digits(channel.subscribers));
    println!("  Total views:  {:>15}", group_digits(channel.total_views));
    println!("  Video count:  {:>15}", group_digits(channel.video_count));
    println!();
    println!("Performance metrics:");
    println!(
        "  Subscribers-to-views ratio:  {}",
        channel.subscribers_to_views().map_or_else(undefined, |r| format!("{r:.4}"))
    );
    println!(
        "  Videos-to-subscribers ratio: {}",
        channel.videos_to_subscribers().map_or_else(undefined, |r| format!("{r:.4}"))
    );
    println!(
        "  Average views per video:     {}",
        channel
            .average_views_per_video()
            .map_or_else(undefined, |r| group_digits(r.round() as u64))
    );

    if let Some(projection) = channel.project(SLIDER_DEFAULT) {
        println!();
        println!("Growth projection (+{SLIDER_DEFAULT} videos):");
        println!("  Projected video count: {:>15}", group_digits(projection.video_count));
        println!(
            "  Projected total views: {:>15}",
            group_digits(projection.views.round() as u64)
        );
        println!(
            "  Projected subscribers: {:>15}",
            group_digits(projection.subscribers.round() as u64)
        );
    }

    if videos.is_empty() {
        println!();
        println!("No recent videos found for this channel.");
        return;
    }

    println!();
    println!("Top {TOP_N} videos by views:");
    for (rank, video) in top_by_metric(videos, Metric::Views, TOP_N).iter().enumerate() {
        println!(
            "  {:>2}. {:<48} {:>12} views {:>10} likes {:>8} comments",
            rank + 1,
            truncate(&video.title, 48),
            group_digits(video.views),
            group_digits(video.likes),
            group_digits(video.comments),
        );
    }

    println!();
    println!("Top {TOP_N} videos by engagement rate:");
    for (rank, (video, rate)) in top_by_engagement(videos, TOP_N).iter().enumerate() {
        println!(
            "  {:>2}. {:<48} {:>7.2}% ({} views)",
            rank + 1,
            truncate(&video.title, 48),
            rate,
            group_digits(video.views),
        );
    }

    println!();
    println!("Correlation matrix (views / likes / comments):");
    let matrix = correlation_matrix(videos);
    for (i, metric) in Metric::ALL.iter().enumerate() {
        let cells: Vec<String> = matrix[i]
            .iter()
            .map(|entry| entry.map_or_else(|| "  n/a".to_string(), |r| format!("{r:+.2}")))
            .collect();
        println!("  {:<10} {}", metric.label(), cells.join("  "));
    }
}
