//! Command-line argument parsing and configuration.

use clap::Parser;

/// Terminal analytics dashboard for a YouTube channel.
///
/// Resolves HANDLE through the YouTube Data API, fetches channel and
/// recent-video statistics, and opens an interactive dashboard with an
/// Overall Analysis tab and a Video Analysis tab.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Channel handle, channel name, or channel URL to analyze
    #[arg(default_value = "@cristiano")]
    pub handle: String,

    /// YouTube Data API key (overrides the YOUTUBE_API_KEY environment variable)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// How many most-recent videos to fetch (first result page only)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub max_videos: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Print the report to stdout and exit instead of opening the dashboard
    #[arg(long)]
    pub headless: bool,

    /// Skip fetching the decorative header animation
    #[arg(long)]
    pub no_decoration: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard_contract() {
        let args = Args::parse_from(["tubescope"]);
        assert_eq!(args.handle, "@cristiano");
        assert_eq!(args.max_videos, 50);
        assert_eq!(args.timeout, 10);
        assert!(!args.headless);
    }

    #[test]
    fn max_videos_cannot_exceed_first_page_cap() {
        let result = Args::try_parse_from(["tubescope", "--max-videos", "80"]);
        assert!(result.is_err());
    }
}
