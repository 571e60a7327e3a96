//! Startup configuration.
//!
//! One secret matters: the YouTube Data API key, read once at process start
//! and carried in an explicit [`Config`] handed to whoever builds the API
//! client. There is no ambient credential state to reach for later, and a
//! missing key is fatal to startup.

use std::env;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::cli::Args;

/// Environment variable (or `.env` entry) holding the API key.
pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub timeout: Duration,
}

/// Resolve configuration from the CLI and the environment.
///
/// A `.env` file in the working directory is honored before the process
/// environment is consulted; `--api-key` wins over both.
///
/// # Errors
/// Fails with an actionable message when no API key can be found.
pub fn load(args: &Args) -> Result<Config> {
    dotenv::dotenv().ok();

    let api_key = match &args.api_key {
        Some(key) => key.clone(),
        None => match env::var(API_KEY_VAR) {
            Ok(key) => key,
            Err(_) => bail!(
                "Missing YouTube API key.\n\n\
                 Set the {API_KEY_VAR} environment variable (a .env file in the\n\
                 working directory is honored) or pass --api-key <KEY>.\n\
                 Keys are issued in the Google Cloud console under\n\
                 \"APIs & Services\" for the YouTube Data API v3."
            ),
        },
    };

    if api_key.trim().is_empty() {
        bail!("YouTube API key is empty. Check {API_KEY_VAR} or --api-key.");
    }

    Ok(Config { api_key, timeout: Duration::from_secs(args.timeout) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn explicit_key_wins() {
        let args = Args::parse_from(["tubescope", "--api-key", "k-123"]);
        let config = load(&args).expect("key provided");
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_key_is_rejected() {
        let args = Args::parse_from(["tubescope", "--api-key", "  "]);
        assert!(load(&args).is_err());
    }
}
