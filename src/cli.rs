//! Command-line interface definitions for Sport Sync.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every setting can also come from an environment variable or from the YAML
//! file named by `--config`; command-line values win over both.

use clap::Parser;

/// Command-line arguments for the Sport Sync service.
///
/// Favorite lists are comma-separated (`"AIK, Frölunda"`); blank items are
/// ignored.
///
/// # Examples
///
/// ```sh
/// # Refresh every 30 minutes and log the snapshot summary
/// sport_sync
///
/// # One cycle, write the snapshot as JSON, follow two teams
/// sport_sync --once -j ./out --favorite-teams "AIK, Frölunda"
///
/// # Settings from a file, hourly refresh from the command line
/// sport_sync --config sport_sync.yaml --interval 3600
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seconds between refresh cycles (300 - 86400, default 1800)
    #[arg(short, long, env = "SPORT_SYNC_INTERVAL")]
    pub interval: Option<u64>,

    /// Look-ahead of the upcoming view, in hours (default 3)
    #[arg(long, env = "SPORT_SYNC_UPCOMING_HOURS")]
    pub upcoming_hours: Option<i64>,

    /// Directory for the JSON snapshot file
    #[arg(short, long, env = "SPORT_SYNC_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Favorite sports, comma-separated
    #[arg(long, env = "SPORT_SYNC_FAVORITE_SPORTS")]
    pub favorite_sports: Option<String>,

    /// Favorite teams, comma-separated
    #[arg(long, env = "SPORT_SYNC_FAVORITE_TEAMS")]
    pub favorite_teams: Option<String>,

    /// Favorite leagues, comma-separated
    #[arg(long, env = "SPORT_SYNC_FAVORITE_LEAGUES")]
    pub favorite_leagues: Option<String>,

    /// Favorite title keywords, comma-separated
    #[arg(long, env = "SPORT_SYNC_FAVORITE_TITLES")]
    pub favorite_titles: Option<String>,

    /// Favorite channels, comma-separated
    #[arg(long, env = "SPORT_SYNC_FAVORITE_CHANNELS")]
    pub favorite_channels: Option<String>,

    /// Run a single refresh cycle and exit
    #[arg(long)]
    pub once: bool,
}
