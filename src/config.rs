//! Runtime settings: YAML file, environment and command line, merged.
//!
//! Precedence, highest first: command-line flag, environment variable (both
//! handled by `clap`), settings file, built-in default. The merged
//! [`Settings`] are validated once at startup so the refresh loop never sees
//! an out-of-range value.
//!
//! Settings file example:
//!
//! ```yaml
//! interval: 3600
//! upcoming_hours: 4
//! json_output_dir: /var/lib/sport_sync
//! favorite_teams: [AIK, Frölunda]
//! favorite_channels: "TV4, Viaplay"
//! ```

use crate::cli::Cli;
use crate::models::FavoriteCriteria;
use crate::views::DEFAULT_UPCOMING_HOURS;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::io;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, instrument};

pub const DEFAULT_INTERVAL_SECS: u64 = 1800;
pub const MIN_INTERVAL_SECS: u64 = 300;
pub const MAX_INTERVAL_SECS: u64 = 86_400;
/// Longest accepted look-ahead for the upcoming view: one week.
pub const MAX_UPCOMING_HOURS: i64 = 168;

/// Split comma-separated text into trimmed, non-empty items.
///
/// # Examples
///
/// ```
/// use sport_sync::config::parse_comma_list;
///
/// assert_eq!(parse_comma_list(" AIK ,, Frölunda,"), vec!["AIK", "Frölunda"]);
/// assert!(parse_comma_list("").is_empty());
/// ```
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Invalid or unreadable configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: io::Error },
    Parse { path: String, source: serde_yaml::Error },
    IntervalOutOfRange(u64),
    UpcomingHours(i64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "cannot read {path}: {source}"),
            ConfigError::Parse { path, source } => write!(f, "invalid settings in {path}: {source}"),
            ConfigError::IntervalOutOfRange(secs) => write!(
                f,
                "refresh interval {secs}s is outside {MIN_INTERVAL_SECS}..={MAX_INTERVAL_SECS}s"
            ),
            ConfigError::UpcomingHours(hours) => {
                write!(f, "upcoming window {hours}h is outside 1..={MAX_UPCOMING_HOURS}h")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A favorite list written either as a YAML sequence or as comma-separated
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListSetting {
    Items(Vec<String>),
    Text(String),
}

impl ListSetting {
    fn into_items(self) -> Vec<String> {
        match self {
            ListSetting::Items(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
            ListSetting::Text(text) => parse_comma_list(&text),
        }
    }
}

/// Contents of the optional settings file; every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub interval: Option<u64>,
    pub upcoming_hours: Option<i64>,
    pub json_output_dir: Option<String>,
    pub favorite_sports: Option<ListSetting>,
    pub favorite_teams: Option<ListSetting>,
    pub favorite_leagues: Option<ListSetting>,
    pub favorite_titles: Option<ListSetting>,
    pub favorite_channels: Option<ListSetting>,
}

impl FileSettings {
    /// Read and parse a YAML settings file.
    #[instrument(level = "info", skip_all, fields(path = %path))]
    pub async fn read(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).await.map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    fn parse(path: &str, raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub interval: Duration,
    pub upcoming_hours: i64,
    pub json_output_dir: Option<String>,
    pub favorites: FavoriteCriteria,
    pub once: bool,
}

fn pick_list(cli: &Option<String>, file: Option<ListSetting>) -> Vec<String> {
    match cli {
        Some(text) => parse_comma_list(text),
        None => file.map(ListSetting::into_items).unwrap_or_default(),
    }
}

impl Settings {
    /// Load the settings file named on the command line (if any), merge it
    /// with the CLI and validate the result.
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileSettings::read(path).await?,
            None => FileSettings::default(),
        };
        Self::merge(cli, file)
    }

    /// Merge CLI values over file values over defaults, then validate.
    pub fn merge(cli: &Cli, file: FileSettings) -> Result<Self, ConfigError> {
        let interval_secs = cli.interval.or(file.interval).unwrap_or(DEFAULT_INTERVAL_SECS);
        let settings = Self {
            interval: Duration::from_secs(interval_secs),
            upcoming_hours: cli
                .upcoming_hours
                .or(file.upcoming_hours)
                .unwrap_or(DEFAULT_UPCOMING_HOURS),
            json_output_dir: cli.json_output_dir.clone().or(file.json_output_dir),
            favorites: FavoriteCriteria {
                sports: pick_list(&cli.favorite_sports, file.favorite_sports),
                teams: pick_list(&cli.favorite_teams, file.favorite_teams),
                leagues: pick_list(&cli.favorite_leagues, file.favorite_leagues),
                titles: pick_list(&cli.favorite_titles, file.favorite_titles),
                channels: pick_list(&cli.favorite_channels, file.favorite_channels),
            },
            once: cli.once,
        };
        settings.validate()?;
        debug!(?settings, "Resolved settings");
        Ok(settings)
    }

    /// Reject an interval outside 300 to 86400 seconds or an upcoming window
    /// outside one hour to one week.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.interval.as_secs();
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
            return Err(ConfigError::IntervalOutOfRange(secs));
        }
        if !(1..=MAX_UPCOMING_HOURS).contains(&self.upcoming_hours) {
            return Err(ConfigError::UpcomingHours(self.upcoming_hours));
        }
        Ok(())
    }
}
