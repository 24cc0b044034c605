//! Data models for broadcast events and per-source health.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`SportEvent`]: One normalized sport broadcast, produced by a source adapter
//! - [`ProviderStatus`]: Health record for one source in one refresh cycle
//! - [`FavoriteCriteria`]: The five favorite facets used by the matcher
//! - [`EventRecord`]: The flat field map exposed to consumers of a snapshot
//!
//! Events are created once per fetch cycle and never mutated afterwards; the
//! next cycle replaces them wholesale.

use crate::classifier::sport::sport_info;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single sport broadcast as scraped from a TV-guide source.
///
/// # Fields
///
/// * `id` - Deterministic fingerprint, see [`event_id`]
/// * `sport` - Classified sport key (`"football"`, `"hockey"`, ..., `"other"`)
/// * `start_time` - Local wall-clock start; always present
/// * `source` - Name of the adapter that produced the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportEvent {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub channel: String,
    pub league: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub is_live: bool,
    pub source: String,
    pub channel_logo: Option<String>,
}

impl SportEvent {
    /// Flatten the event into the record shape exposed to consumers.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            sport: self.sport.clone(),
            sport_name: sport_info(&self.sport).name.to_string(),
            league: self.league.clone(),
            channel: self.channel.clone(),
            channel_logo: self.channel_logo.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            is_live: self.is_live,
            source: self.source.clone(),
        }
    }
}

/// Build the stable event id from its identifying parts.
///
/// Empty parts are skipped, the rest are joined with `|`, hashed with SHA-256
/// and the first 12 hex characters are kept. The same broadcast fetched in a
/// later cycle yields the same id.
pub fn event_id(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("|");
    let digest = Sha256::digest(joined.as_bytes());
    digest
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Flat, serializable view of a [`SportEvent`].
///
/// Timestamps serialize as ISO-8601 (`2026-10-19T18:00:00`); absent values
/// serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub sport_name: String,
    pub league: Option<String>,
    pub channel: String,
    pub channel_logo: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub is_live: bool,
    pub source: String,
}

/// Outcome of one source in one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Ok,
    Error,
}

/// Per-source health record, rebuilt every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_fetch: Option<DateTime<Local>>,
}

impl ProviderStatus {
    pub fn ok(events_count: usize, last_fetch: Option<DateTime<Local>>) -> Self {
        Self {
            status: FetchStatus::Ok,
            error: None,
            events_count,
            last_fetch,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Error,
            error: Some(message.into()),
            events_count: 0,
            last_fetch: None,
        }
    }
}

/// Favorite facets supplied by the configuration collaborator.
///
/// Every list is already split and trimmed; see
/// [`parse_comma_list`](crate::config::parse_comma_list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCriteria {
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub leagues: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl FavoriteCriteria {
    /// True when no facet carries a single candidate.
    pub fn is_empty(&self) -> bool {
        self.sports.is_empty()
            && self.teams.is_empty()
            && self.leagues.is_empty()
            && self.titles.is_empty()
            && self.channels.is_empty()
    }
}
