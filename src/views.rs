//! Read-only queries over a snapshot's events.
//!
//! All views take the current time from the caller and return events sorted
//! by ascending start time (stable, so equal starts keep store order).

use crate::favorites;
use crate::models::{EventRecord, FavoriteCriteria, ProviderStatus, SportEvent};
use crate::store::Snapshot;
use chrono::{DateTime, Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Look-ahead of the upcoming view when none is configured.
pub const DEFAULT_UPCOMING_HOURS: i64 = 3;

fn chronological<'a>(events: impl Iterator<Item = &'a SportEvent>) -> Vec<&'a SportEvent> {
    let mut sorted: Vec<_> = events.collect();
    sorted.sort_by_key(|event| event.start_time);
    sorted
}

/// Every event.
pub fn all(events: &[SportEvent]) -> Vec<&SportEvent> {
    chronological(events.iter())
}

/// Events flagged live, or started and not yet ended at `now`. An event
/// without an end time counts as ongoing once it has started.
pub fn live(events: &[SportEvent], now: NaiveDateTime) -> Vec<&SportEvent> {
    chronological(events.iter().filter(|event| {
        event.is_live || (event.start_time <= now && event.end_time.is_none_or(|end| now <= end))
    }))
}

/// Events starting within `[now, now + window]`. A window reaching past the
/// representable calendar is open-ended.
pub fn upcoming(events: &[SportEvent], now: NaiveDateTime, window: Duration) -> Vec<&SportEvent> {
    let cutoff = now.checked_add_signed(window).unwrap_or(NaiveDateTime::MAX);
    chronological(
        events
            .iter()
            .filter(|event| now <= event.start_time && event.start_time <= cutoff),
    )
}

/// Events matching the favorite criteria; nothing when the criteria are empty.
pub fn favorites<'a>(events: &'a [SportEvent], criteria: &FavoriteCriteria) -> Vec<&'a SportEvent> {
    chronological(events.iter().filter(|event| favorites::matches(event, criteria)))
}

/// Convert a view into consumer records.
pub fn records(events: &[&SportEvent]) -> Vec<EventRecord> {
    events.iter().map(|event| event.to_record()).collect()
}

/// Every view of one snapshot, serializable as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub last_update: Option<DateTime<Local>>,
    pub generated_at: NaiveDateTime,
    pub upcoming_hours: i64,
    pub provider_status: BTreeMap<String, ProviderStatus>,
    pub events: Vec<EventRecord>,
    pub live: Vec<EventRecord>,
    pub upcoming: Vec<EventRecord>,
    pub favorites: Vec<EventRecord>,
}

impl SnapshotReport {
    /// Evaluate every view of `snapshot` at `now`.
    pub fn build(
        snapshot: &Snapshot,
        now: NaiveDateTime,
        upcoming_hours: i64,
        criteria: &FavoriteCriteria,
    ) -> Self {
        let events = &snapshot.events;
        let window = Duration::try_hours(upcoming_hours).unwrap_or(Duration::MAX);
        Self {
            last_update: snapshot.last_update,
            generated_at: now,
            upcoming_hours,
            provider_status: snapshot.provider_status.clone(),
            events: records(&all(events)),
            live: records(&live(events, now)),
            upcoming: records(&upcoming(events, now, window)),
            favorites: records(&favorites(events, criteria)),
        }
    }
}
