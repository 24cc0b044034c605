//! Cross-source de-duplication.
//!
//! Two sources listing the same broadcast rarely agree on the title's exact
//! spelling, but they do agree on the start minute and, after lowercasing and
//! removing spaces, on the first thirty characters of the title. That pair is
//! the [`fingerprint`]; one event survives per fingerprint.

use crate::models::SportEvent;
use std::collections::HashMap;
use tracing::debug;

const TITLE_KEY_LEN: usize = 30;

/// Grouping key: start minute plus a normalized title prefix.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// # use sport_sync::models::SportEvent;
/// # let start = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(18, 0, 0).unwrap();
/// # let event = SportEvent {
/// #     id: String::new(), title: "IFK Göteborg - AIK".into(), sport: "football".into(),
/// #     channel: "TV4".into(), league: None, start_time: start, end_time: None,
/// #     home_team: None, away_team: None, is_live: false, source: "tvsporten".into(),
/// #     channel_logo: None,
/// # };
/// assert_eq!(sport_sync::dedup::fingerprint(&event), "202610191800_ifkgöteborg-aik");
/// ```
pub fn fingerprint(event: &SportEvent) -> String {
    let title: String = event
        .title
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .take(TITLE_KEY_LEN)
        .collect();
    format!("{}_{}", event.start_time.format("%Y%m%d%H%M"), title)
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// True when `candidate` should replace `kept`: it carries a league the kept
/// event lacks, or a home team the kept event lacks.
pub fn is_more_informative(candidate: &SportEvent, kept: &SportEvent) -> bool {
    (present(&candidate.league) && !present(&kept.league))
        || (present(&candidate.home_team) && !present(&kept.home_team))
}

/// Collapse events sharing a [`fingerprint`] into one.
///
/// The first event seen for a key is kept unless a later one
/// [`is_more_informative`]. Output follows the order in which keys were
/// first seen, so running `dedup` on its own output changes nothing.
pub fn dedup(events: Vec<SportEvent>) -> Vec<SportEvent> {
    let incoming = events.len();
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(incoming);
    let mut kept: Vec<SportEvent> = Vec::with_capacity(incoming);

    for event in events {
        match slots.get(&fingerprint(&event)) {
            Some(&slot) => {
                if is_more_informative(&event, &kept[slot]) {
                    debug!(key = %fingerprint(&event), from = %kept[slot].source, to = %event.source, "Replacing duplicate with richer event");
                    kept[slot] = event;
                }
            }
            None => {
                slots.insert(fingerprint(&event), kept.len());
                kept.push(event);
            }
        }
    }

    debug!(incoming, kept = kept.len(), "Deduplicated events");
    kept
}
