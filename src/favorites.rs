//! Favorite matching.
//!
//! | Facet | A candidate matches when it occurs in |
//! |-------|---------------------------------------|
//! | sports | the sport key (or the key occurs in it), or the title |
//! | teams | the title, home team or away team |
//! | leagues | the league or the title |
//! | titles | the title |
//! | channels | the channel |
//!
//! Comparison is case-insensitive substring containment. Facets are OR-ed:
//! one hit in any facet makes the event a favorite.

use crate::models::{FavoriteCriteria, SportEvent};

fn lowered(candidates: &[String]) -> impl Iterator<Item = String> + '_ {
    candidates
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
}

fn occurs_in(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

/// True when `event` matches at least one favorite candidate.
///
/// Criteria with every list empty never match.
pub fn matches(event: &SportEvent, criteria: &FavoriteCriteria) -> bool {
    if criteria.is_empty() {
        return false;
    }

    let title = event.title.to_lowercase();
    let sport = event.sport.to_lowercase();
    let channel = event.channel.to_lowercase();

    lowered(&criteria.sports)
        .any(|s| sport.contains(&s) || s.contains(&sport) || title.contains(&s))
        || lowered(&criteria.teams).any(|t| {
            title.contains(&t) || occurs_in(&event.home_team, &t) || occurs_in(&event.away_team, &t)
        })
        || lowered(&criteria.leagues).any(|l| occurs_in(&event.league, &l) || title.contains(&l))
        || lowered(&criteria.titles).any(|t| title.contains(&t))
        || lowered(&criteria.channels).any(|c| channel.contains(&c))
}
