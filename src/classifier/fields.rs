//! Free-text field heuristics: channel, league, live flag and time tokens.
//!
//! These are the generic fallbacks used after the structural extractors in
//! [`crate::scrapers::layout`] came up empty. Channel and league tables are
//! scanned most-specific-first so that `"V Sport Premium"` wins over
//! `"V Sport"` and `"Hockeyallsvenskan"` over `"Allsvenskan"`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Broadcasters seen on Swedish sport TV guides.
const KNOWN_CHANNELS: &[&str] = &[
    "TV4", "TV4+", "TV4 Sport", "TV4 Fakta", "TV4 Play",
    "TV4 Sport Live", "TV4 Fotboll", "TV4 Hockey", "TV4 Tennis", "TV4 Motor",
    "SVT1", "SVT2", "SVT24", "SVT Play", "SVT",
    "Kanal 5", "Kanal 9", "Kanal 11",
    "Eurosport 1", "Eurosport 2", "Eurosport",
    "Viasat Sport", "Viasat Hockey", "Viasat Fotboll", "Viasat Golf", "Viasat Motor", "Viasat",
    "V Sport Premium", "V Sport 1", "V Sport 2", "V Sport Extra", "V Sport",
    "V Sport Fotboll", "V Sport Hockey", "V Sport Golf", "V Sport Motor",
    "C More Live", "C More Fotboll", "C More Hockey", "C More Sport", "C More",
    "Sportkanalen", "Telia",
    "TV3", "TV3+", "TV6", "TV8", "TV10",
    "Discovery+", "Discovery", "Max", "HBO Max",
    "Dplay", "Viafree", "Viaplay", "DAZN", "Prime Video",
];

/// Channel names sorted longest first (stable for equal lengths).
static CHANNELS_BY_SPECIFICITY: Lazy<Vec<&'static str>> = Lazy::new(|| by_length_desc(KNOWN_CHANNELS));

/// Lowercase pattern → display name for named leagues and tournaments.
const SPECIFIC_LEAGUES: &[(&str, &str)] = &[
    ("champions league", "Champions League"),
    ("europa league", "Europa League"),
    ("conference league", "Conference League"),
    ("nations league", "Nations League"),
    ("premier league", "Premier League"),
    ("premier padel", "Premier Padel Tour"),
    ("la liga", "La Liga"),
    ("serie a", "Serie A"),
    ("bundesliga", "Bundesliga"),
    ("ligue 1", "Ligue 1"),
    ("eredivisie", "Eredivisie"),
    ("allsvenskan", "Allsvenskan"),
    ("damallsvenskan", "Damallsvenskan"),
    ("superettan", "Superettan"),
    ("hockeyallsvenskan", "Hockeyallsvenskan"),
    ("shl", "SHL"),
    ("nhl", "NHL"),
    ("khl", "KHL"),
    ("nba", "NBA"),
    ("euroleague", "Euroleague"),
    ("nfl", "NFL"),
    ("mlb", "MLB"),
    ("atp", "ATP"),
    ("wta", "WTA"),
    ("world cup", "World Cup"),
    ("världscupen", "Världscupen"),
    ("diamond league", "Diamond League"),
    ("olympics", "Olympics"),
    ("shoot out", "Shoot Out"),
    ("handboll-vm", "Handbolls-VM"),
    ("handbolls-vm", "Handbolls-VM"),
    ("handboll-em", "Handbolls-EM"),
    ("handbolls-em", "Handbolls-EM"),
    ("fotbolls-vm", "Fotbolls-VM"),
    ("fotbolls-em", "Fotbolls-EM"),
    ("ishockey-vm", "Ishockey-VM"),
    ("hockey-vm", "Hockey-VM"),
    ("dart-vm", "Dart-VM"),
    ("skid-vm", "Skid-VM"),
    ("friidrotts-em", "Friidrotts-EM"),
    ("friidrotts-vm", "Friidrotts-VM"),
];

static LEAGUES_BY_SPECIFICITY: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut leagues = SPECIFIC_LEAGUES.to_vec();
    leagues.sort_by_key(|(pattern, _)| std::cmp::Reverse(pattern.chars().count()));
    leagues
});

/// Bare championship codes that are too ambiguous to stand alone as a league.
const GENERIC_LEAGUE_CODES: &[&str] = &["os", "vm", "em"];

static LIVE_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:live|direkt|direktsändning|pågår|just nu|nu|now|ongoing)\b")
        .expect("valid regex")
});

static TIME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[.:](\d{2})\b").expect("valid regex"));

/// A time token directly following a start time: `18:00–20:00`.
static END_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-–—]\s*(\d{1,2})[.:](\d{2})\b").expect("valid regex"));

fn by_length_desc(items: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(item.chars().count()));
    sorted
}

/// Case-insensitive substring test that refuses matches glued to other
/// alphanumerics (`"max"` must not hit `"Maxwell"`). `haystack` and `needle`
/// are expected lowercase.
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Find the most specific known broadcaster named in `text`.
pub fn find_channel(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CHANNELS_BY_SPECIFICITY
        .iter()
        .find(|channel| contains_bounded(&lower, &channel.to_lowercase()))
        .copied()
}

/// Find the most specific named league or tournament in `text`.
///
/// Bare `OS`/`VM`/`EM` never match on their own; only compound phrases such
/// as `"Handbolls-VM"` do.
pub fn find_league(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    LEAGUES_BY_SPECIFICITY
        .iter()
        .find(|(pattern, _)| contains_bounded(&lower, pattern))
        .map(|(_, name)| *name)
}

/// True for the bare generic championship codes (`OS`, `VM`, `EM`).
pub fn is_generic_league(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    GENERIC_LEAGUE_CODES.contains(&lower.as_str())
}

/// True when the visible text carries a live marker ("live", "pågår", "nu", ...).
pub fn is_live_text(text: &str) -> bool {
    LIVE_TOKENS.is_match(text)
}

/// Start (and optional end) time found in a fragment's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: NaiveTime,
    pub end: Option<NaiveTime>,
}

fn token_time(hour: &str, minute: &str) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse the first valid `H:MM`/`HH.MM` token in `text`.
///
/// Tokens with hour > 23 or minute > 59 are skipped.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    find_time_span(text).map(|span| span.start)
}

/// Like [`parse_time`], also picking up an end time written as a range.
pub fn find_time_span(text: &str) -> Option<TimeSpan> {
    TIME_TOKEN.captures_iter(text).find_map(|caps| {
        let start = token_time(&caps[1], &caps[2])?;
        let rest = &text[caps.get(0)?.end()..];
        let end = END_TOKEN
            .captures(rest)
            .and_then(|end| token_time(&end[1], &end[2]));
        Some(TimeSpan { start, end })
    })
}

/// Combine a parsed time with the reference date; seconds are always zero.
pub fn at_reference(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_channel_prefers_specific() {
        assert_eq!(find_channel("18:00 Fotboll V Sport Premium"), Some("V Sport Premium"));
        assert_eq!(find_channel("TV4 Sport Live: SHL"), Some("TV4 Sport Live"));
        assert_eq!(find_channel("sänds i tv4"), Some("TV4"));
        assert_eq!(find_channel("C More Hockey 19.00"), Some("C More Hockey"));
    }

    #[test]
    fn test_find_channel_requires_word_boundary() {
        assert_eq!(find_channel("Maxwell Open"), None);
        assert_eq!(find_channel("Max, 20:00"), Some("Max"));
        assert_eq!(find_channel("Bra program"), None);
    }

    #[test]
    fn test_find_league_prefers_specific() {
        assert_eq!(find_league("Hockeyallsvenskan: AIK - Modo"), Some("Hockeyallsvenskan"));
        assert_eq!(find_league("Allsvenskan: IFK Göteborg - AIK"), Some("Allsvenskan"));
        assert_eq!(find_league("UEFA Champions League"), Some("Champions League"));
        assert_eq!(find_league("Damallsvenskan"), Some("Damallsvenskan"));
    }

    #[test]
    fn test_generic_codes_never_match_alone() {
        assert_eq!(find_league("VM: Sverige - Norge"), None);
        assert_eq!(find_league("EM-final"), None);
        assert_eq!(find_league("Handbolls-VM: Sverige - Norge"), Some("Handbolls-VM"));
        assert!(is_generic_league(" VM "));
        assert!(is_generic_league("os"));
        assert!(!is_generic_league("SHL"));
    }

    #[test]
    fn test_live_tokens() {
        assert!(is_live_text("LIVE Frölunda - Luleå"));
        assert!(is_live_text("Matchen pågår"));
        assert!(is_live_text("Sänds nu"));
        assert!(!is_live_text("Liverpool - Everton"));
        assert!(!is_live_text("Sportnytt"));
    }

    #[test]
    fn test_parse_time_variants() {
        assert_eq!(parse_time("18:00 Fotboll"), NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(parse_time("kl 9.30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time("Bra program"), None);
    }

    #[test]
    fn test_parse_time_rejects_out_of_range() {
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("12:75"), None);
        // an invalid token does not hide a later valid one
        assert_eq!(parse_time("24.99 then 20:15"), NaiveTime::from_hms_opt(20, 15, 0));
    }

    #[test]
    fn test_find_time_span_with_end() {
        let span = find_time_span("18:00–20:00 Allsvenskan").unwrap();
        assert_eq!(span.start, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(span.end, NaiveTime::from_hms_opt(20, 0, 0));

        let span = find_time_span("18:00 Allsvenskan 20:00").unwrap();
        assert_eq!(span.end, None);
    }

    #[test]
    fn test_at_reference_zeroes_seconds() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let time = parse_time("7:05").unwrap();
        assert_eq!(
            at_reference(date, time),
            date.and_hms_opt(7, 5, 0).unwrap()
        );
    }
}
