//! Structural discovery and field extraction over arbitrary TV-guide markup.
//!
//! TV-guide pages change layout often and share no schema, so every field is
//! found through an ordered chain of [`Extractor`]s: a structural location
//! (an element whose class names the field) first, then a free-text
//! heuristic over the fragment's visible text. The first non-empty result
//! wins.
//!
//! A source module supplies a [`Profile`] (its extractor chains and
//! placeholders) and decides which elements are candidates; this module turns
//! each candidate into a [`SportEvent`] or drops it.

use crate::classifier::{fields, sport, teams};
use crate::models::{SportEvent, event_id};
use crate::utils::{collapse_whitespace, truncate_for_log};
use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// One step of a first-match-wins field chain: `(fragment, visible text) -> value`.
pub type Extractor = fn(ElementRef<'_>, &str) -> Option<String>;

/// Per-source extraction settings.
#[derive(Debug)]
pub struct Profile {
    /// Adapter name recorded on every event.
    pub source: &'static str,
    /// Base URL used to resolve relative logo links.
    pub base_url: &'static str,
    /// Channel used when neither markup nor text names one.
    pub unknown_channel: &'static str,
    /// Fragments with less visible text than this are ignored.
    pub min_text_len: usize,
    pub titles: &'static [Extractor],
    pub channels: &'static [Extractor],
    pub leagues: &'static [Extractor],
}

/// Upper bound on fragments taken from the time-token scan.
pub const MAX_SCAN_CANDIDATES: usize = 100;

/// Parse a literal CSS selector.
pub fn css(selector: &'static str) -> Selector {
    Selector::parse(selector).expect("valid CSS selector")
}

static SECTION_HEADER: Lazy<Selector> =
    Lazy::new(|| css("h1, h2, h3, h4, .section-title, .sport-title, .category-title"));
static SPORT_CHILD: Lazy<Selector> = Lazy::new(|| {
    css(".sport, .category, .sport-type, [class*='sport-'], [class*='category-']")
});
static LIVE_MARKER: Lazy<Selector> = Lazy::new(|| css(".live, .is-live, [class*='live'], [data-live]"));
static CHANNEL_SLOT: Lazy<Selector> = Lazy::new(|| {
    css(".channel, .tv-channel, .broadcaster, td.channel, .kanal, [class*='channel'], [class*='kanal']")
});
static LEAGUE_SLOT: Lazy<Selector> = Lazy::new(|| {
    css(".league, .competition, .tournament, .liga, [class*='league'], [class*='competition']")
});
static LOGO: Lazy<Selector> = Lazy::new(|| css("img[src]"));
static SCAN_TARGETS: Lazy<Selector> = Lazy::new(|| css("div, tr, li, article"));

static TIME_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[.:]\d{2}\b").expect("valid regex"));
static LEADING_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d{1,2}[.:]\d{2}(?:\s*[-–—]\s*\d{1,2}[.:]\d{2})?\s*").expect("valid regex")
});
static TRAILING_CHANNEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\b(?:TV4|SVT\d*|Eurosport\s*\d?|Viasat|V Sport|C More|Kanal \d+)\b.*$")
        .expect("valid regex")
});

const HINT_ATTRS: &[&str] = &["data-sport", "data-category", "data-type"];

/// Text nodes of `el`, each trimmed, empty ones dropped, joined by `sep`.
pub fn joined_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Visible text with a single space between text nodes.
pub fn visible_text(el: ElementRef<'_>) -> String {
    joined_text(el, " ")
}

/// Visible text with text nodes glued together; adjacent team names end up
/// concatenated (`SverigeFinland`), which [`teams::extract_teams`] handles.
pub fn compact_text(el: ElementRef<'_>) -> String {
    joined_text(el, "")
}

/// First strict descendant of `el` matching `selector`.
pub fn select_first<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    el.select(selector).find(|found| found.id() != el.id())
}

/// Run an extractor chain and keep the first non-blank value.
pub fn first_match(chain: &[Extractor], el: ElementRef<'_>, text: &str) -> Option<String> {
    chain
        .iter()
        .find_map(|extract| extract(el, text).filter(|value| !value.trim().is_empty()))
}

/// Accept a title candidate only if it reads like a title rather than a bare
/// time, score or one-word label.
pub fn plausible_title(raw: &str) -> Option<String> {
    let title = collapse_whitespace(raw);
    let long_enough = title.chars().count() > 3;
    let has_letters = title.chars().any(char::is_alphabetic);
    (long_enough && has_letters).then_some(title)
}

fn attribute_sport(el: ElementRef<'_>) -> Option<&'static str> {
    let classes = el.value().classes().collect::<Vec<_>>().join(" ");
    if let Some(found) = sport::detect(&classes) {
        return Some(found);
    }
    HINT_ATTRS
        .iter()
        .filter_map(|attr| el.value().attr(attr))
        .find_map(sport::detect)
}

/// Sport named by a section's header, class list or `data-*` hints.
pub fn section_sport(section: ElementRef<'_>) -> Option<&'static str> {
    select_first(section, &SECTION_HEADER)
        .and_then(|header| sport::detect(&compact_text(header)))
        .or_else(|| attribute_sport(section))
}

/// Sport named by a fragment's own class list, `data-*` hints or a sport
/// label child.
pub fn element_sport(el: ElementRef<'_>) -> Option<&'static str> {
    attribute_sport(el).or_else(|| {
        select_first(el, &SPORT_CHILD).and_then(|child| sport::detect(&compact_text(child)))
    })
}

/// Live class or attribute on the fragment or one of its descendants.
pub fn has_live_marker(el: ElementRef<'_>) -> bool {
    el.value()
        .classes()
        .any(|class| class.to_lowercase().contains("live"))
        || el.value().attr("data-live").is_some()
        || select_first(el, &LIVE_MARKER).is_some()
}

/// Resolve the logo image inside the channel slot against `base_url`.
pub fn channel_logo(el: ElementRef<'_>, base_url: &str) -> Option<String> {
    let slot = select_first(el, &CHANNEL_SLOT)?;
    let src = slot.select(&LOGO).next()?.value().attr("src")?;
    let base = Url::parse(base_url).ok()?;
    base.join(src).ok().map(String::from)
}

/// Text of the channel slot, or its logo's `alt` text when it has no text.
pub fn channel_slot_text(el: ElementRef<'_>, _text: &str) -> Option<String> {
    let slot = select_first(el, &CHANNEL_SLOT)?;
    let text = visible_text(slot);
    if !text.is_empty() {
        return Some(text);
    }
    slot.select(&LOGO)
        .next()
        .and_then(|img| img.value().attr("alt"))
        .map(|alt| alt.trim().to_string())
}

/// Known broadcaster named inside the channel slot.
pub fn channel_slot_known(el: ElementRef<'_>, text: &str) -> Option<String> {
    channel_slot_text(el, text)
        .and_then(|slot| fields::find_channel(&slot))
        .map(String::from)
}

/// Known broadcaster named anywhere in the fragment's text.
pub fn channel_in_text(_el: ElementRef<'_>, text: &str) -> Option<String> {
    fields::find_channel(text).map(String::from)
}

/// League slot text, unless it is a bare generic code such as `VM`.
pub fn league_slot(el: ElementRef<'_>, _text: &str) -> Option<String> {
    let slot = select_first(el, &LEAGUE_SLOT)?;
    let league = visible_text(slot);
    (!league.is_empty() && !fields::is_generic_league(&league)).then_some(league)
}

/// Named league or tournament mentioned in the fragment's text.
pub fn league_in_text(_el: ElementRef<'_>, text: &str) -> Option<String> {
    fields::find_league(text).map(String::from)
}

/// Visible text with the leading time (range) and the trailing channel
/// mention removed.
pub fn strip_time_and_channel(text: &str) -> String {
    let without_time = LEADING_TIME.replace(text, "");
    let without_channel = TRAILING_CHANNEL.replace(&without_time, "");
    collapse_whitespace(&without_channel)
}

/// Lowercased text with every mention of `channel` blanked, so a channel
/// named "C More Live" does not read as a live marker.
fn without_channel(text: &str, channel: Option<&str>) -> String {
    let text = text.to_lowercase();
    match channel {
        Some(channel) => text.replace(&channel.to_lowercase(), " "),
        None => text,
    }
}

/// Scan every block-ish element for a time token within a plausible text
/// length, skipping descendants of elements already taken.
pub fn scan_time_candidates(document: &Html) -> Vec<ElementRef<'_>> {
    let mut chosen = Vec::new();
    let mut chosen_ids = HashSet::new();

    for el in document.select(&SCAN_TARGETS) {
        if chosen.len() >= MAX_SCAN_CANDIDATES {
            break;
        }
        let text = visible_text(el);
        let len = text.chars().count();
        if len <= 20 || len >= 500 || !TIME_TOKEN.is_match(&text) {
            continue;
        }
        if el.ancestors().any(|ancestor| chosen_ids.contains(&ancestor.id())) {
            continue;
        }
        chosen_ids.insert(el.id());
        chosen.push(el);
    }
    chosen
}

/// Drop events whose id was already seen, keeping the first occurrence.
///
/// Nested candidate selectors can reach the same fragment twice; the copies
/// share source, start time, title and channel and therefore the id.
pub fn first_unique(events: Vec<SportEvent>) -> Vec<SportEvent> {
    events.into_iter().unique_by(|event| event.id.clone()).collect()
}

/// Turn one candidate fragment into an event.
///
/// Returns `None` (the fragment is dropped) when no valid time token is found
/// or the cleaned title is shorter than three characters.
///
/// Sport precedence: `sport_hint` from the enclosing section, then the
/// fragment's own class/attribute hints, then keyword classification of its
/// text, then `"other"`.
pub fn parse_candidate(
    profile: &Profile,
    el: ElementRef<'_>,
    date: NaiveDate,
    sport_hint: Option<&'static str>,
) -> Option<SportEvent> {
    let text = visible_text(el);
    if text.chars().count() < profile.min_text_len {
        return None;
    }

    let span = fields::find_time_span(&text)?;
    let start_time = fields::at_reference(date, span.start);
    let end_time = span.end.map(|end| {
        let end = fields::at_reference(date, end);
        if end < start_time { end + Duration::days(1) } else { end }
    });

    let raw_title = first_match(profile.titles, el, &text).map(|t| collapse_whitespace(&t));
    let Some(raw_title) = raw_title.filter(|t| t.chars().count() >= 3) else {
        debug!(source = profile.source, text = %truncate_for_log(&text, 80), "Dropping fragment without title");
        return None;
    };

    let (home_team, away_team) = teams::extract_teams(&raw_title);
    let title = teams::format_title_with_teams(&raw_title, home_team.as_deref(), away_team.as_deref());

    let channel = first_match(profile.channels, el, &text);
    let sport = sport_hint
        .or_else(|| element_sport(el))
        .unwrap_or_else(|| sport::classify(&text));
    let league = first_match(profile.leagues, el, &text);
    let is_live =
        has_live_marker(el) || fields::is_live_text(&without_channel(&text, channel.as_deref()));

    let id = event_id(&[
        profile.source,
        &start_time.format("%Y-%m-%dT%H:%M:%S").to_string(),
        &title,
        channel.as_deref().unwrap_or_default(),
    ]);

    Some(SportEvent {
        id,
        title,
        sport: sport.to_string(),
        channel: channel.unwrap_or_else(|| profile.unknown_channel.to_string()),
        league,
        start_time,
        end_time,
        home_team,
        away_team,
        is_live,
        source: profile.source.to_string(),
        channel_logo: channel_logo(el, profile.base_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_slot(el: ElementRef<'_>, _text: &str) -> Option<String> {
        static TITLE: Lazy<Selector> = Lazy::new(|| css(".title"));
        select_first(el, &TITLE).and_then(|t| plausible_title(&visible_text(t)))
    }

    fn free_text(_el: ElementRef<'_>, text: &str) -> Option<String> {
        Some(strip_time_and_channel(text))
    }

    static TEST_PROFILE: Profile = Profile {
        source: "test",
        base_url: "https://guide.example.se/tabla/",
        unknown_channel: "Okänd kanal",
        min_text_len: 0,
        titles: &[title_slot, free_text],
        channels: &[channel_slot_known, channel_in_text],
        leagues: &[league_slot, league_in_text],
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn first_li(document: &Html) -> ElementRef<'_> {
        document.select(&css("li")).next().unwrap()
    }

    #[test]
    fn test_structural_fields_win() {
        let html = Html::parse_fragment(
            r#"<ul><li class="event">
                <span class="time">18:00</span>
                <span class="title">IFK Göteborg - AIK</span>
                <span class="league">Allsvenskan</span>
                <span class="channel"><img src="/logos/tv4.png" alt="TV4">TV4 Sport</span>
            </li></ul>"#,
        );
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.title, "IFK Göteborg - AIK");
        assert_eq!(event.home_team.as_deref(), Some("IFK Göteborg"));
        assert_eq!(event.away_team.as_deref(), Some("AIK"));
        assert_eq!(event.league.as_deref(), Some("Allsvenskan"));
        assert_eq!(event.channel, "TV4 Sport");
        assert_eq!(event.sport, "football");
        assert_eq!(event.start_time, date().and_hms_opt(18, 0, 0).unwrap());
        assert_eq!(
            event.channel_logo.as_deref(),
            Some("https://guide.example.se/logos/tv4.png")
        );
        assert!(!event.is_live);
    }

    #[test]
    fn test_free_text_fallbacks() {
        let html = Html::parse_fragment(
            "<ul><li>20.15 Handbolls-VM: Sverige - Norge SVT1</li></ul>",
        );
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.title, "Handbolls-VM: Sverige - Norge");
        assert_eq!(event.channel, "SVT1");
        assert_eq!(event.league.as_deref(), Some("Handbolls-VM"));
        assert_eq!(event.sport, "handball");
    }

    #[test]
    fn test_generic_league_slot_is_rejected() {
        let html = Html::parse_fragment(
            r#"<ul><li><span class="league">VM</span> 12:00 Sverige - Norge</li></ul>"#,
        );
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.league, None);
        assert_eq!(event.channel, "Okänd kanal");
    }

    #[test]
    fn test_sport_hint_takes_precedence() {
        let html = Html::parse_fragment(
            r#"<ul><li class="hockey">19:00 <span class="title">Sverige - Finland</span></li></ul>"#,
        );
        let li = first_li(&html);
        let hinted = parse_candidate(&TEST_PROFILE, li, date(), Some("bandy")).unwrap();
        assert_eq!(hinted.sport, "bandy");
        let unhinted = parse_candidate(&TEST_PROFILE, li, date(), None).unwrap();
        assert_eq!(unhinted.sport, "hockey");
    }

    /// Title slot read without separators, as adjacent team cells render.
    fn compact_title(el: ElementRef<'_>, _text: &str) -> Option<String> {
        static TITLE: Lazy<Selector> = Lazy::new(|| css(".title"));
        select_first(el, &TITLE).map(compact_text)
    }

    static COMPACT_PROFILE: Profile = Profile {
        source: "test",
        base_url: "https://guide.example.se/",
        unknown_channel: "Okänd kanal",
        min_text_len: 0,
        titles: &[compact_title],
        channels: &[channel_in_text],
        leagues: &[league_in_text],
    };

    #[test]
    fn test_concatenated_title_is_renormalized() {
        let html = Html::parse_fragment(
            r#"<ul><li>17:30 <div class="title"><b>Sverige</b><b>Finland</b></div></li></ul>"#,
        );
        let event = parse_candidate(&COMPACT_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.title, "Sverige - Finland");
        assert_eq!(event.home_team.as_deref(), Some("Sverige"));
        assert_eq!(event.away_team.as_deref(), Some("Finland"));
    }

    #[test]
    fn test_live_and_end_time() {
        let html = Html::parse_fragment(
            r#"<ul><li><span class="badge-live">LIVE</span> 23:00–01:00 <span class="title">NHL: Rangers - Bruins</span></li></ul>"#,
        );
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert!(event.is_live);
        assert_eq!(
            event.end_time,
            Some(date().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap())
        );
        assert_eq!(event.league.as_deref(), Some("NHL"));
    }

    #[test]
    fn test_live_channel_name_is_not_a_live_marker() {
        let html = Html::parse_fragment(
            r#"<ul><li>19:00 <span class="title">Frölunda - Luleå</span> <span class="channel">C More Live</span></li></ul>"#,
        );
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.channel, "C More Live");
        assert!(!event.is_live);

        let html = Html::parse_fragment("<ul><li>21:00 Just nu: Sverige - Norge TV4 Sport Live</li></ul>");
        let event = parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).unwrap();
        assert_eq!(event.channel, "TV4 Sport Live");
        assert!(event.is_live);
    }

    #[test]
    fn test_fragment_without_time_or_title_is_dropped() {
        let html = Html::parse_fragment("<ul><li>Sportnytt</li></ul>");
        assert!(parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).is_none());

        let html = Html::parse_fragment("<ul><li>18:00 TV4</li></ul>");
        assert!(parse_candidate(&TEST_PROFILE, first_li(&html), date(), None).is_none());
    }

    #[test]
    fn test_scan_skips_nested_and_short() {
        let html = Html::parse_document(
            r#"<div id="outer">
                <div id="a">18:00 Premier League: Arsenal - Chelsea
                    <div id="nested">18:00 Arsenal - Chelsea again here</div>
                </div>
                <div id="short">18:00 kort</div>
            </div>"#,
        );
        let found = scan_time_candidates(&html);
        let ids: Vec<_> = found.iter().filter_map(|el| el.value().attr("id")).collect();
        assert_eq!(ids, vec!["outer"]);
    }

    #[test]
    fn test_scan_stops_at_candidate_cap() {
        let rows: String = (0..150)
            .map(|i| format!("<div>18:00 Match nummer {i} i serien</div>"))
            .collect();
        let html = Html::parse_document(&format!("<section>{rows}</section>"));
        let found = scan_time_candidates(&html);
        assert_eq!(found.len(), MAX_SCAN_CANDIDATES);
        assert_eq!(visible_text(found[0]), "18:00 Match nummer 0 i serien");
    }

    #[test]
    fn test_scan_skips_oversized_text() {
        let long = format!("<div>18:00 {}</div>", "Lång beskrivning av sändningen. ".repeat(20));
        let html = Html::parse_document(&long);
        assert!(scan_time_candidates(&html).is_empty());

        let html = Html::parse_document("<div>18:00 Lagom lång rad om matchen</div>");
        assert_eq!(scan_time_candidates(&html).len(), 1);
    }

    #[test]
    fn test_nested_candidates_collapse_by_id() {
        let html = Html::parse_fragment(
            r#"<ul><li class="outer"><span class="title">AIK - Djurgården</span> 19:00
                <ul><li class="inner"><span class="title">AIK - Djurgården</span> 19:00</li></ul>
            </li></ul>"#,
        );
        let events: Vec<_> = html
            .select(&css("li"))
            .filter_map(|li| parse_candidate(&TEST_PROFILE, li, date(), None))
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(first_unique(events).len(), 1);
    }

    #[test]
    fn test_plausible_title() {
        assert_eq!(plausible_title("  AIK   -  Hammarby "), Some("AIK - Hammarby".to_string()));
        assert_eq!(plausible_title("18:00"), None);
        assert_eq!(plausible_title("AIK"), None);
    }

    #[test]
    fn test_strip_time_and_channel() {
        assert_eq!(
            strip_time_and_channel("18:00 Allsvenskan: IFK Göteborg - AIK TV4 Sport"),
            "Allsvenskan: IFK Göteborg - AIK"
        );
        assert_eq!(strip_time_and_channel("9.30-11.00 Skidskytte Kanal 5"), "Skidskytte");
    }
}
