//! TVmatchen.nu schedule scraper.
//!
//! TVmatchen renders match listings with the two teams in separate elements,
//! so the title chain prefers a team container (or an explicit home/away
//! pair) over a generic title element. Discovery order:
//!
//! | Pass | Candidates |
//! |------|------------|
//! | 1 | Items inside sport/category sections, hinted sections first |
//! | 2 | Match-like containers anywhere in the page |
//! | 3 | Table rows with at least two cells |
//!
//! Fragments with fewer than ten characters of visible text are skipped.

use super::SourceAdapter;
use super::layout::{
    Extractor, Profile, channel_in_text, channel_slot_text, css, first_unique, joined_text,
    league_in_text, league_slot, parse_candidate, plausible_title, section_sport, select_first,
    strip_time_and_channel, visible_text,
};
use super::net::{FetchError, HttpFetcher};
use crate::models::SportEvent;
use chrono::{DateTime, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

pub const NAME: &str = "tvmatchen";
pub const BASE_URL: &str = "https://www.tvmatchen.nu";

const MAX_TITLE_LEN: usize = 80;

static SECTIONS: Lazy<Selector> = Lazy::new(|| {
    css(".sport-section, .category, .sport-category, [class*='sport'], section")
});
static SECTION_ITEMS: Lazy<Selector> = Lazy::new(|| {
    css(".match, .event, .game, .item, li, tr, [class*='match'], [class*='event']")
});
static EVENT_CONTAINERS: Lazy<Selector> = Lazy::new(|| {
    css(".match, .event, .game, .broadcast, .listing-item, .schedule-item, tr, li.match-item, article")
});
static TABLE_ROWS: Lazy<Selector> = Lazy::new(|| css("table tr"));
static CELL: Lazy<Selector> = Lazy::new(|| css("td"));

static TEAMS_SLOT: Lazy<Selector> = Lazy::new(|| {
    css(".teams, .match-teams, .home-away, [class*='team'], [class*='match']")
});
static HOME_SLOT: Lazy<Selector> = Lazy::new(|| css(".home, .home-team, .team-home, .team1"));
static AWAY_SLOT: Lazy<Selector> = Lazy::new(|| css(".away, .away-team, .team-away, .team2"));
static TITLE_SLOT: Lazy<Selector> = Lazy::new(|| {
    css(".title, .event-title, .match-title, h3, h4, .name, strong")
});

/// Break point for over-long free-text titles: the first dash, pipe or comma
/// after at least twenty characters.
static TITLE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.{20,80}?)(?:\s*[-–|,]|\s{2,})").expect("valid regex"));
static BARE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[.:]\d{2}$").expect("valid regex"));

const TEAM_GLUE: &[&str] = &["-", "–", "—", "vs", "v", "mot"];

/// Team names inside a container, joined as `Home - Away`. Separator glyphs
/// and bare times rendered as their own nodes are left out.
fn teams_slot(el: ElementRef<'_>, _text: &str) -> Option<String> {
    let slot = select_first(el, &TEAMS_SLOT)?;
    let names = slot
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter(|piece| !TEAM_GLUE.contains(&piece.to_lowercase().as_str()))
        .filter(|piece| !BARE_TIME.is_match(piece))
        .collect::<Vec<_>>()
        .join(" - ");
    (names.chars().count() > 3).then_some(names)
}

fn home_away_slots(el: ElementRef<'_>, _text: &str) -> Option<String> {
    let home = visible_text(select_first(el, &HOME_SLOT)?);
    let away = visible_text(select_first(el, &AWAY_SLOT)?);
    (!home.is_empty() && !away.is_empty()).then(|| format!("{home} - {away}"))
}

fn title_slot(el: ElementRef<'_>, _text: &str) -> Option<String> {
    select_first(el, &TITLE_SLOT).and_then(|slot| plausible_title(&joined_text(slot, " ")))
}

fn free_text_title(_el: ElementRef<'_>, text: &str) -> Option<String> {
    Some(cap_at_break(strip_time_and_channel(text), MAX_TITLE_LEN))
}

fn cap_at_break(title: String, max: usize) -> String {
    if title.chars().count() <= max {
        return title;
    }
    match TITLE_BREAK.captures(&title).and_then(|caps| caps.get(1)) {
        Some(head) => head.as_str().trim().to_string(),
        None => title.chars().take(max).collect(),
    }
}

const TITLES: &[Extractor] = &[teams_slot, home_away_slots, title_slot, free_text_title];
const CHANNELS: &[Extractor] = &[channel_slot_text, channel_in_text];
const LEAGUES: &[Extractor] = &[league_slot, league_in_text];

pub static PROFILE: Profile = Profile {
    source: NAME,
    base_url: BASE_URL,
    unknown_channel: "Okänd kanal",
    min_text_len: 10,
    titles: TITLES,
    channels: CHANNELS,
    leagues: LEAGUES,
};

/// Parse a TVmatchen page into events dated on `date`.
pub fn parse_document(html: &str, date: NaiveDate) -> Vec<SportEvent> {
    let document = Html::parse_document(html);

    let mut sections: Vec<_> = document
        .select(&SECTIONS)
        .map(|section| (section, section_sport(section)))
        .collect();
    sections.sort_by_key(|(_, hint)| hint.is_none());

    let mut events: Vec<SportEvent> = sections
        .iter()
        .flat_map(|&(section, hint)| {
            section
                .select(&SECTION_ITEMS)
                .filter(move |item| item.id() != section.id())
                .filter_map(move |item| parse_candidate(&PROFILE, item, date, hint))
        })
        .collect();

    if events.is_empty() {
        events = document
            .select(&EVENT_CONTAINERS)
            .filter_map(|container| parse_candidate(&PROFILE, container, date, None))
            .collect();
    }

    if events.is_empty() {
        debug!("No match containers; falling back to table rows");
        events = document
            .select(&TABLE_ROWS)
            .filter(|row| row.select(&CELL).count() >= 2)
            .filter_map(|row| parse_candidate(&PROFILE, row, date, None))
            .collect();
    }

    let events = first_unique(events);
    debug!(count = events.len(), "TVmatchen: parsed events");
    events
}

/// Adapter for <https://www.tvmatchen.nu>.
#[derive(Debug)]
pub struct TvMatchen {
    fetcher: HttpFetcher,
}

impl TvMatchen {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
        })
    }
}

impl SourceAdapter for TvMatchen {
    fn name(&self) -> &'static str {
        NAME
    }

    #[instrument(level = "info", skip(self), fields(source = NAME))]
    async fn fetch_events(&self, date: NaiveDate) -> Result<Vec<SportEvent>, FetchError> {
        let html = self.fetcher.get_html(BASE_URL).await?;
        let events = parse_document(&html, date);
        info!(count = events.len(), "Parsed TVmatchen schedule");
        Ok(events)
    }

    fn last_fetch(&self) -> Option<DateTime<Local>> {
        self.fetcher.state().last_fetch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_team_container_title() {
        let html = r#"
            <html><body>
              <div class="sport-section" data-sport="fotboll">
                <div class="match">
                  <span class="time">18:00</span>
                  <div class="teams"><span>IFK Göteborg</span> - <span>AIK</span></div>
                  <span class="league">Allsvenskan</span>
                  <span class="channel"><img src="/img/tv4.svg" alt="TV4">TV4 Play</span>
                </div>
              </div>
            </body></html>"#;

        let events = parse_document(html, date());
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.title, "IFK Göteborg - AIK");
        assert_eq!(event.home_team.as_deref(), Some("IFK Göteborg"));
        assert_eq!(event.away_team.as_deref(), Some("AIK"));
        assert_eq!(event.league.as_deref(), Some("Allsvenskan"));
        assert_eq!(event.channel, "TV4 Play");
        assert_eq!(event.sport, "football");
        assert_eq!(event.source, NAME);
        assert_eq!(
            event.channel_logo.as_deref(),
            Some("https://www.tvmatchen.nu/img/tv4.svg")
        );
    }

    #[test]
    fn test_home_away_pair_title() {
        let html = r#"
            <html><body>
              <article>
                <p>20:00</p>
                <p class="home">Brynäs</p><p class="away">HV71</p>
                <p class="channel">C More Hockey</p>
              </article>
            </body></html>"#;

        let events = parse_document(html, date());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Brynäs - HV71");
        assert_eq!(events[0].away_team.as_deref(), Some("HV71"));
        assert_eq!(events[0].channel, "C More Hockey");
    }

    #[test]
    fn test_unknown_channel_and_live_tokens() {
        let html = r#"
            <html><body>
              <article>
                <p>20:00</p>
                <p class="home">Brynäs</p><p class="away">HV71</p>
                <p>Direktsändning</p>
              </article>
            </body></html>"#;
        let events = parse_document(html, date());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].channel, "Okänd kanal");
        assert!(events[0].is_live);

        let html = r#"
            <html><body>
              <article>
                <p>20:00</p>
                <p class="home">Brynäs</p><p class="away">HV71</p>
                <p class="channel">C More Live</p>
              </article>
            </body></html>"#;
        let events = parse_document(html, date());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].channel, "C More Live");
        assert!(!events[0].is_live);
    }

    #[test]
    fn test_table_row_fallback() {
        let html = r#"
            <html><body>
              <table>
                <tr><th>Tid</th><th>Program</th></tr>
                <tr><td>21:00</td><td><strong>NBA: Lakers - Celtics</strong></td><td>Viaplay</td></tr>
                <tr><td>--</td></tr>
              </table>
            </body></html>"#;

        let events = parse_document(html, date());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "NBA: Lakers - Celtics");
        assert_eq!(events[0].league.as_deref(), Some("NBA"));
        assert_eq!(events[0].sport, "basketball");
        assert_eq!(events[0].channel, "Viaplay");
    }

    #[test]
    fn test_short_fragments_are_skipped() {
        let html = r#"<html><body><article>19:00 AIK</article></body></html>"#;
        assert!(parse_document(html, date()).is_empty());
    }

    #[test]
    fn test_cap_at_break() {
        let long = format!("Fotboll: Allsvenskan, omgång 29 med alla matcher {}", "x".repeat(60));
        assert_eq!(cap_at_break(long, MAX_TITLE_LEN), "Fotboll: Allsvenskan");

        let unbroken = "z".repeat(120);
        assert_eq!(cap_at_break(unbroken, MAX_TITLE_LEN).chars().count(), MAX_TITLE_LEN);
    }
}
