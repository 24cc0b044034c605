//! TVsporten.nu schedule scraper.
//!
//! TVsporten lists today's broadcasts on its front page, usually grouped in
//! per-sport sections. Discovery runs in three passes and stops at the first
//! one that yields events:
//!
//! 1. Sport sections (`[class*='sport']`, `section`, ...) and the event-like
//!    items inside them; sections with a recognizable sport header go first
//! 2. A flat list of event-like containers anywhere in the page
//! 3. A scan of every block element holding a time token (at most
//!    [`MAX_SCAN_CANDIDATES`](super::layout::MAX_SCAN_CANDIDATES))

use super::SourceAdapter;
use super::layout::{
    Extractor, Profile, channel_in_text, channel_slot_known, compact_text, css, first_unique,
    league_in_text, league_slot, parse_candidate, plausible_title, scan_time_candidates,
    section_sport, select_first, strip_time_and_channel,
};
use super::net::{FetchError, HttpFetcher};
use crate::models::SportEvent;
use chrono::{DateTime, Local, NaiveDate};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

pub const NAME: &str = "tvsporten";
pub const BASE_URL: &str = "https://www.tvsporten.nu";

const MAX_TITLE_LEN: usize = 100;

static SECTIONS: Lazy<Selector> = Lazy::new(|| {
    css("[class*='sport'], [class*='category'], section, .sport-section, .category-section")
});
static SECTION_ITEMS: Lazy<Selector> = Lazy::new(|| {
    css(".event, .match, .broadcast, tr, li, [class*='event'], [class*='match']")
});
static EVENT_CONTAINERS: Lazy<Selector> = Lazy::new(|| {
    css(".event, .match, .broadcast, .schedule-item, .tv-event, .sport-event, article, \
         .listing-item, tr.event-row, .event-card")
});
static TITLE_SLOT: Lazy<Selector> = Lazy::new(|| {
    css(".title, .event-title, .match-title, .teams, h2, h3, h4, .name, [class*='title'], [class*='match']")
});

fn title_slot(el: ElementRef<'_>, _text: &str) -> Option<String> {
    select_first(el, &TITLE_SLOT).and_then(|slot| plausible_title(&compact_text(slot)))
}

fn free_text_title(_el: ElementRef<'_>, text: &str) -> Option<String> {
    Some(cap_at_separator(strip_time_and_channel(text), MAX_TITLE_LEN))
}

/// Shorten an over-long title at the first natural separator that leaves a
/// head of more than ten characters, else hard-cut at `max` characters.
fn cap_at_separator(title: String, max: usize) -> String {
    if title.chars().count() <= max {
        return title;
    }
    let head: String = title.chars().take(max).collect();
    for sep in [" - ", " | ", ", ", " – "] {
        if !head.contains(sep) {
            continue;
        }
        let mut parts = title.split(sep);
        let first = parts.next().unwrap_or_default();
        if first.chars().count() > 10 {
            return match parts.next() {
                Some(second) => format!("{first}{sep}{second}"),
                None => first.to_string(),
            };
        }
    }
    head
}

const TITLES: &[Extractor] = &[title_slot, free_text_title];
const CHANNELS: &[Extractor] = &[channel_slot_known, channel_in_text];
const LEAGUES: &[Extractor] = &[league_slot, league_in_text];

pub static PROFILE: Profile = Profile {
    source: NAME,
    base_url: BASE_URL,
    unknown_channel: "Okänd kanal",
    min_text_len: 0,
    titles: TITLES,
    channels: CHANNELS,
    leagues: LEAGUES,
};

/// Parse a TVsporten page into events dated on `date`.
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
        let mut containers: Vec<_> = document.select(&EVENT_CONTAINERS).collect();
        if containers.is_empty() {
            debug!("No event containers; scanning for time tokens");
            containers = scan_time_candidates(&document);
        }
        events = containers
            .into_iter()
            .filter_map(|container| parse_candidate(&PROFILE, container, date, None))
            .collect();
    }

    let events = first_unique(events);
    debug!(count = events.len(), "TVsporten: parsed events");
    events
}

/// Adapter for <https://www.tvsporten.nu>.
#[derive(Debug)]
pub struct TvSporten {
    fetcher: HttpFetcher,
}

impl TvSporten {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: HttpFetcher::new()?,
        })
    }
}

impl SourceAdapter for TvSporten {
    fn name(&self) -> &'static str {
        NAME
    }

    #[instrument(level = "info", skip(self), fields(source = NAME))]
    async fn fetch_events(&self, date: NaiveDate) -> Result<Vec<SportEvent>, FetchError> {
        let html = self.fetcher.get_html(BASE_URL).await?;
        let events = parse_document(&html, date);
        info!(count = events.len(), "Parsed TVsporten schedule");
        Ok(events)
    }

    fn last_fetch(&self) -> Option<DateTime<Local>> {
        self.fetcher.state().last_fetch
    }
}
