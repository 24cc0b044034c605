//! Keyword-based sport classification.
//!
//! Broadcast titles, section headers and CSS class names are matched against
//! an ordered table of lowercase keyword phrases (Swedish and English). The
//! table is sorted once by descending phrase length so that specific phrases
//! such as `"champions league"` or `"hockeyallsvenskan"` are tried before the
//! generic ones they contain.

use once_cell::sync::Lazy;

/// Sport key returned when nothing matches.
pub const OTHER: &str = "other";

/// Keyword phrase → sport key. Order here is irrelevant; see [`SORTED_KEYWORDS`].
const SPORT_KEYWORDS: &[(&str, &str)] = &[
    // Football
    ("fotboll", "football"),
    ("football", "football"),
    ("soccer", "football"),
    ("premier league", "football"),
    ("la liga", "football"),
    ("serie a", "football"),
    ("bundesliga", "football"),
    ("ligue 1", "football"),
    ("eredivisie", "football"),
    ("allsvenskan", "football"),
    ("superettan", "football"),
    ("damallsvenskan", "football"),
    ("champions league", "football"),
    ("europa league", "football"),
    ("conference league", "football"),
    ("fotbolls-vm", "football"),
    ("fotbolls-em", "football"),
    ("vm-kval fotboll", "football"),
    ("em-kval fotboll", "football"),
    ("nations league", "football"),
    ("vm i fotboll", "football"),
    ("em i fotboll", "football"),
    ("svenska cupen", "football"),
    ("fa cup", "football"),
    // Hockey
    ("ishockey", "hockey"),
    ("ice hockey", "hockey"),
    ("hockey", "hockey"),
    ("nhl", "hockey"),
    ("shl", "hockey"),
    ("hockeyallsvenskan", "hockey"),
    ("hockeyettan", "hockey"),
    ("tre kronor", "hockey"),
    ("khl", "hockey"),
    ("chl", "hockey"),
    // Basketball
    ("basket", "basketball"),
    ("basketball", "basketball"),
    ("nba", "basketball"),
    ("wnba", "basketball"),
    ("euroleague", "basketball"),
    ("basketligan", "basketball"),
    // Tennis
    ("tennis", "tennis"),
    ("wimbledon", "tennis"),
    ("us open tennis", "tennis"),
    ("australian open", "tennis"),
    ("roland garros", "tennis"),
    ("davis cup", "tennis"),
    ("atp", "tennis"),
    ("wta", "tennis"),
    // Golf
    ("golf", "golf"),
    ("pga", "golf"),
    ("lpga", "golf"),
    ("ryder cup", "golf"),
    ("solheim cup", "golf"),
    ("dp world tour", "golf"),
    // Handball
    ("handboll", "handball"),
    ("handball", "handball"),
    ("handbollsligan", "handball"),
    // Motorsport
    ("formel 1", "motorsport"),
    ("formel 2", "motorsport"),
    ("formel 3", "motorsport"),
    ("formula 1", "motorsport"),
    ("f1", "motorsport"),
    ("motogp", "motorsport"),
    ("moto2", "motorsport"),
    ("moto3", "motorsport"),
    ("rally", "motorsport"),
    ("rallycross", "motorsport"),
    ("nascar", "motorsport"),
    ("indycar", "motorsport"),
    ("dtm", "motorsport"),
    ("formel e", "motorsport"),
    ("wrc", "motorsport"),
    ("speedway", "motorsport"),
    ("motorsport", "motorsport"),
    // Cycling
    ("cykling", "cycling"),
    ("cycling", "cycling"),
    ("tour de france", "cycling"),
    ("giro", "cycling"),
    ("vuelta", "cycling"),
    ("paris-roubaix", "cycling"),
    // Winter sports
    ("skidor", "skiing"),
    ("längdskidor", "skiing"),
    ("längdskidåkning", "skiing"),
    ("world cup skidor", "skiing"),
    ("cross-country", "skiing"),
    ("backhoppning", "skiing"),
    ("vasaloppet", "skiing"),
    ("skidskytte", "biathlon"),
    ("biathlon", "biathlon"),
    ("alpint", "alpine"),
    ("slalom", "alpine"),
    ("störtlopp", "alpine"),
    ("super-g", "alpine"),
    ("storslalom", "alpine"),
    ("utför", "alpine"),
    ("curling", "curling"),
    ("vintersport", "winter_sports"),
    ("konståkning", "winter_sports"),
    ("skridsko", "winter_sports"),
    // Athletics
    ("friidrott", "athletics"),
    ("friidrotts", "athletics"),
    ("athletics", "athletics"),
    ("maraton", "athletics"),
    ("marathon", "athletics"),
    ("diamond league", "athletics"),
    // Swimming
    ("simning", "swimming"),
    ("swimming", "swimming"),
    ("sim-", "swimming"),
    // Combat
    ("boxning", "boxing"),
    ("boxing", "boxing"),
    ("tungviktsboxning", "boxing"),
    ("mma", "mma"),
    ("ufc", "mma"),
    // American sports
    ("nfl", "american_football"),
    ("amerikansk fotboll", "american_football"),
    ("american football", "american_football"),
    ("super bowl", "american_football"),
    ("mlb", "baseball"),
    ("baseball", "baseball"),
    // Other
    ("volleyboll", "volleyball"),
    ("volleyball", "volleyball"),
    ("beachvolley", "volleyball"),
    ("bordtennis", "table_tennis"),
    ("table tennis", "table_tennis"),
    ("badminton", "badminton"),
    ("rugby", "rugby"),
    ("trav", "horse_racing"),
    ("galopp", "horse_racing"),
    ("v75", "horse_racing"),
    ("horse racing", "horse_racing"),
    ("snooker", "snooker"),
    ("biljard", "snooker"),
    ("dart", "darts"),
    ("padel", "padel"),
    ("premier padel", "padel"),
    ("innebandy", "floorball"),
    ("floorball", "floorball"),
    ("bandy", "bandy"),
    ("elitserien i bandy", "bandy"),
    ("e-sport", "esports"),
    ("esport", "esports"),
    ("counter-strike", "esports"),
    ("league of legends", "esports"),
    ("dota 2", "esports"),
    ("segling", "sailing"),
    ("sailing", "sailing"),
];

/// Keyword table sorted by descending phrase length (in characters).
///
/// The sort is stable, so equal-length phrases keep their table order.
static SORTED_KEYWORDS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut keywords = SPORT_KEYWORDS.to_vec();
    keywords.sort_by_key(|(keyword, _)| std::cmp::Reverse(keyword.chars().count()));
    keywords
});

/// Classify free text into a sport key.
///
/// Returns the sport of the longest keyword that occurs (case-insensitively)
/// anywhere in `text`, or [`OTHER`] when none does.
///
/// # Examples
///
/// ```
/// use sport_sync::classifier::sport::classify;
///
/// assert_eq!(classify("Champions League: Real Madrid - Milan"), "football");
/// assert_eq!(classify("Hockeyallsvenskan"), "hockey");
/// assert_eq!(classify("Bra program"), "other");
/// ```
pub fn classify(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    SORTED_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, sport)| *sport)
        .unwrap_or(OTHER)
}

/// Classify `text`, treating [`OTHER`] as "no opinion".
pub fn detect(text: &str) -> Option<&'static str> {
    match classify(text) {
        OTHER => None,
        sport => Some(sport),
    }
}

/// Display metadata for a sport key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SportInfo {
    /// Swedish display name.
    pub name: &'static str,
    /// Material Design icon identifier.
    pub icon: &'static str,
    pub emoji: &'static str,
}

const SPORT_INFO: &[(&str, SportInfo)] = &[
    ("football", SportInfo { name: "Fotboll", icon: "mdi:soccer", emoji: "⚽" }),
    ("hockey", SportInfo { name: "Ishockey", icon: "mdi:hockey-puck", emoji: "🏒" }),
    ("basketball", SportInfo { name: "Basket", icon: "mdi:basketball", emoji: "🏀" }),
    ("tennis", SportInfo { name: "Tennis", icon: "mdi:tennis", emoji: "🎾" }),
    ("golf", SportInfo { name: "Golf", icon: "mdi:golf", emoji: "⛳" }),
    ("handball", SportInfo { name: "Handboll", icon: "mdi:handball", emoji: "🤾" }),
    ("motorsport", SportInfo { name: "Motorsport", icon: "mdi:racing-helmet", emoji: "🏎️" }),
    ("cycling", SportInfo { name: "Cykling", icon: "mdi:bike", emoji: "🚴" }),
    ("skiing", SportInfo { name: "Skidor", icon: "mdi:ski", emoji: "⛷️" }),
    ("biathlon", SportInfo { name: "Skidskytte", icon: "mdi:target", emoji: "🎯" }),
    ("alpine", SportInfo { name: "Alpint", icon: "mdi:ski", emoji: "⛷️" }),
    ("athletics", SportInfo { name: "Friidrott", icon: "mdi:run", emoji: "🏃" }),
    ("swimming", SportInfo { name: "Simning", icon: "mdi:swim", emoji: "🏊" }),
    ("boxing", SportInfo { name: "Boxning", icon: "mdi:boxing-glove", emoji: "🥊" }),
    ("mma", SportInfo { name: "MMA", icon: "mdi:karate", emoji: "🥋" }),
    ("american_football", SportInfo { name: "Amerikansk fotboll", icon: "mdi:football", emoji: "🏈" }),
    ("baseball", SportInfo { name: "Baseball", icon: "mdi:baseball", emoji: "⚾" }),
    ("volleyball", SportInfo { name: "Volleyboll", icon: "mdi:volleyball", emoji: "🏐" }),
    ("table_tennis", SportInfo { name: "Bordtennis", icon: "mdi:table-tennis", emoji: "🏓" }),
    ("badminton", SportInfo { name: "Badminton", icon: "mdi:badminton", emoji: "🏸" }),
    ("rugby", SportInfo { name: "Rugby", icon: "mdi:rugby", emoji: "🏉" }),
    ("horse_racing", SportInfo { name: "Trav/Galopp", icon: "mdi:horse", emoji: "🏇" }),
    ("snooker", SportInfo { name: "Snooker/Biljard", icon: "mdi:billiards", emoji: "🎱" }),
    ("darts", SportInfo { name: "Dart", icon: "mdi:bullseye-arrow", emoji: "🎯" }),
    ("padel", SportInfo { name: "Padel", icon: "mdi:tennis", emoji: "🎾" }),
    ("floorball", SportInfo { name: "Innebandy", icon: "mdi:hockey-sticks", emoji: "🏑" }),
    ("bandy", SportInfo { name: "Bandy", icon: "mdi:hockey-sticks", emoji: "🏑" }),
    ("curling", SportInfo { name: "Curling", icon: "mdi:curling", emoji: "🥌" }),
    ("esports", SportInfo { name: "E-sport", icon: "mdi:controller", emoji: "🎮" }),
    ("sailing", SportInfo { name: "Segling", icon: "mdi:sail-boat", emoji: "⛵" }),
    ("winter_sports", SportInfo { name: "Vintersport", icon: "mdi:snowflake", emoji: "❄️" }),
];

const OTHER_INFO: SportInfo = SportInfo {
    name: "Övrigt",
    icon: "mdi:trophy",
    emoji: "🏆",
};

/// Look up display metadata for a sport key; unknown keys map to "Övrigt".
pub fn sport_info(key: &str) -> SportInfo {
    SPORT_INFO
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, info)| *info)
        .unwrap_or(OTHER_INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults_to_other() {
        assert_eq!(classify(""), OTHER);
        assert_eq!(classify("Bra program"), OTHER);
        assert_eq!(detect("Nyheter"), None);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("ISHOCKEY: Frölunda - Luleå"), "hockey");
        assert_eq!(classify("Premier League"), "football");
    }

    #[test]
    fn test_longer_keyword_wins() {
        // "league of legends" must beat the shorter "league"-bearing phrases
        assert_eq!(classify("League of Legends Worlds, finals"), "esports");
        // "hockeyallsvenskan" contains "allsvenskan" (football)
        assert_eq!(classify("Hockeyallsvenskan: AIK - Modo"), "hockey");
        // "amerikansk fotboll" contains "fotboll"
        assert_eq!(classify("Amerikansk fotboll: NFL"), "american_football");
        // "skidskytte" beats anything shorter that co-occurs
        assert_eq!(classify("Skidskytte, världscupen i Östersund"), "biathlon");
    }

    #[test]
    fn test_champions_league_beats_league() {
        assert_eq!(classify("league night: champions league"), "football");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let text = "Tennis: ATP Stockholm Open";
        assert_eq!(classify(text), classify(text));
        assert_eq!(classify(text), "tennis");
    }

    #[test]
    fn test_sorted_keywords_descending() {
        let lengths: Vec<usize> = SORTED_KEYWORDS
            .iter()
            .map(|(k, _)| k.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(SORTED_KEYWORDS.len(), SPORT_KEYWORDS.len());
    }

    #[test]
    fn test_every_sport_has_info() {
        for (_, sport) in SPORT_KEYWORDS {
            assert_ne!(sport_info(sport), OTHER_INFO, "missing info for {sport}");
        }
        assert_eq!(sport_info("other").name, "Övrigt");
        assert_eq!(sport_info("quidditch").icon, "mdi:trophy");
    }
}
