//! Team-name extraction from broadcast titles.
//!
//! Titles come in two shapes: explicit (`"IFK Göteborg - AIK"`,
//! `"Frölunda mot Luleå"`) and concatenated, where the page renders the two
//! team names in adjacent elements without whitespace (`"SverigeFinland"`,
//! `"PortoMalmö FF"`). Concatenated titles are split on the lowercase →
//! uppercase boundary between two capitalized name runs.

use once_cell::sync::Lazy;
use regex::Regex;

/// Explicit home/away separators, tried in this order.
pub const SEPARATORS: &[&str] = &[" - ", " – ", " — ", " vs ", " mot ", " v "];

static TRAILING_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("valid regex"));

/// Two capitalized-word runs glued together: `SverigeFinland`.
static CONCATENATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-ZÅÄÖ][a-zåäöé]+(?:\s+[A-ZÅÄÖ][a-zåäöé.]+)*)([A-ZÅÄÖ][a-zåäöé]+.*)$")
        .expect("valid regex")
});

/// Same as [`CONCATENATED`] but each run may start with a 2–4 letter
/// uppercase abbreviation: `FC RosengårdIF Brommapojkarna`.
static CONCATENATED_ABBREV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:[A-Z]{2,4}\s)?[A-ZÅÄÖ][a-zåäöé]+(?:\s+[A-ZÅÄÖ][a-zåäöé.]+)*)((?:[A-Z]{2,4}\s)?[A-ZÅÄÖ][a-zåäöé]+.*)$",
    )
    .expect("valid regex")
});

fn strip_trailing_paren(part: &str) -> String {
    TRAILING_PAREN.replace(part.trim(), "").trim().to_string()
}

fn has_separator(title: &str) -> bool {
    SEPARATORS.iter().any(|sep| title.contains(sep))
}

fn split_concatenated(re: &Regex, title: &str) -> Option<(String, String)> {
    let caps = re.captures(title)?;
    let home = caps.get(1)?.as_str().trim();
    let away = caps.get(2)?.as_str().trim();
    (home.chars().count() >= 2 && away.chars().count() >= 2)
        .then(|| (home.to_string(), away.to_string()))
}

/// Extract `(home, away)` team names from a title.
///
/// Returns `(None, None)` when the title does not look like a match-up;
/// ambiguous titles are never guessed.
///
/// # Examples
///
/// ```
/// use sport_sync::classifier::teams::extract_teams;
///
/// assert_eq!(
///     extract_teams("Sverige - Finland"),
///     (Some("Sverige".to_string()), Some("Finland".to_string()))
/// );
/// assert_eq!(extract_teams("Bra program"), (None, None));
/// ```
pub fn extract_teams(title: &str) -> (Option<String>, Option<String>) {
    for sep in SEPARATORS {
        if let Some((home, away)) = title.split_once(sep) {
            return (Some(strip_trailing_paren(home)), Some(strip_trailing_paren(away)));
        }
    }

    let title = title.trim();
    split_concatenated(&CONCATENATED, title)
        .or_else(|| split_concatenated(&CONCATENATED_ABBREV, title))
        .map(|(home, away)| (Some(home), Some(away)))
        .unwrap_or((None, None))
}

/// Rewrite a concatenated title to the canonical `"Home - Away"` form.
///
/// Titles that already contain a separator, or for which no teams were found,
/// are returned unchanged.
pub fn format_title_with_teams(title: &str, home: Option<&str>, away: Option<&str>) -> String {
    match (home, away) {
        (Some(home), Some(away)) if !has_separator(title) => format!("{home} - {away}"),
        _ => title.to_string(),
    }
}
