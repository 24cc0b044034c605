//! TV-guide source adapters.
//!
//! Each adapter fetches one Swedish sport TV-guide page and turns it into
//! normalized [`SportEvent`]s. Every adapter follows the same two-phase
//! pattern:
//!
//! 1. **Fetching**: one HTTP GET through its own [`net::HttpFetcher`]
//! 2. **Parsing**: synchronous candidate discovery and field extraction via
//!    [`layout::parse_candidate`]
//!
//! # Supported Sources
//!
//! | Source | Module | Title strategy | Notes |
//! |--------|--------|----------------|-------|
//! | TVsporten | [`tvsporten`] | Title element, then free text (100 chars) | Time-token scan as last resort |
//! | TVmatchen | [`tvmatchen`] | Team container, home/away pair, title element, free text (80 chars) | Table-row fallback |
//!
//! # Common Patterns
//!
//! Each source module exports:
//! - `parse_document(html, date)`: pure parser, usable on fixture markup
//! - an adapter struct implementing [`SourceAdapter`]
//!
//! Sources are enumerated statically by [`Source`] and [`registry`]; the
//! aggregator runs them concurrently and isolates their failures.

pub mod layout;
pub mod net;
pub mod tvmatchen;
pub mod tvsporten;

pub use net::FetchError;

use crate::models::SportEvent;
use chrono::{DateTime, Local, NaiveDate};
use std::future::Future;
use tvmatchen::TvMatchen;
use tvsporten::TvSporten;

/// A TV-guide source that can produce the day's broadcasts.
///
/// Implementations must not let one bad fragment fail the whole fetch;
/// unparseable fragments are dropped and only transport failures surface as
/// [`FetchError`].
pub trait SourceAdapter: Send + Sync {
    /// Stable adapter name, used as the provider-status key and event source.
    fn name(&self) -> &'static str;

    /// Fetch and parse the schedule, dating bare times on `date`.
    fn fetch_events(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SportEvent>, FetchError>> + Send;

    /// Time of the last successful fetch, kept across cycles.
    fn last_fetch(&self) -> Option<DateTime<Local>>;
}

/// Every source this crate knows about.
#[derive(Debug)]
pub enum Source {
    TvSporten(TvSporten),
    TvMatchen(TvMatchen),
}

impl SourceAdapter for Source {
    fn name(&self) -> &'static str {
        match self {
            Source::TvSporten(source) => source.name(),
            Source::TvMatchen(source) => source.name(),
        }
    }

    async fn fetch_events(&self, date: NaiveDate) -> Result<Vec<SportEvent>, FetchError> {
        match self {
            Source::TvSporten(source) => source.fetch_events(date).await,
            Source::TvMatchen(source) => source.fetch_events(date).await,
        }
    }

    fn last_fetch(&self) -> Option<DateTime<Local>> {
        match self {
            Source::TvSporten(source) => source.last_fetch(),
            Source::TvMatchen(source) => source.last_fetch(),
        }
    }
}

/// Build one adapter per supported source.
///
/// # Errors
///
/// Fails only if an HTTP client cannot be constructed.
pub fn registry() -> Result<Vec<Source>, FetchError> {
    Ok(vec![
        Source::TvSporten(TvSporten::new()?),
        Source::TvMatchen(TvMatchen::new()?),
    ])
}
