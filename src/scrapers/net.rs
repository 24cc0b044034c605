//! HTTP transport shared by the source adapters.
//!
//! Each adapter owns one [`HttpFetcher`]. A fetch is a single GET with a
//! browser-like User-Agent, a Swedish language preference and a 30 second
//! timeout. Anything but `200 OK` is reported as a [`FetchError`]; the
//! fetcher also remembers the time of its last successful fetch and its last
//! error across cycles.

use chrono::{DateTime, Local};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Per-request timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const SWEDISH_LANGUAGE: &str = "sv-SE,sv;q=0.9,en;q=0.8";

/// Transport-level failure of one source.
#[derive(Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    Client(reqwest::Error),
    /// Connection, timeout or body-read failure.
    Request { url: String, source: reqwest::Error },
    /// The server answered with something other than `200 OK`.
    Status { url: String, status: StatusCode },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Client(e) => write!(f, "failed to build HTTP client: {e}"),
            FetchError::Request { url, source } => write!(f, "request to {url} failed: {source}"),
            FetchError::Status { url, status } => write!(f, "HTTP {} from {url}", status.as_u16()),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Client(e) => Some(e),
            FetchError::Request { source, .. } => Some(source),
            FetchError::Status { .. } => None,
        }
    }
}

/// Outcome of the most recent fetches, kept across cycles.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub last_fetch: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

/// A configured HTTP client plus the fetch bookkeeping of one source.
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    state: Mutex<FetchState>,
}

impl HttpFetcher {
    /// Build a fetcher with browser-like default headers and [`FETCH_TIMEOUT`].
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(SWEDISH_LANGUAGE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            state: Mutex::new(FetchState::default()),
        })
    }

    /// Snapshot of the cross-cycle fetch state.
    pub fn state(&self) -> FetchState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut FetchState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut state);
    }

    /// Stamp a successful fetch and clear the error it recovers from.
    fn mark_success(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_fetch = Some(Local::now());
        state.last_error.take()
    }

    /// GET `url` and return the body as text.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        let result = self.try_get(url).await;
        match &result {
            Ok(body) => {
                debug!(bytes = body.len(), "Fetched page");
                if let Some(previous) = self.mark_success() {
                    info!(previous_error = %previous, "Source recovered");
                }
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                let message = e.to_string();
                self.record(|state| state.last_error = Some(message));
            }
        }
        result
    }

    async fn try_get(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let e = FetchError::Status {
            url: "https://www.tvsporten.nu".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(e.to_string(), "HTTP 503 from https://www.tvsporten.nu");
        assert!(e.source().is_none());
    }

    #[test]
    fn test_new_fetcher_has_clean_state() {
        let fetcher = HttpFetcher::new().unwrap();
        let state = fetcher.state();
        assert!(state.last_fetch.is_none());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_record_updates_state() {
        let fetcher = HttpFetcher::new().unwrap();
        fetcher.record(|state| state.last_error = Some("HTTP 500".to_string()));
        assert_eq!(fetcher.state().last_error.as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn test_success_clears_previous_error() {
        let fetcher = HttpFetcher::new().unwrap();
        fetcher.record(|state| state.last_error = Some("HTTP 500".to_string()));

        assert_eq!(fetcher.mark_success().as_deref(), Some("HTTP 500"));
        let state = fetcher.state();
        assert!(state.last_error.is_none());
        assert!(state.last_fetch.is_some());

        assert!(fetcher.mark_success().is_none());
    }
}
