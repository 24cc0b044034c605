//! Refresh cycle: fan out to every source, fan in, merge, publish.
//!
//! Each adapter runs in its own tokio task. A source that fails (HTTP error,
//! timeout, or even a panic inside its task) is recorded with an error
//! status and contributes no events; the other sources are unaffected and
//! the cycle always completes. Nothing is published until every task has
//! finished.

use crate::dedup::dedup;
use crate::models::{ProviderStatus, SportEvent};
use crate::scrapers::{FetchError, SourceAdapter};
use crate::store::{EventStore, Snapshot};
use chrono::{Local, NaiveDate};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

/// Raw outcome of one cycle, before de-duplication.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub events: Vec<SportEvent>,
    pub provider_status: BTreeMap<String, ProviderStatus>,
    pub elapsed: Duration,
}

/// Run every adapter concurrently against `reference` and collect the
/// results.
///
/// # Arguments
///
/// * `adapters` - The sources to query; each is moved into its own task
/// * `reference` - Date on which bare `HH:MM` times are placed
///
/// # Returns
///
/// All events in adapter order plus one status per adapter name.
#[instrument(level = "info", skip_all, fields(sources = adapters.len(), reference = %reference))]
pub async fn run_cycle<A>(adapters: &[Arc<A>], reference: NaiveDate) -> CycleReport
where
    A: SourceAdapter + 'static,
{
    let started = Instant::now();

    let tasks = adapters.iter().map(|adapter| {
        let name = adapter.name();
        let adapter = Arc::clone(adapter);
        let handle = tokio::spawn(async move {
            let events = adapter.fetch_events(reference).await?;
            Ok::<_, FetchError>((events, adapter.last_fetch()))
        });
        async move { (name, handle.await) }
    });

    let mut events = Vec::new();
    let mut provider_status = BTreeMap::new();

    for (name, joined) in join_all(tasks).await {
        let status = match joined {
            Ok(Ok((found, last_fetch))) => {
                info!(source = name, count = found.len(), "Source fetched");
                let status = ProviderStatus::ok(found.len(), last_fetch);
                events.extend(found);
                status
            }
            Ok(Err(e)) => {
                error!(source = name, error = %e, "Source fetch failed");
                ProviderStatus::error(e.to_string())
            }
            Err(e) => {
                error!(source = name, error = %e, "Source task did not complete");
                ProviderStatus::error(format!("source task failed: {e}"))
            }
        };
        if provider_status.insert(name.to_string(), status).is_some() {
            warn!(source = name, "Duplicate source name; keeping the later status");
        }
    }

    let elapsed = started.elapsed();
    info!(events = events.len(), ?elapsed, "Cycle complete");
    CycleReport {
        events,
        provider_status,
        elapsed,
    }
}

/// Run one cycle, de-duplicate its events and publish the result to `store`.
///
/// Returns the snapshot that was published.
#[instrument(level = "info", skip_all, fields(reference = %reference))]
pub async fn refresh<A>(adapters: &[Arc<A>], store: &EventStore, reference: NaiveDate) -> Arc<Snapshot>
where
    A: SourceAdapter + 'static,
{
    let report = run_cycle(adapters, reference).await;
    let raw = report.events.len();
    let events = dedup(report.events);
    info!(raw, merged = events.len(), "Publishing snapshot");

    store.replace(Snapshot {
        events,
        provider_status: report.provider_status,
        last_update: Some(Local::now()),
    })
}
