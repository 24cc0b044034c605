//! # Sport Sync
//!
//! A refresh service that scrapes sport TV-guide pages, merges the listings
//! of every source into one schedule and publishes live, upcoming and
//! favorite views of it.
//!
//! ## Usage
//!
//! ```sh
//! sport_sync --once -j ./out --favorite-teams "AIK, Frölunda"
//! ```
//!
//! ## Architecture
//!
//! Each tick of the refresh loop:
//! 1. **Fetching**: every source is fetched and parsed in its own task
//! 2. **Merging**: events describing the same broadcast are de-duplicated
//! 3. **Publishing**: the snapshot is swapped into the store
//! 4. **Output**: the views are logged and optionally written as JSON

use chrono::Local;
use clap::Parser;
use sport_sync::aggregator;
use sport_sync::cli::Cli;
use sport_sync::config::Settings;
use sport_sync::models::FetchStatus;
use sport_sync::outputs::json;
use sport_sync::scrapers::{self, Source};
use sport_sync::store::EventStore;
use sport_sync::utils::ensure_writable_dir;
use sport_sync::views::SnapshotReport;
use std::error::Error;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("sport_sync starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = match Settings::load(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: the JSON output dir must be writable before the first cycle
    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let adapters: Vec<Arc<Source>> = scrapers::registry()?.into_iter().map(Arc::new).collect();
    let store = EventStore::new();
    info!(
        sources = adapters.len(),
        interval_secs = settings.interval.as_secs(),
        once = settings.once,
        "Refresh loop starting"
    );

    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = 0usize;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }

        publish_cycle(&adapters, &store, &settings).await;
        cycles += 1;

        if settings.once {
            break;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), cycles, "Execution complete");

    Ok(())
}

/// Refresh the store, evaluate every view and hand them to the outputs.
#[instrument(level = "info", skip_all)]
async fn publish_cycle(adapters: &[Arc<Source>], store: &EventStore, settings: &Settings) {
    let snapshot = aggregator::refresh(adapters, store, Local::now().date_naive()).await;

    for (source, status) in &snapshot.provider_status {
        if status.status == FetchStatus::Error {
            warn!(
                source = %source,
                error = status.error.as_deref().unwrap_or_default(),
                "Source contributed no events this cycle"
            );
        }
    }

    let report = SnapshotReport::build(
        &snapshot,
        Local::now().naive_local(),
        settings.upcoming_hours,
        &settings.favorites,
    );
    info!(
        events = report.events.len(),
        live = report.live.len(),
        upcoming = report.upcoming.len(),
        favorites = report.favorites.len(),
        "Snapshot published"
    );
    for event in &report.upcoming {
        debug!(
            start = %event.start_time.format("%H:%M"),
            sport = %event.sport_name,
            channel = %event.channel,
            title = %event.title,
            "Upcoming"
        );
    }

    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = json::write_snapshot(&report, dir).await {
            error!(path = %dir, error = %e, "Failed to write snapshot JSON");
        }
    }
}
