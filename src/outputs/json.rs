//! JSON snapshot output.
//!
//! After every refresh cycle the full [`SnapshotReport`] is serialized and
//! written to one file, overwriting the previous cycle's output:
//!
//! ```text
//! json_output_dir/
//! └── snapshot.json
//! ```
//!
//! The file is written to a temporary sibling first and then renamed, so a
//! reader never sees a half-written document.

use crate::views::SnapshotReport;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Name of the file written inside the output directory.
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Write a [`SnapshotReport`] to `{json_output_dir}/snapshot.json`.
///
/// # Arguments
///
/// * `report` - Every view of the current snapshot
/// * `json_output_dir` - Directory to write into; created if missing
///
/// # Returns
///
/// The path written, or an error if directory creation or writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    report: &SnapshotReport,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let dir = json_output_dir.trim_end_matches('/');
    let path = format!("{dir}/{SNAPSHOT_FILE}");
    let staging = format!("{path}.tmp");

    fs::write(&staging, json).await?;
    fs::rename(&staging, &path).await?;
    info!(
        path = %path,
        events = report.events.len(),
        favorites = report.favorites.len(),
        "Wrote snapshot JSON"
    );

    Ok(path)
}
