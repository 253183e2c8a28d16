//! JSON snapshot of a run.
//!
//! Each run overwrites `{json_output_dir}/{date}/{mode}.json` with the items
//! it collected and what was published, so a day's output can be inspected
//! or replayed without querying Notion.

use crate::models::RunReport;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path the report for this date and mode is written to.
pub fn report_path(report: &RunReport, json_output_dir: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(&report.local_date)
        .join(format!("{}.json", report.mode))
}

/// Write a [`RunReport`] as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization, directory creation, or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &RunReport,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(report, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), items = report.item_count(), "Wrote run snapshot");
    Ok(path)
}
