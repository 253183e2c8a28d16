//! # AI News to Notion
//!
//! Searches recent artificial-intelligence news across a fixed set of
//! categories and search engines, then publishes the curated results into a
//! Notion workspace.
//!
//! ## Features
//!
//! - Five built-in categories (replaceable with a YAML file), two engines each
//! - SerpApi multi-engine search restricted to the last 24 hours
//! - Top two results per (category, engine), normalized into one record shape
//! - Two publishing modes: blocks appended to a per-day page, or one row per
//!   item in a Notion database
//! - Optional JSON snapshot of each run
//!
//! ## Usage
//!
//! ```sh
//! NOTION_KEY=... SERPAPI_API_KEY=... NOTION_PAGE_ID=... ai_news_notion
//! ```
//!
//! ## Architecture
//!
//! The application is a single sequential pass:
//! 1. **Configuration**: category table and credentials, built once
//! 2. **Page resolution** (page mode): find or create today's page
//! 3. **Search**: one query per (category, engine)
//! 4. **Normalization**: cap, filter, and label results
//! 5. **Publishing**: one batched append, or one row per item
//! 6. **Output**: optional JSON snapshot

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod notion;
mod outputs;
mod pipeline;
mod search;
mod utils;

use cli::Cli;
use config::{default_categories, load_categories};
use models::PublishMode;
use notion::NotionClient;
use outputs::json;
use pipeline::{Pipeline, run_database_mode, run_page_mode};
use search::SerpApiClient;
use utils::ensure_writable_dir;

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
    info!("ai_news_notion starting up");

    // Parse CLI
    let args = Cli::parse();
    let mode = args.resolve_mode();
    debug!(?args.categories, ?args.json_output_dir, dry_run = args.dry_run, "Parsed CLI arguments");
    info!(%mode, dry_run = args.dry_run, "Publishing mode selected");

    let missing = args.missing_credentials(mode);
    if !missing.is_empty() {
        warn!(?missing, "Credentials not set; the affected API calls will fail");
    }

    // ---- Category table ----
    let categories = match &args.categories {
        Some(path) => load_categories(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to load category table");
        })?,
        None => default_categories(),
    };
    info!(count = categories.len(), "Category table ready");

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Clients ----
    let serpapi_config = args.serpapi_config();
    let notion_config = args.notion_config();
    let searcher = SerpApiClient::new(&serpapi_config);
    let notion = NotionClient::new(&notion_config);

    let now = Local::now().naive_local();
    let pipeline = Pipeline::new(&searcher, &categories, mode, now);
    let target_id = args.target_id(mode);

    let report = match mode {
        PublishMode::Page => {
            match run_page_mode(&pipeline, &notion, target_id, args.dry_run).await {
                Ok(report) => report,
                Err(e) => {
                    error!(error = %e, "Could not find or create the daily page; aborting");
                    return Err(e.into());
                }
            }
        }
        PublishMode::Database => {
            run_database_mode(&pipeline, &notion, target_id, args.dry_run).await
        }
    };

    // ---- Snapshot ----
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_report(&report, dir).await {
            error!(error = %e, "Failed to write run snapshot");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        items = report.item_count(),
        published = report.published,
        failed = report.failed,
        "Execution complete"
    );

    Ok(())
}
