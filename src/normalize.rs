//! Turning raw provider results into [`NormalizedItem`]s.
//!
//! Only the first [`MAX_RESULTS_PER_ENGINE`] results of each engine are
//! considered. Items without a usable title or link are dropped; a missing
//! summary or date is replaced by a fixed fallback.

use crate::models::{Engine, NormalizedItem, PublishMode, RawResult};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use url::Url;

/// Hard cap on results taken from one (category, engine) query.
pub const MAX_RESULTS_PER_ENGINE: usize = 2;

/// Strict publication date format accepted from the provider.
pub const PUBLICATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Per-run inputs shared by every normalized item.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub category: &'a str,
    pub engine: &'a Engine,
    pub mode: PublishMode,
    /// Frozen "now" of the run.
    pub now: NaiveDateTime,
}

/// Parse a `YYYY-MM-DD` publication date to midnight of that day.
///
/// Anything else (missing value, relative dates like "2 hours ago", other
/// layouts) silently becomes `now`.
pub fn parse_publication_date(raw: Option<&str>, now: NaiveDateTime) -> NaiveDateTime {
    raw.map(str::trim)
        .and_then(|s| NaiveDate::parse_from_str(s, PUBLICATION_DATE_FORMAT).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build one item, or `None` if the result lacks a title or a valid link.
pub fn normalize_result(raw: &RawResult, ctx: &NormalizeContext<'_>) -> Option<NormalizedItem> {
    let Some(title) = non_empty(raw.title.as_deref()) else {
        debug!(engine = %ctx.engine, "Skipping result without title");
        return None;
    };
    let Some(link) = non_empty(raw.link.as_deref()) else {
        debug!(engine = %ctx.engine, %title, "Skipping result without link");
        return None;
    };
    if let Err(e) = Url::parse(link) {
        debug!(engine = %ctx.engine, %link, error = %e, "Skipping result with invalid link");
        return None;
    }

    // A missing date means "published today".
    let today = ctx.now.date().format(PUBLICATION_DATE_FORMAT).to_string();
    let date = raw.date.as_deref().unwrap_or(&today);

    Some(NormalizedItem {
        title: title.to_string(),
        link: link.to_string(),
        summary: raw
            .summary()
            .unwrap_or(ctx.mode.summary_fallback())
            .to_string(),
        source_label: ctx.engine.source_label(),
        category: ctx.category.to_string(),
        publication_date: parse_publication_date(Some(date), ctx.now),
    })
}

/// Normalize at most the first two results of one engine query.
///
/// The cap applies before filtering: a skipped item is not replaced by the
/// third result.
pub fn select_items(results: &[RawResult], ctx: &NormalizeContext<'_>) -> Vec<NormalizedItem> {
    results
        .iter()
        .take(MAX_RESULTS_PER_ENGINE)
        .filter_map(|raw| normalize_result(raw, ctx))
        .collect()
}
