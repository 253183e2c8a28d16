//! Utility functions for string formatting, date titles, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Capitalization and char-safe truncation
//! - Daily page titles and timestamp rendering
//! - Notion id comparison
//! - File system validation for the snapshot directory

use chrono::{NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Title prefix of the page created for each calendar day.
pub const DAILY_PAGE_PREFIX: &str = "Notícias de IA";

/// Deterministic title of the daily page, e.g. `"Notícias de IA - 15/03/2024"`.
pub fn daily_page_title(date: NaiveDate) -> String {
    format!("{} - {}", DAILY_PAGE_PREFIX, date.format("%d/%m/%Y"))
}

/// Render a timestamp the way Notion date properties receive it.
///
/// ```ignore
/// assert_eq!(iso_timestamp(midnight_2024_03_15), "2024-03-15T00:00:00");
/// ```
pub fn iso_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…(+{} bytes)", &s[..end], s.len() - end)
    }
}

/// Keep at most `max` characters of `s`.
///
/// Notion caps a single rich-text run at 2000 characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Capitalize the first character of a string, leaving the rest untouched.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("youtube"), "Youtube");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Compare two Notion ids, ignoring dashes and case.
///
/// Notion returns dashed UUIDs while ids copied from page URLs are not.
pub fn same_notion_id(a: &str, b: &str) -> bool {
    let strip = |s: &str| {
        s.chars()
            .filter(|c| *c != '-')
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    !a.is_empty() && strip(a) == strip(b)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
