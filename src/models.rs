//! Data models for search results, normalized news items, and run reports.
//!
//! This module defines the data that flows through the pipeline:
//! - [`Engine`]: a search-provider back end identifier
//! - [`ProviderResponse`] / [`SearchPayload`]: the provider's engine-specific
//!   response wrappers, decoded into a tagged union
//! - [`RawResult`]: one loosely typed result item
//! - [`NormalizedItem`]: the canonical record handed to a publisher
//! - [`CategoryBatch`] / [`RunReport`]: what a run produced

use crate::utils::upcase;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which Notion target a run publishes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Append blocks to a page named after the current day.
    Page,
    /// Create one row per item in a Notion database.
    Database,
}

impl PublishMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishMode::Page => "page",
            PublishMode::Database => "database",
        }
    }

    /// Summary used when a result carries no snippet.
    pub fn summary_fallback(&self) -> &'static str {
        match self {
            PublishMode::Page => "Resumo não disponível.",
            PublishMode::Database => "Summary unavailable.",
        }
    }
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search engine identifier as understood by the provider (`google`,
/// `youtube`, `google_scholar`, ...).
///
/// Unknown identifiers are valid: they are forwarded to the provider as-is
/// and labelled with the default capitalization rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Engine(String);

impl Engine {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label for the `Fonte` column and the block suffix.
    ///
    /// `google` and `google_scholar` are shown as "Portal", `twitter` as
    /// "X.com"; anything else gets its first character upper-cased.
    pub fn source_label(&self) -> String {
        match self.0.as_str() {
            "google" | "google_scholar" => "Portal".to_string(),
            "twitter" => "X.com".to_string(),
            other => upcase(other),
        }
    }

    /// Engine-specific query parameters restricting results to the last 24 hours.
    pub fn extra_params(&self) -> &'static [(&'static str, &'static str)] {
        match self.0.as_str() {
            "google" => &[("tbm", "nws"), ("tbs", "qdr:d")],
            // Opaque YouTube filter token for "uploaded today".
            "youtube" => &[("sp", "CAI%3D")],
            _ => &[],
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep string values, treat anything else (numbers, objects, null) as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}

/// One result item as returned by the provider.
///
/// Shapes differ per engine, so every field is optional and unexpected
/// value types are dropped rather than failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub snippet: Option<String>,
    /// Video results carry their text here instead of `snippet`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
}

impl RawResult {
    pub fn summary(&self) -> Option<&str> {
        self.snippet.as_deref().or(self.description.as_deref())
    }
}

/// The top-level JSON object returned by the search provider.
///
/// Only the four result wrappers and the error field are decoded; the
/// provider's metadata sections are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    pub news_results: Option<Vec<RawResult>>,
    pub video_results: Option<Vec<RawResult>>,
    pub organic_results: Option<Vec<RawResult>>,
    pub scholar_articles: Option<Vec<RawResult>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

/// The result list of a response, tagged with the wrapper it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPayload {
    News(Vec<RawResult>),
    Video(Vec<RawResult>),
    Organic(Vec<RawResult>),
    Scholar(Vec<RawResult>),
    /// None of the known wrappers was present.
    Unknown,
}

impl SearchPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            SearchPayload::News(_) => "news",
            SearchPayload::Video(_) => "video",
            SearchPayload::Organic(_) => "organic",
            SearchPayload::Scholar(_) => "scholar",
            SearchPayload::Unknown => "unknown",
        }
    }

    pub fn into_results(self) -> Vec<RawResult> {
        match self {
            SearchPayload::News(r)
            | SearchPayload::Video(r)
            | SearchPayload::Organic(r)
            | SearchPayload::Scholar(r) => r,
            SearchPayload::Unknown => Vec::new(),
        }
    }
}

impl From<ProviderResponse> for SearchPayload {
    /// Probe order is news → video → organic → scholar.
    fn from(response: ProviderResponse) -> Self {
        if let Some(r) = response.news_results {
            SearchPayload::News(r)
        } else if let Some(r) = response.video_results {
            SearchPayload::Video(r)
        } else if let Some(r) = response.organic_results {
            SearchPayload::Organic(r)
        } else if let Some(r) = response.scholar_articles {
            SearchPayload::Scholar(r)
        } else {
            SearchPayload::Unknown
        }
    }
}

/// A search result ready to be published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source_label: String,
    pub category: String,
    /// Local, timezone-less timestamp rendered as `YYYY-MM-DDTHH:MM:SS`.
    pub publication_date: NaiveDateTime,
}

/// The items one category produced, in engine declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBatch {
    pub category: String,
    pub items: Vec<NormalizedItem>,
}

/// Summary of a finished run, also written as the JSON snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub mode: PublishMode,
    /// Run date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Notion page id the blocks were appended to (page mode only).
    pub page_id: Option<String>,
    pub batches: Vec<CategoryBatch>,
    /// Blocks appended (page mode) or rows created (database mode).
    pub published: usize,
    /// Failed publish calls.
    pub failed: usize,
    pub dry_run: bool,
}

impl RunReport {
    pub fn item_count(&self) -> usize {
        self.batches.iter().map(|b| b.items.len()).sum()
    }
}
