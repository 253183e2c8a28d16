//! News search across provider engines.
//!
//! The pipeline talks to search through the [`NewsSource`] trait so that the
//! SerpApi client can be swapped for a fake in tests. Every query resolves to
//! a [`SearchOutcome`]; failures are values, not errors, because a failed
//! engine only means "no results for this engine".
//!
//! # Engines
//!
//! | Engine | Extra parameters | Result wrapper |
//! |--------|------------------|----------------|
//! | `google` | `tbm=nws`, `tbs=qdr:d` | `news_results` |
//! | `youtube` | `sp=CAI%3D` | `video_results` |
//! | `google_scholar` | none | `organic_results` |
//! | anything else | none | first wrapper present |

pub mod serpapi;

use crate::error::SearchError;
use crate::models::{Engine, RawResult};

pub use serpapi::SerpApiClient;

/// One engine query.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub terms: &'a str,
    pub engine: &'a Engine,
    /// Restrict results to one domain via a `site:` clause.
    pub site: Option<&'a str>,
}

impl<'a> SearchQuery<'a> {
    pub fn new(terms: &'a str, engine: &'a Engine) -> Self {
        Self {
            terms,
            engine,
            site: None,
        }
    }

    pub fn with_site(mut self, site: Option<&'a str>) -> Self {
        self.site = site.filter(|s| !s.trim().is_empty());
        self
    }

    /// Query text as sent to the provider.
    pub fn text(&self) -> String {
        match self.site {
            Some(site) => format!("{} site:{}", self.terms, site.trim()),
            None => self.terms.to_string(),
        }
    }
}

/// What a single engine query produced.
#[derive(Debug)]
pub enum SearchOutcome {
    Results(Vec<RawResult>),
    /// The provider answered but had nothing, or no known result wrapper.
    Empty,
    Failed(SearchError),
}

impl SearchOutcome {
    /// Wrap a result list, mapping an empty list to [`SearchOutcome::Empty`].
    pub fn from_results(results: Vec<RawResult>) -> Self {
        if results.is_empty() {
            SearchOutcome::Empty
        } else {
            SearchOutcome::Results(results)
        }
    }

    /// Collapse to a list, dropping the failure reason.
    #[cfg(test)]
    pub fn into_results(self) -> Vec<RawResult> {
        match self {
            SearchOutcome::Results(r) => r,
            SearchOutcome::Empty | SearchOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Anything that can answer a news query for one engine.
pub trait NewsSource {
    async fn search(&self, query: &SearchQuery<'_>) -> SearchOutcome;
}
