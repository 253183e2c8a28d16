//! Notion publishing: the API seam, the HTTP client, and the page/row builders.
//!
//! # Submodules
//!
//! - [`client`]: [`NotionClient`], the reqwest-backed [`NotionApi`]
//! - [`blocks`]: block and rich-text model, daily-page content builders
//! - [`properties`]: page title and database row property payloads
//! - [`daily_page`]: find-or-create of the per-day page
//!
//! # Endpoints used
//!
//! | Call | Endpoint |
//! |------|----------|
//! | [`NotionApi::search_pages`] | `POST /v1/search` |
//! | [`NotionApi::create_page`] | `POST /v1/pages` |
//! | [`NotionApi::append_children`] | `PATCH /v1/blocks/{id}/children` |

pub mod blocks;
pub mod client;
pub mod daily_page;
#[cfg(test)]
pub(crate) mod fake;
pub mod properties;

use crate::error::NotionError;
use blocks::Block;
use serde::{Deserialize, Serialize};

pub use client::NotionClient;
pub use daily_page::{DailyPageResolver, PageLookup};

/// Where a new page is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parent {
    PageId(String),
    DatabaseId(String),
}

/// Body of `POST /v1/pages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePage<P> {
    pub parent: Parent,
    pub properties: P,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
}

/// The parent reference of a page as returned by Notion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageParent {
    /// Set only when the parent is a page.
    #[serde(default)]
    pub page_id: Option<String>,
}

/// The subset of a page object we read back from search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageSummary {
    pub id: String,
    #[serde(default)]
    pub parent: PageParent,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub in_trash: bool,
}

impl PageSummary {
    pub fn is_live(&self) -> bool {
        !self.archived && !self.in_trash
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}

/// The Notion operations this program depends on.
pub trait NotionApi {
    /// Pages whose title matches `query`.
    async fn search_pages(&self, query: &str) -> Result<Vec<PageSummary>, NotionError>;

    async fn create_page<P: Serialize + Sync>(
        &self,
        request: &CreatePage<P>,
    ) -> Result<CreatedPage, NotionError>;

    /// Append `children` to a page or block, returning how many were sent.
    async fn append_children(&self, block_id: &str, children: &[Block])
    -> Result<usize, NotionError>;
}
