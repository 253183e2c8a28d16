//! Find-or-create of the page that collects one day's news.
//!
//! Lookup and creation are two separate API calls, so two runs started at the
//! same moment can each create a page for the same day.

use super::blocks::daily_page_intro;
use super::properties::PageTitleProperties;
use super::{CreatePage, NotionApi, Parent};
use crate::error::{NotionError, PageResolutionError};
use crate::utils::{daily_page_title, same_notion_id};
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

/// Result of looking for an existing daily page.
#[derive(Debug)]
pub enum PageLookup {
    Found(String),
    NotFound,
    Failed(NotionError),
}

pub struct DailyPageResolver<'a, N> {
    notion: &'a N,
    parent_page_id: &'a str,
}

impl<'a, N: NotionApi> DailyPageResolver<'a, N> {
    pub fn new(notion: &'a N, parent_page_id: &'a str) -> Self {
        Self {
            notion,
            parent_page_id,
        }
    }

    /// Search for a live page titled `title` directly under the parent page.
    ///
    /// Notion's search is fuzzy and workspace-wide, so results are filtered
    /// here by parent and archive state.
    pub async fn lookup(&self, title: &str) -> PageLookup {
        match self.notion.search_pages(title).await {
            Ok(pages) => pages
                .into_iter()
                .find(|page| {
                    page.is_live()
                        && page
                            .parent
                            .page_id
                            .as_deref()
                            .is_some_and(|id| same_notion_id(id, self.parent_page_id))
                })
                .map_or(PageLookup::NotFound, |page| PageLookup::Found(page.id)),
            Err(e) => PageLookup::Failed(e),
        }
    }

    /// Return the id of today's page, creating it if needed.
    ///
    /// A failed lookup is treated like "not found". Only a failed creation
    /// is an error, and it is fatal for page mode.
    #[instrument(level = "info", skip_all, fields(parent = %self.parent_page_id, %date))]
    pub async fn resolve(&self, date: NaiveDate) -> Result<String, PageResolutionError> {
        let title = daily_page_title(date);

        match self.lookup(&title).await {
            PageLookup::Found(id) => {
                info!(page_id = %id, "Found daily page");
                return Ok(id);
            }
            PageLookup::NotFound => {}
            PageLookup::Failed(e) => {
                warn!(error = %e, "Daily page lookup failed; creating a new page");
            }
        }

        info!(%title, "Creating daily page");
        let request = CreatePage {
            parent: Parent::PageId(self.parent_page_id.to_string()),
            properties: PageTitleProperties::new(&title),
            children: daily_page_intro(&title),
        };
        match self.notion.create_page(&request).await {
            Ok(created) => {
                info!(page_id = %created.id, "Created daily page");
                Ok(created.id)
            }
            Err(source) => Err(PageResolutionError { title, source }),
        }
    }
}
