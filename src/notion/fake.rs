//! In-memory [`NotionApi`] that records every call, for tests.

use super::blocks::Block;
use super::{CreatePage, CreatedPage, NotionApi, PageSummary};
use crate::error::NotionError;
use serde::Serialize;
use std::cell::RefCell;

#[derive(Default)]
pub struct FakeNotion {
    pub search_results: Vec<PageSummary>,
    pub fail_search: bool,
    /// Fail `create_page` calls whose body contains this text.
    pub fail_create_containing: Option<String>,
    pub fail_append: bool,
    pub searches: RefCell<Vec<String>>,
    pub created: RefCell<Vec<serde_json::Value>>,
    pub appended: RefCell<Vec<(String, Vec<Block>)>>,
}

fn api_error(code: &str) -> NotionError {
    NotionError::Api {
        status: 400,
        code: code.to_string(),
        message: "fake failure".to_string(),
    }
}

impl NotionApi for FakeNotion {
    async fn search_pages(&self, query: &str) -> Result<Vec<PageSummary>, NotionError> {
        self.searches.borrow_mut().push(query.to_string());
        if self.fail_search {
            return Err(api_error("unauthorized"));
        }
        Ok(self.search_results.clone())
    }

    async fn create_page<P: Serialize + Sync>(
        &self,
        request: &CreatePage<P>,
    ) -> Result<CreatedPage, NotionError> {
        let value = serde_json::to_value(request)?;
        if let Some(needle) = &self.fail_create_containing {
            if value.to_string().contains(needle.as_str()) {
                return Err(api_error("validation_error"));
            }
        }
        let mut created = self.created.borrow_mut();
        created.push(value);
        Ok(CreatedPage {
            id: format!("created-{}", created.len()),
        })
    }

    async fn append_children(
        &self,
        block_id: &str,
        children: &[Block],
    ) -> Result<usize, NotionError> {
        if self.fail_append {
            return Err(api_error("validation_error"));
        }
        self.appended
            .borrow_mut()
            .push((block_id.to_string(), children.to_vec()));
        Ok(children.len())
    }
}
