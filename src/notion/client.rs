//! reqwest-backed Notion client.

use super::blocks::Block;
use super::{CreatePage, CreatedPage, NotionApi, PageSummary};
use crate::config::NotionConfig;
use crate::error::NotionError;
use crate::utils::truncate_for_log;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Notion's error body: `{"object": "error", "status": 400, "code": "...", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PageSummary>,
}

#[derive(Debug)]
pub struct NotionClient<'a> {
    config: &'a NotionConfig,
    http: reqwest::Client,
}

impl<'a> NotionClient<'a> {
    pub fn new(config: &'a NotionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path);
        self.http
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header("Notion-Version", &self.config.version)
    }

    /// Send a JSON body and decode the success response.
    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, NotionError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let t0 = Instant::now();
        let response = self.request(method, path).json(body).send().await?;
        let status = response.status();
        debug!(
            %path,
            status = status.as_u16(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Notion call finished"
        );
        if !status.is_success() {
            return Err(api_error(response).await);
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

async fn api_error(response: Response) -> NotionError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return NotionError::Http(e),
    };
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(err) => NotionError::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => NotionError::Api {
            status,
            code: "unknown".to_string(),
            message: truncate_for_log(&body, 300),
        },
    }
}

impl NotionApi for NotionClient<'_> {
    #[instrument(level = "info", skip_all, fields(%query))]
    async fn search_pages(&self, query: &str) -> Result<Vec<PageSummary>, NotionError> {
        let body = json!({
            "query": query,
            "filter": {"property": "object", "value": "page"},
        });
        let response: SearchResponse = self.send(Method::POST, "search", &body).await?;
        debug!(count = response.results.len(), "Notion search returned pages");
        Ok(response.results)
    }

    #[instrument(level = "info", skip_all)]
    async fn create_page<P: Serialize + Sync>(
        &self,
        request: &CreatePage<P>,
    ) -> Result<CreatedPage, NotionError> {
        self.send(Method::POST, "pages", request).await
    }

    #[instrument(level = "info", skip_all, fields(%block_id, count = children.len()))]
    async fn append_children(
        &self,
        block_id: &str,
        children: &[Block],
    ) -> Result<usize, NotionError> {
        let body = json!({ "children": children });
        let path = format!("blocks/{block_id}/children");
        let result: Result<serde_json::Value, _> = self.send(Method::PATCH, &path, &body).await;
        if let Err(e) = &result {
            warn!(error = %e, "Appending blocks failed");
        }
        result.map(|_| children.len())
    }
}
