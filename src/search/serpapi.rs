//! SerpApi client.
//!
//! Issues one `GET /search.json` per engine query and decodes whichever
//! result wrapper the engine returns. No retries: a failed query is reported
//! as [`SearchOutcome::Failed`] and the caller moves on.

use super::{NewsSource, SearchOutcome, SearchQuery};
use crate::config::SerpApiConfig;
use crate::error::SearchError;
use crate::models::{ProviderResponse, SearchPayload};
use crate::utils::truncate_for_log;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// HTTP client for the SerpApi multi-engine search endpoint.
#[derive(Debug)]
pub struct SerpApiClient<'a> {
    config: &'a SerpApiConfig,
    http: reqwest::Client,
}

impl<'a> SerpApiClient<'a> {
    pub fn new(config: &'a SerpApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/search.json", self.config.base_url.trim_end_matches('/'))
    }

    /// Run the query and decode the engine's payload.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failure, a non-success status, a
    /// provider-reported `error`, or a body that is not a JSON object.
    pub async fn fetch(&self, query: &SearchQuery<'_>) -> Result<SearchPayload, SearchError> {
        let text = query.text();
        let mut params: Vec<(&str, &str)> = vec![
            ("q", text.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("engine", query.engine.as_str()),
        ];
        params.extend_from_slice(query.engine.extra_params());

        let response = self.http.get(self.endpoint()).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // SerpApi reports most failures as `{"error": "..."}`, with or without a 2xx.
        let decoded = serde_json::from_str::<ProviderResponse>(&body);
        if let Ok(ProviderResponse {
            error: Some(message),
            ..
        }) = &decoded
        {
            return Err(SearchError::Provider(message.clone()));
        }
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        Ok(SearchPayload::from(decoded?))
    }
}

impl NewsSource for SerpApiClient<'_> {
    #[instrument(level = "info", skip_all, fields(engine = %query.engine))]
    async fn search(&self, query: &SearchQuery<'_>) -> SearchOutcome {
        let t0 = Instant::now();
        info!(terms = %query.terms, site = ?query.site, "Searching");

        match self.fetch(query).await {
            Ok(payload) => {
                let kind = payload.kind();
                let results = payload.into_results();
                debug!(
                    kind,
                    count = results.len(),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Search completed"
                );
                SearchOutcome::from_results(results)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Search failed; treating as no results"
                );
                SearchOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Engine;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> SerpApiConfig {
        SerpApiConfig {
            api_key: "test-key".into(),
            base_url: server.uri(),
        }
    }

    #[tokio::test]
    async fn test_google_request_carries_news_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "\"IA generativa\""))
            .and(query_param("api_key", "test-key"))
            .and(query_param("engine", "google"))
            .and(query_param("tbm", "nws"))
            .and(query_param("tbs", "qdr:d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "news_results": [{"title": "A", "link": "http://a", "snippet": "s"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("google");
        let outcome = client
            .search(&SearchQuery::new("\"IA generativa\"", &engine))
            .await;

        let results = outcome.into_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].link.as_deref(), Some("http://a"));
    }

    #[tokio::test]
    async fn test_youtube_request_carries_upload_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "youtube"))
            .and(query_param("sp", "CAI%3D"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "video_results": [{"title": "V", "link": "https://youtube.com/watch?v=1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("youtube");
        let payload = client
            .fetch(&SearchQuery::new("IA", &engine))
            .await
            .unwrap();
        assert_eq!(payload.kind(), "video");
    }

    #[tokio::test]
    async fn test_site_filter_is_appended_to_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "IA site:example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic_results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("reddit");
        let outcome = client
            .search(&SearchQuery::new("IA", &engine).with_site(Some("example.com")))
            .await;
        assert!(matches!(outcome, SearchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_organic_results_returned_when_no_news() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search_metadata": {"status": "Success"},
                "organic_results": [
                    {"title": "1", "link": "http://1"},
                    {"title": "2", "link": "http://2"},
                    {"title": "3", "link": "http://3"}
                ]
            })))
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("google_scholar");
        let results = client
            .search(&SearchQuery::new("IA na saúde", &engine))
            .await
            .into_results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].title.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_unknown_shape_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search_metadata": {"status": "Success"}
            })))
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("twitter");
        let outcome = client.search(&SearchQuery::new("IA", &engine)).await;
        assert!(matches!(outcome, SearchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_provider_error_field_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"
            })))
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("google");
        match client.search(&SearchQuery::new("IA", &engine)).await {
            SearchOutcome::Failed(SearchError::Provider(msg)) => {
                assert!(msg.starts_with("Invalid API key"))
            }
            other => panic!("expected provider failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("google");
        let err = client
            .fetch(&SearchQuery::new("IA", &engine))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let config = config(&server);
        let client = SerpApiClient::new(&config);
        let engine = Engine::new("google");
        let outcome = client.search(&SearchQuery::new("IA", &engine)).await;
        assert!(matches!(outcome, SearchOutcome::Failed(SearchError::Decode(_))));
    }
}
