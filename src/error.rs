//! Error types for the search, Notion, and configuration boundaries.
//!
//! None of these escape the pipeline except [`ConfigError`] and
//! [`PageResolutionError`]: search and publish failures are logged at the
//! point of the external call and converted to a safe default.

/// A single engine query that could not produce results.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Transport-level failure talking to the search provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status code.
    #[error("search provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 200 but reported an error in the payload.
    #[error("search provider error: {0}")]
    Provider(String),

    /// The response body was not the JSON object we expect.
    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A failed call against the Notion API.
#[derive(Debug, thiserror::Error)]
pub enum NotionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Notion's structured error body (`{"object":"error", ...}`).
    #[error("notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("malformed notion response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Problems loading or validating the category table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid category YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid category table: {0}")]
    Invalid(String),
}

/// The daily page could neither be found nor created.
#[derive(Debug, thiserror::Error)]
#[error("could not find or create daily page \"{title}\": {source}")]
pub struct PageResolutionError {
    pub title: String,
    #[source]
    pub source: NotionError,
}
