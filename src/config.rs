//! Category table and API credentials.
//!
//! Everything here is built once in `main` and passed by reference into the
//! searcher and the Notion writers; nothing is held in process-wide state.

use crate::error::ConfigError;
use crate::models::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// One news category: what to search for and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Unique category name, also the `Categoria` select value.
    pub name: String,
    /// Search expression in provider query syntax.
    pub terms: String,
    /// Engines queried in order.
    pub engines: Vec<Engine>,
    /// Optional domain restriction, used in database mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

impl CategoryConfig {
    fn new(name: &str, terms: &str, engines: [&str; 2]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.to_string(),
            engines: engines.into_iter().map(Engine::new).collect(),
            site: None,
        }
    }
}

/// The built-in category table, in publishing order.
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new(
            "Ferramentas de IA",
            r#""ferramentas de IA" OR "lançamento IA" OR "plataforma de inteligência artificial""#,
            ["google", "youtube"],
        ),
        CategoryConfig::new(
            "Tendências para IA",
            r#""tendências em IA" OR "futuro da IA" OR "IA generativa""#,
            ["google", "reddit"],
        ),
        CategoryConfig::new(
            "Atualizações sobre IA",
            r#""atualização de modelo de IA" OR "OpenAI update" OR "Google AI update""#,
            ["google", "twitter"],
        ),
        CategoryConfig::new(
            "IA em Saúde e Medicina",
            r#""IA na saúde" OR "inteligência artificial medicina" OR "diagnóstico por IA""#,
            ["google_scholar", "google"],
        ),
        CategoryConfig::new(
            "Inovações Médicas em IA",
            r#""inovação médica IA" OR "IA descoberta de fármacos" OR "cirurgia robótica IA""#,
            ["google_scholar", "youtube"],
        ),
    ]
}

/// Parse a YAML category list.
///
/// ```yaml
/// - name: Ferramentas de IA
///   terms: '"ferramentas de IA" OR "lançamento IA"'
///   engines: [google, youtube]
///   site: techcrunch.com
/// ```
pub fn parse_categories(yaml: &str) -> Result<Vec<CategoryConfig>, ConfigError> {
    let categories: Vec<CategoryConfig> = serde_yaml::from_str(yaml)?;
    validate_categories(&categories)?;
    Ok(categories)
}

/// Read and validate a YAML category file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_categories(path: &Path) -> Result<Vec<CategoryConfig>, ConfigError> {
    let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let categories = parse_categories(&yaml)?;
    info!(count = categories.len(), "Loaded category table");
    Ok(categories)
}

/// Reject tables the pipeline cannot run meaningfully.
pub fn validate_categories(categories: &[CategoryConfig]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Invalid("no categories defined".into()));
    }
    let mut seen = HashSet::new();
    for category in categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Invalid("category with empty name".into()));
        }
        if !seen.insert(category.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate category \"{}\"",
                category.name
            )));
        }
        if category.engines.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "category \"{}\" has no engines",
                category.name
            )));
        }
    }
    Ok(())
}

/// Search provider credentials and endpoint.
#[derive(Clone)]
pub struct SerpApiConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Notion credentials and endpoint.
#[derive(Clone)]
pub struct NotionConfig {
    pub token: String,
    pub base_url: String,
    pub version: String,
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .finish()
    }
}
