//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment, so a scheduled
//! run needs no arguments at all: set `NOTION_KEY`, `SERPAPI_API_KEY`, and
//! either `NOTION_PAGE_ID` or `NOTION_DATABASE_ID`.

use crate::config::{
    DEFAULT_NOTION_BASE_URL, DEFAULT_SERPAPI_BASE_URL, NOTION_API_VERSION, NotionConfig,
    SerpApiConfig,
};
use crate::models::PublishMode;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Daily page under NOTION_PAGE_ID
/// ai_news_notion
///
/// # One row per item in a database, with a custom category table
/// ai_news_notion --mode database --categories categories.yaml
///
/// # Search only, keep a local snapshot
/// ai_news_notion --dry-run -j ./runs
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Notion integration token
    #[arg(long, env = "NOTION_KEY", hide_env_values = true)]
    pub notion_key: Option<String>,

    /// Parent page under which daily pages are created (page mode)
    #[arg(long, env = "NOTION_PAGE_ID")]
    pub notion_page_id: Option<String>,

    /// Target database for news rows (database mode)
    #[arg(long, env = "NOTION_DATABASE_ID")]
    pub notion_database_id: Option<String>,

    /// SerpApi key
    #[arg(long, env = "SERPAPI_API_KEY", hide_env_values = true)]
    pub serpapi_api_key: Option<String>,

    /// Publishing mode; inferred from the configured Notion ids when omitted
    #[arg(long, value_enum, env = "NEWS_MODE")]
    pub mode: Option<PublishMode>,

    /// YAML file replacing the built-in category table
    #[arg(short, long, env = "NEWS_CATEGORIES")]
    pub categories: Option<PathBuf>,

    /// Directory for the JSON run snapshot
    #[arg(short, long, env = "NEWS_JSON_OUTPUT_DIR")]
    pub json_output_dir: Option<String>,

    /// Search and normalize only; make no Notion calls
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "SERPAPI_BASE_URL", default_value = DEFAULT_SERPAPI_BASE_URL, hide = true)]
    pub serpapi_base_url: String,

    #[arg(long, env = "NOTION_BASE_URL", default_value = DEFAULT_NOTION_BASE_URL, hide = true)]
    pub notion_base_url: String,
}

/// Database mode when only a database id is configured, page mode otherwise.
pub fn infer_mode(page_id: Option<&str>, database_id: Option<&str>) -> PublishMode {
    match (page_id, database_id) {
        (None, Some(_)) => PublishMode::Database,
        _ => PublishMode::Page,
    }
}

impl Cli {
    pub fn resolve_mode(&self) -> PublishMode {
        self.mode.unwrap_or_else(|| {
            infer_mode(
                self.notion_page_id.as_deref(),
                self.notion_database_id.as_deref(),
            )
        })
    }

    /// Notion id the selected mode writes into (empty when unset).
    pub fn target_id(&self, mode: PublishMode) -> &str {
        let id = match mode {
            PublishMode::Page => &self.notion_page_id,
            PublishMode::Database => &self.notion_database_id,
        };
        id.as_deref().unwrap_or_default()
    }

    /// Names of credentials needed by `mode` that were not supplied.
    pub fn missing_credentials(&self, mode: PublishMode) -> Vec<&'static str> {
        let target = match mode {
            PublishMode::Page => ("NOTION_PAGE_ID", &self.notion_page_id),
            PublishMode::Database => ("NOTION_DATABASE_ID", &self.notion_database_id),
        };
        [
            ("NOTION_KEY", &self.notion_key),
            target,
            ("SERPAPI_API_KEY", &self.serpapi_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn serpapi_config(&self) -> SerpApiConfig {
        SerpApiConfig {
            api_key: self.serpapi_api_key.clone().unwrap_or_default(),
            base_url: self.serpapi_base_url.clone(),
        }
    }

    pub fn notion_config(&self) -> NotionConfig {
        NotionConfig {
            token: self.notion_key.clone().unwrap_or_default(),
            base_url: self.notion_base_url.clone(),
            version: NOTION_API_VERSION.to_string(),
        }
    }
}
