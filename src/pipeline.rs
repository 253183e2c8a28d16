//! Category-driven search → normalize → publish orchestration.
//!
//! Categories and engines are processed strictly in order, one request at a
//! time. Two publishing strategies share the same collection step:
//!
//! - **Page mode**: resolve today's page, collect everything, append all
//!   blocks in a single call.
//! - **Database mode**: collect one category at a time and create one row per
//!   item; a failed row is logged and skipped.

use crate::config::CategoryConfig;
use crate::error::{NotionError, PageResolutionError};
use crate::models::{CategoryBatch, Engine, NormalizedItem, PublishMode, RunReport};
use crate::normalize::{NormalizeContext, select_items};
use crate::notion::blocks::{Block, build_page_blocks};
use crate::notion::properties::RowProperties;
use crate::notion::{CreatePage, CreatedPage, DailyPageResolver, NotionApi, Parent};
use crate::search::{NewsSource, SearchOutcome, SearchQuery};
use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};

/// Search and normalization state shared by both publishing modes.
pub struct Pipeline<'a, S> {
    source: &'a S,
    categories: &'a [CategoryConfig],
    mode: PublishMode,
    now: NaiveDateTime,
}

impl<'a, S: NewsSource> Pipeline<'a, S> {
    pub fn new(
        source: &'a S,
        categories: &'a [CategoryConfig],
        mode: PublishMode,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            source,
            categories,
            mode,
            now,
        }
    }

    async fn search_engine(
        &self,
        category: &CategoryConfig,
        engine: &Engine,
    ) -> Vec<NormalizedItem> {
        // Site filters only apply to database mode.
        let site = match self.mode {
            PublishMode::Database => category.site.as_deref(),
            PublishMode::Page => None,
        };
        let query = SearchQuery::new(&category.terms, engine).with_site(site);

        match self.source.search(&query).await {
            SearchOutcome::Results(results) => {
                let ctx = NormalizeContext {
                    category: &category.name,
                    engine,
                    mode: self.mode,
                    now: self.now,
                };
                let items = select_items(&results, &ctx);
                info!(
                    %engine,
                    returned = results.len(),
                    selected = items.len(),
                    "Selected results"
                );
                items
            }
            SearchOutcome::Empty => {
                info!(%engine, "No results found for this engine");
                Vec::new()
            }
            SearchOutcome::Failed(e) => {
                warn!(%engine, error = %e, "Engine query failed; continuing with next engine");
                Vec::new()
            }
        }
    }

    /// Query every engine of `category` in order and gather its items.
    #[instrument(level = "info", skip_all, fields(category = %category.name))]
    pub async fn collect_category(&self, category: &CategoryConfig) -> CategoryBatch {
        let items: Vec<NormalizedItem> = stream::iter(category.engines.iter())
            .then(|engine| self.search_engine(category, engine))
            .concat()
            .await;
        info!(count = items.len(), "Category processed");
        CategoryBatch {
            category: category.name.clone(),
            items,
        }
    }

    /// All categories, in declaration order.
    pub async fn collect(&self) -> Vec<CategoryBatch> {
        stream::iter(self.categories.iter())
            .then(|category| self.collect_category(category))
            .collect()
            .await
    }

    fn report(
        &self,
        page_id: Option<String>,
        batches: Vec<CategoryBatch>,
        dry_run: bool,
    ) -> RunReport {
        RunReport {
            mode: self.mode,
            local_date: self.now.date().format("%Y-%m-%d").to_string(),
            page_id,
            batches,
            published: 0,
            failed: 0,
            dry_run,
        }
    }
}

/// Publish into today's page under `parent_page_id`.
///
/// The page is resolved before any search runs; if it can neither be found
/// nor created the run aborts with nothing published.
#[instrument(level = "info", skip_all, fields(mode = "page", dry_run = dry_run))]
pub async fn run_page_mode<S: NewsSource, N: NotionApi>(
    pipeline: &Pipeline<'_, S>,
    notion: &N,
    parent_page_id: &str,
    dry_run: bool,
) -> Result<RunReport, PageResolutionError> {
    let page_id = if dry_run {
        info!("Dry run; not resolving the daily page");
        None
    } else {
        let resolver = DailyPageResolver::new(notion, parent_page_id);
        Some(resolver.resolve(pipeline.now.date()).await?)
    };

    let batches = pipeline.collect().await;
    let blocks = build_page_blocks(&batches);
    debug!(kinds = ?blocks.iter().map(Block::kind).collect::<Vec<_>>(), "Built page blocks");
    let mut report = pipeline.report(page_id, batches, dry_run);

    match (&report.page_id, blocks.is_empty()) {
        (_, true) => info!("No news found today"),
        (None, false) => info!(count = blocks.len(), "Dry run; skipping block append"),
        (Some(page_id), false) => match notion.append_children(page_id, &blocks).await {
            Ok(count) => {
                info!(count, %page_id, "Appended news blocks to the daily page");
                report.published = count;
            }
            Err(e) => {
                error!(error = %e, %page_id, "Failed to append blocks to the daily page");
                report.failed = 1;
            }
        },
    }

    Ok(report)
}

/// Create one row in `database_id`.
pub async fn publish_row<N: NotionApi>(
    notion: &N,
    database_id: &str,
    item: &NormalizedItem,
) -> Result<CreatedPage, NotionError> {
    let request = CreatePage {
        parent: Parent::DatabaseId(database_id.to_string()),
        properties: RowProperties::from(item),
        children: Vec::new(),
    };
    notion.create_page(&request).await
}

/// Publish one database row per item, category by category.
///
/// Row failures are logged and counted; they never stop the run.
#[instrument(level = "info", skip_all, fields(mode = "database", dry_run = dry_run))]
pub async fn run_database_mode<S: NewsSource, N: NotionApi>(
    pipeline: &Pipeline<'_, S>,
    notion: &N,
    database_id: &str,
    dry_run: bool,
) -> RunReport {
    let mut batches = Vec::with_capacity(pipeline.categories.len());
    let mut published = 0;
    let mut failed = 0;

    for category in pipeline.categories {
        let batch = pipeline.collect_category(category).await;
        if !dry_run {
            for item in &batch.items {
                match publish_row(notion, database_id, item).await {
                    Ok(created) => {
                        info!(row_id = %created.id, title = %item.title, "Created database row");
                        published += 1;
                    }
                    Err(e) => {
                        error!(error = %e, title = %item.title, "Failed to create database row");
                        failed += 1;
                    }
                }
            }
        }
        batches.push(batch);
    }

    let mut report = pipeline.report(None, batches, dry_run);
    report.published = published;
    report.failed = failed;
    info!(
        items = report.item_count(),
        published,
        failed,
        "Database publishing finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_categories;
    use crate::error::SearchError;
    use crate::models::RawResult;
    use crate::notion::fake::FakeNotion;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned answers keyed by engine; unknown engines answer `Empty`.
    #[derive(Default)]
    struct FakeSource {
        answers: HashMap<String, Result<Vec<RawResult>, String>>,
        queries: RefCell<Vec<(String, String)>>,
    }

    impl FakeSource {
        fn answer(mut self, engine: &str, results: Vec<RawResult>) -> Self {
            self.answers.insert(engine.to_string(), Ok(results));
            self
        }

        fn fail(mut self, engine: &str) -> Self {
            self.answers
                .insert(engine.to_string(), Err("Invalid API key".to_string()));
            self
        }
    }

    impl NewsSource for FakeSource {
        async fn search(&self, query: &SearchQuery<'_>) -> SearchOutcome {
            self.queries
                .borrow_mut()
                .push((query.engine.to_string(), query.text()));
            match self.answers.get(query.engine.as_str()) {
                Some(Ok(results)) => SearchOutcome::from_results(results.clone()),
                Some(Err(msg)) => SearchOutcome::Failed(SearchError::Provider(msg.clone())),
                None => SearchOutcome::Empty,
            }
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    fn result(title: &str) -> RawResult {
        RawResult {
            title: Some(title.to_string()),
            link: Some(format!("https://news.example/{title}")),
            snippet: Some(format!("sobre {title}")),
            ..Default::default()
        }
    }

    fn category(name: &str, engines: &[&str]) -> CategoryConfig {
        CategoryConfig {
            name: name.to_string(),
            terms: format!("\"{name}\""),
            engines: engines.iter().map(|e| Engine::new(*e)).collect(),
            site: None,
        }
    }

    #[tokio::test]
    async fn test_database_end_to_end_row() {
        let source = FakeSource::default().answer(
            "google",
            vec![RawResult {
                title: Some("X".into()),
                link: Some("http://a".into()),
                snippet: Some("s".into()),
                date: Some("2024-01-01".into()),
                ..Default::default()
            }],
        );
        let notion = FakeNotion::default();
        let categories = vec![category("Ferramentas de IA", &["google"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Database, now());

        let report = run_database_mode(&pipeline, &notion, "db-1", false).await;

        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 0);
        let created = notion.created.borrow();
        assert_eq!(created.len(), 1);
        let row = &created[0];
        assert_eq!(row["parent"]["database_id"], "db-1");
        assert_eq!(row["properties"]["Categoria"]["select"]["name"], "Ferramentas de IA");
        assert_eq!(row["properties"]["Fonte"]["select"]["name"], "Portal");
        assert_eq!(
            row["properties"]["Data da Publicação"]["date"]["start"],
            "2024-01-01T00:00:00"
        );
        assert_eq!(row["properties"]["Título"]["title"][0]["text"]["content"], "X");
        assert_eq!(row["properties"]["Link"]["url"], "http://a");
        assert!(row.get("children").is_none());
    }

    #[tokio::test]
    async fn test_database_row_failure_does_not_abort() {
        let source = FakeSource::default()
            .answer("google", vec![result("ruim"), result("bom")])
            .answer("reddit", vec![result("outro")]);
        let notion = FakeNotion {
            fail_create_containing: Some("ruim".into()),
            ..Default::default()
        };
        let categories = vec![category("A", &["google"]), category("B", &["reddit"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Database, now());

        let report = run_database_mode(&pipeline, &notion, "db-1", false).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.published, 2);
        assert_eq!(notion.created.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_database_unparseable_date_uses_frozen_now() {
        let mut raw = result("t");
        raw.date = Some("March 15".into());
        let source = FakeSource::default().answer("youtube", vec![raw]);
        let notion = FakeNotion::default();
        let categories = vec![category("A", &["youtube"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Database, now());

        run_database_mode(&pipeline, &notion, "db-1", false).await;

        let created = notion.created.borrow();
        assert_eq!(
            created[0]["properties"]["Data da Publicação"]["date"]["start"],
            "2026-10-18T07:00:00"
        );
        assert_eq!(created[0]["properties"]["Fonte"]["select"]["name"], "Youtube");
    }

    #[tokio::test]
    async fn test_site_filter_only_in_database_mode() {
        let mut cat = category("A", &["google"]);
        cat.site = Some("example.com".into());
        let categories = vec![cat];
        let notion = FakeNotion::default();

        let source = FakeSource::default();
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Database, now());
        run_database_mode(&pipeline, &notion, "db", true).await;
        assert_eq!(source.queries.borrow()[0].1, "\"A\" site:example.com");

        let source = FakeSource::default();
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());
        run_page_mode(&pipeline, &notion, "root", true).await.unwrap();
        assert_eq!(source.queries.borrow()[0].1, "\"A\"");
    }

    #[tokio::test]
    async fn test_page_mode_single_batched_append() {
        let source = FakeSource::default()
            .answer("google", (0..5).map(|i| result(&format!("g{i}"))).collect())
            .answer("youtube", vec![result("v0")])
            .fail("twitter");
        let notion = FakeNotion::default();
        let categories = vec![
            category("Ferramentas de IA", &["google", "youtube"]),
            category("Vazia", &["reddit", "twitter"]),
            category("Só vídeo", &["youtube"]),
        ];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let report = run_page_mode(&pipeline, &notion, "root", false).await.unwrap();

        let appended = notion.appended.borrow();
        assert_eq!(appended.len(), 1);
        let (page_id, blocks) = &appended[0];
        assert_eq!(page_id, "created-1");
        let kinds: Vec<_> = blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "heading_2",
                "bulleted_list_item",
                "bulleted_list_item",
                "bulleted_list_item",
                "divider",
                "heading_2",
                "bulleted_list_item",
                "divider",
            ]
        );
        assert_eq!(blocks[0], Block::heading_2("Ferramentas de IA"));
        assert_eq!(blocks[5], Block::heading_2("Só vídeo"));
        assert_eq!(report.published, 8);
        assert_eq!(report.page_id.as_deref(), Some("created-1"));
        assert_eq!(report.item_count(), 4);
        assert!(report.batches[1].items.is_empty());
    }

    #[tokio::test]
    async fn test_page_mode_no_items_no_append() {
        let source = FakeSource::default();
        let notion = FakeNotion::default();
        let categories = default_categories();
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let report = run_page_mode(&pipeline, &notion, "root", false).await.unwrap();

        assert!(notion.appended.borrow().is_empty());
        assert_eq!(report.published, 0);
        // Every engine of every category was still queried once.
        assert_eq!(source.queries.borrow().len(), 10);
    }

    #[tokio::test]
    async fn test_page_mode_resolution_failure_aborts_before_search() {
        let source = FakeSource::default().answer("google", vec![result("x")]);
        let notion = FakeNotion {
            fail_search: true,
            fail_create_containing: Some("Notícias de IA".into()),
            ..Default::default()
        };
        let categories = default_categories();
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let err = run_page_mode(&pipeline, &notion, "root", false)
            .await
            .unwrap_err();

        assert_eq!(err.title, "Notícias de IA - 18/10/2026");
        assert!(source.queries.borrow().is_empty());
        assert!(notion.appended.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_page_mode_append_failure_is_reported() {
        let source = FakeSource::default().answer("google", vec![result("x")]);
        let notion = FakeNotion {
            fail_append: true,
            ..Default::default()
        };
        let categories = vec![category("A", &["google"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let report = run_page_mode(&pipeline, &notion, "root", false).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.published, 0);
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_notion_calls() {
        let source = FakeSource::default().answer("google", vec![result("x")]);
        let notion = FakeNotion::default();
        let categories = default_categories();

        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());
        let report = run_page_mode(&pipeline, &notion, "root", true).await.unwrap();
        assert!(report.dry_run);
        assert!(report.item_count() > 0);

        let pipeline = Pipeline::new(&source, &categories, PublishMode::Database, now());
        run_database_mode(&pipeline, &notion, "db", true).await;

        assert!(notion.searches.borrow().is_empty());
        assert!(notion.created.borrow().is_empty());
        assert!(notion.appended.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_at_most_two_items_per_engine() {
        let source = FakeSource::default()
            .answer("google", (0..7).map(|i| result(&format!("g{i}"))).collect())
            .answer("reddit", (0..3).map(|i| result(&format!("r{i}"))).collect());
        let categories = vec![category("A", &["google", "reddit"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let batch = pipeline.collect_category(&categories[0]).await;
        let titles: Vec<_> = batch.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["g0", "g1", "r0", "r1"]);
        assert_eq!(batch.items[2].source_label, "Reddit");
    }

    #[tokio::test]
    async fn test_failed_engine_does_not_stop_category() {
        let source = FakeSource::default()
            .fail("google")
            .answer("twitter", vec![result("post")]);
        let categories = vec![category("A", &["google", "twitter"])];
        let pipeline = Pipeline::new(&source, &categories, PublishMode::Page, now());

        let batch = pipeline.collect_category(&categories[0]).await;
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].source_label, "X.com");
        assert_eq!(source.queries.borrow().len(), 2);
    }
}
