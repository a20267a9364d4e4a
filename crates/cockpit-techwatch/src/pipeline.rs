//! One collector run: feed → filter → scrape → comments → analyze → store → digest.
//!
//! Articles are processed sequentially. Failures on a single article are
//! logged and the article is skipped; nothing here aborts the batch.

use chrono::NaiveDate;
use cockpit_db::ArticleDraft;
use cockpit_llm::LlmBackend;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::analyzer::analyze_article;
use crate::digest::build_digest_summary;
use crate::extract::ContentExtractor;
use crate::models::ProcessedArticle;
use crate::sources::{CommentSource, FeedSource};
use crate::store::ArticleStore;

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub comment_limit: usize,
    pub content_char_limit: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { comment_limit: 5, content_char_limit: 15_000 }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub feed_items: usize,
    pub new_items: usize,
    pub processed: usize,
    pub skipped: usize,
    pub digest_written: bool,
}

pub struct TechWatchPipeline {
    feed: Arc<dyn FeedSource>,
    extractor: Arc<dyn ContentExtractor>,
    comments: Arc<dyn CommentSource>,
    analyzer: Option<Arc<dyn LlmBackend>>,
    store: Arc<dyn ArticleStore>,
    settings: PipelineSettings,
}

impl TechWatchPipeline {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        extractor: Arc<dyn ContentExtractor>,
        comments: Arc<dyn CommentSource>,
        store: Arc<dyn ArticleStore>,
    ) -> Self {
        Self {
            feed,
            extractor,
            comments,
            analyzer: None,
            store,
            settings: PipelineSettings::default(),
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn LlmBackend>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn run(&self, today: NaiveDate) -> PipelineReport {
        let mut report = PipelineReport::default();

        let processed_urls: HashSet<String> = match self.store.processed_urls().await {
            Ok(urls) => urls.into_iter().collect(),
            Err(e) => {
                error!("Error fetching processed URLs: {}", e);
                HashSet::new()
            }
        };
        info!("Found {} already processed articles in database.", processed_urls.len());

        let items = match self.feed.fetch().await {
            Ok(items) => items,
            Err(e) => {
                error!("Error fetching RSS feed: {}", e);
                Vec::new()
            }
        };
        report.feed_items = items.len();

        let new_items: Vec<_> = items
            .into_iter()
            .filter(|item| !processed_urls.contains(&item.link))
            .collect();
        report.new_items = new_items.len();
        info!("Found {} new articles to process.", new_items.len());

        if new_items.is_empty() {
            info!("No new articles. Exiting.");
            return report;
        }

        let mut processed: Vec<ProcessedArticle> = Vec::new();
        let mut article_ids: Vec<String> = Vec::new();

        for item in &new_items {
            info!("Processing: {}", item.title);

            let Some(content) = self.extractor.extract(&item.link).await else {
                warn!("Skipping {} - content extraction failed.", item.title);
                report.skipped += 1;
                continue;
            };

            let comments = match self
                .comments
                .top_comments(&item.comments_link, self.settings.comment_limit)
                .await
            {
                Ok(comments) => comments,
                Err(e) => {
                    error!("Error fetching HN comments: {}", e);
                    Vec::new()
                }
            };
            if comments.is_empty() {
                warn!(
                    "No comments found for {} (or extraction failed). Proceeding with content only.",
                    item.title
                );
            }

            let analysis = analyze_article(
                self.analyzer.as_deref(),
                &content,
                &comments,
                &item.title,
                self.settings.content_char_limit,
            )
            .await;

            let draft = ArticleDraft {
                title: &item.title,
                url: &item.link,
                content: &content,
                analysis: &analysis,
                published_at: Some(item.published.as_str()),
            };

            match self.store.save_article(&draft).await {
                Ok(Some(id)) => {
                    article_ids.push(id);
                    processed.push(ProcessedArticle {
                        title: item.title.clone(),
                        url: item.link.clone(),
                        comments_url: item.comments_link.clone(),
                        analysis,
                    });
                }
                Ok(None) => {
                    warn!("Article '{}' was not stored", item.title);
                    report.skipped += 1;
                }
                Err(e) => {
                    error!("Error saving article '{}': {}", item.title, e);
                    report.skipped += 1;
                }
            }
        }

        report.processed = processed.len();

        if !processed.is_empty() {
            let summary = build_digest_summary(&processed);
            match self.store.save_digest(today, &summary, &article_ids).await {
                Ok(()) => report.digest_written = true,
                Err(e) => error!("Error saving digest for {}: {}", today, e),
            }
        }

        info!("Batch processing complete. Processed {} articles.", report.processed);
        report
    }
}
