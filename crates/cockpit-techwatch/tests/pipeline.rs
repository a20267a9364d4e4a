//! End-to-end collector run against in-memory sources and store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use cockpit_db::ArticleDraft;
use cockpit_llm::{LlmBackend, LlmError, LlmRequest, LlmResponse};
use cockpit_techwatch::extract::ContentExtractor;
use cockpit_techwatch::models::{Comment, FeedItem};
use cockpit_techwatch::sources::{CommentSource, FeedSource};
use cockpit_techwatch::store::ArticleStore;
use cockpit_techwatch::{PipelineReport, PipelineSettings, TechWatchPipeline};

struct StaticFeed(Vec<FeedItem>);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> anyhow::Result<Vec<FeedItem>> {
        Ok(self.0.clone())
    }
}

struct FailingFeed;

#[async_trait]
impl FeedSource for FailingFeed {
    async fn fetch(&self) -> anyhow::Result<Vec<FeedItem>> {
        anyhow::bail!("connection reset")
    }
}

/// Pages keyed by URL; anything else fails to extract.
struct Pages(HashMap<String, String>);

#[async_trait]
impl ContentExtractor for Pages {
    async fn extract(&self, url: &str) -> Option<String> {
        self.0.get(url).cloned()
    }
}

struct Discussions {
    seen_limits: Mutex<Vec<usize>>,
}

#[async_trait]
impl CommentSource for Discussions {
    async fn top_comments(&self, comments_url: &str, limit: usize) -> anyhow::Result<Vec<Comment>> {
        self.seen_limits.lock().unwrap().push(limit);
        if comments_url.ends_with("=2") {
            return Ok(vec![]);
        }
        Ok(vec![Comment { author: "dang".into(), text: "Solid write-up.".into() }])
    }
}

struct EchoBackend;

#[async_trait]
impl LlmBackend for EchoBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let user = &req.messages[1].content;
        let title = user
            .lines()
            .next()
            .and_then(|l| l.strip_prefix("Titre de l'article : "))
            .unwrap_or_default();
        Ok(LlmResponse {
            content: format!("Verdict for {title}"),
            model: "echo".into(),
            prompt_tokens: 0,
            completion_tokens: 0,
        })
    }
    fn model_id(&self) -> &str { "echo" }
}

#[derive(Default)]
struct MemoryStore {
    existing: Vec<String>,
    fail_lookup: bool,
    articles: Mutex<Vec<(String, String, String)>>,
    digests: Mutex<Vec<(NaiveDate, String, Vec<String>)>>,
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn processed_urls(&self) -> anyhow::Result<Vec<String>> {
        if self.fail_lookup {
            anyhow::bail!("permission denied");
        }
        Ok(self.existing.clone())
    }

    async fn save_article(&self, draft: &ArticleDraft<'_>) -> anyhow::Result<Option<String>> {
        let mut articles = self.articles.lock().unwrap();
        articles.push((draft.url.to_string(), draft.content.to_string(), draft.analysis.to_string()));
        Ok(Some(format!("art-{}", articles.len())))
    }

    async fn save_digest(&self, date: NaiveDate, summary: &str, article_ids: &[String]) -> anyhow::Result<()> {
        self.digests
            .lock()
            .unwrap()
            .push((date, summary.to_string(), article_ids.to_vec()));
        Ok(())
    }
}

fn item(n: u32) -> FeedItem {
    FeedItem {
        id: format!("https://news.ycombinator.com/item?id={n}"),
        title: format!("Story {n}"),
        link: format!("https://blog.example/{n}"),
        comments_link: format!("https://news.ycombinator.com/item?id={n}"),
        published: "Mon, 06 Jan 2025 10:00:00 +0000".into(),
    }
}

fn pages(ids: &[u32]) -> Pages {
    Pages(
        ids.iter()
            .map(|n| (format!("https://blog.example/{n}"), format!("Body of story {n}")))
            .collect(),
    )
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

#[tokio::test]
async fn test_run_filters_skips_and_writes_digest() {
    let store = Arc::new(MemoryStore {
        existing: vec!["https://blog.example/1".into()],
        ..Default::default()
    });
    let comments = Arc::new(Discussions { seen_limits: Mutex::new(vec![]) });

    let pipeline = TechWatchPipeline::new(
        Arc::new(StaticFeed(vec![item(1), item(2), item(3), item(4)])),
        // Story 4 cannot be scraped.
        Arc::new(pages(&[1, 2, 3])),
        comments.clone(),
        store.clone(),
    )
    .with_analyzer(Arc::new(EchoBackend))
    .with_settings(PipelineSettings { comment_limit: 3, content_char_limit: 100 });

    let report = pipeline.run(day()).await;
    assert_eq!(
        report,
        PipelineReport {
            feed_items: 4,
            new_items: 3,
            processed: 2,
            skipped: 1,
            digest_written: true,
        }
    );

    let articles = store.articles.lock().unwrap();
    let urls: Vec<&str> = articles.iter().map(|(u, _, _)| u.as_str()).collect();
    assert_eq!(urls, ["https://blog.example/2", "https://blog.example/3"]);
    assert_eq!(articles[0].1, "Body of story 2");
    assert_eq!(articles[0].2, "Verdict for Story 2");

    // Story 4 has no extractable text and is skipped before its comments are fetched.
    assert_eq!(*comments.seen_limits.lock().unwrap(), vec![3, 3]);

    let digests = store.digests.lock().unwrap();
    assert_eq!(digests.len(), 1);
    let (date, summary, ids) = &digests[0];
    assert_eq!(*date, day());
    assert_eq!(ids, &["art-1".to_string(), "art-2".to_string()]);
    assert!(summary.contains("## [Story 2](https://blog.example/2)"));
    assert!(summary.contains("*Discussion: [Hacker News](https://news.ycombinator.com/item?id=3)*"));
    assert!(!summary.contains("Story 4"));
}

#[tokio::test]
async fn test_nothing_new_writes_no_digest() {
    let store = Arc::new(MemoryStore {
        existing: vec!["https://blog.example/1".into()],
        ..Default::default()
    });

    let pipeline = TechWatchPipeline::new(
        Arc::new(StaticFeed(vec![item(1)])),
        Arc::new(pages(&[1])),
        Arc::new(Discussions { seen_limits: Mutex::new(vec![]) }),
        store.clone(),
    );

    let report = pipeline.run(day()).await;
    assert_eq!(report.new_items, 0);
    assert!(!report.digest_written);
    assert!(store.articles.lock().unwrap().is_empty());
    assert!(store.digests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_backend_stores_error_analysis() {
    let store = Arc::new(MemoryStore::default());

    let pipeline = TechWatchPipeline::new(
        Arc::new(StaticFeed(vec![item(7)])),
        Arc::new(pages(&[7])),
        Arc::new(Discussions { seen_limits: Mutex::new(vec![]) }),
        store.clone(),
    );

    let report = pipeline.run(day()).await;
    assert_eq!(report.processed, 1);
    assert_eq!(store.articles.lock().unwrap()[0].2, "Error: No GEMINI_API_KEY configured.");
}

#[tokio::test]
async fn test_lookup_failure_treats_everything_as_new() {
    let store = Arc::new(MemoryStore {
        existing: vec!["https://blog.example/1".into()],
        fail_lookup: true,
        ..Default::default()
    });

    let pipeline = TechWatchPipeline::new(
        Arc::new(StaticFeed(vec![item(1)])),
        Arc::new(pages(&[1])),
        Arc::new(Discussions { seen_limits: Mutex::new(vec![]) }),
        store.clone(),
    );

    assert_eq!(pipeline.run(day()).await.processed, 1);
}

#[tokio::test]
async fn test_feed_failure_is_an_empty_run() {
    let store = Arc::new(MemoryStore::default());

    let pipeline = TechWatchPipeline::new(
        Arc::new(FailingFeed),
        Arc::new(pages(&[])),
        Arc::new(Discussions { seen_limits: Mutex::new(vec![]) }),
        store.clone(),
    );

    assert_eq!(pipeline.run(day()).await, PipelineReport::default());
}
