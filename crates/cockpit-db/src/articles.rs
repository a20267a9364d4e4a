//! Article repository.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::client::SupabaseClient;
use crate::error::Result;
use crate::schema::{truncate_chars, Article, NewArticle, SOURCE_HACKER_NEWS, TABLE_ARTICLES};

/// Repository for article operations.
#[derive(Clone)]
pub struct ArticleRepository {
    client: SupabaseClient,
}

/// Fields the collector knows about an article before it is stored.
#[derive(Debug, Clone)]
pub struct ArticleDraft<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub content: &'a str,
    pub analysis: &'a str,
    pub published_at: Option<&'a str>,
}

#[derive(Deserialize)]
struct UrlRow {
    url: String,
}

#[derive(Deserialize)]
struct IdRow {
    id: String,
}

impl ArticleRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// URLs already stored for `user_id`.
    #[instrument(skip(self))]
    pub async fn processed_urls(&self, user_id: &str) -> Result<Vec<String>> {
        let rows: Vec<UrlRow> = self
            .client
            .from(TABLE_ARTICLES)
            .select("url")
            .eq("user_id", user_id)
            .execute()
            .await?;
        Ok(rows.into_iter().map(|r| r.url).collect())
    }

    /// Insert an article, returning the id assigned by the backend.
    #[instrument(skip(self, article), fields(title = %article.title))]
    pub async fn insert(&self, article: &NewArticle) -> Result<Option<String>> {
        let rows: Vec<IdRow> = self
            .client
            .from(TABLE_ARTICLES)
            .insert(std::slice::from_ref(article))
            .await?;
        let id = rows.into_iter().next().map(|r| r.id);
        if let Some(ref id) = id {
            info!("Article saved with ID: {}", id);
        }
        Ok(id)
    }

    /// Most recently collected articles.
    #[instrument(skip(self))]
    pub async fn latest(&self, limit: usize) -> Result<Vec<Article>> {
        self.client
            .from(TABLE_ARTICLES)
            .select("*")
            .order("collected_at", false)
            .limit(limit)
            .execute()
            .await
    }
}

impl NewArticle {
    /// Builds an unread Hacker News article row, truncating stored content to `content_limit` chars.
    pub fn from_draft(
        user_id: &str,
        draft: &ArticleDraft<'_>,
        content_limit: usize,
        collected_at: DateTime<Utc>,
    ) -> Self {
        let content = if draft.content.is_empty() {
            None
        } else {
            Some(truncate_chars(draft.content, content_limit).to_string())
        };
        Self {
            user_id: user_id.to_string(),
            title: draft.title.to_string(),
            url: draft.url.to_string(),
            source: SOURCE_HACKER_NEWS.to_string(),
            content,
            summary: draft.analysis.to_string(),
            tags: Vec::new(),
            published_at: draft.published_at.filter(|p| !p.is_empty()).map(String::from),
            collected_at: collected_at.to_rfc3339(),
            read: false,
        }
    }
}
