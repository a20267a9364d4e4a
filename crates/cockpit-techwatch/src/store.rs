//! Persistence seam for the collector.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use cockpit_db::{ArticleDraft, ArticleRepository, DigestRepository, NewArticle, SupabaseClient};

/// Where processed articles and digests go, scoped to one user.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// URLs already stored; these are skipped on the next run.
    async fn processed_urls(&self) -> anyhow::Result<Vec<String>>;

    /// Returns the stored article id.
    async fn save_article(&self, draft: &ArticleDraft<'_>) -> anyhow::Result<Option<String>>;

    async fn save_digest(&self, date: NaiveDate, summary: &str, article_ids: &[String]) -> anyhow::Result<()>;
}

pub struct SupabaseStore {
    articles: ArticleRepository,
    digests: DigestRepository,
    user_id: String,
    stored_content_limit: usize,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient, user_id: impl Into<String>, stored_content_limit: usize) -> Self {
        Self {
            articles: ArticleRepository::new(client.clone()),
            digests: DigestRepository::new(client),
            user_id: user_id.into(),
            stored_content_limit,
        }
    }
}

#[async_trait]
impl ArticleStore for SupabaseStore {
    async fn processed_urls(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.articles.processed_urls(&self.user_id).await?)
    }

    async fn save_article(&self, draft: &ArticleDraft<'_>) -> anyhow::Result<Option<String>> {
        let row = NewArticle::from_draft(&self.user_id, draft, self.stored_content_limit, Utc::now());
        Ok(self.articles.insert(&row).await?)
    }

    async fn save_digest(&self, date: NaiveDate, summary: &str, article_ids: &[String]) -> anyhow::Result<()> {
        self.digests
            .upsert_daily(&self.user_id, date, summary, article_ids, &[])
            .await?;
        Ok(())
    }
}
