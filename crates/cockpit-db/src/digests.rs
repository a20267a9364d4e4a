//! Digest repository.
//!
//! One digest per user per calendar day (UTC). Re-running the collector on
//! the same day folds new articles into the existing digest.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::client::SupabaseClient;
use crate::error::Result;
use crate::schema::{Digest, NewDigest, TABLE_DIGESTS};

#[derive(Clone)]
pub struct DigestRepository {
    client: SupabaseClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestOutcome {
    Created,
    Updated,
}

#[derive(Deserialize)]
struct ExistingDigest {
    id: String,
    #[serde(default)]
    article_ids: Option<Vec<String>>,
}

/// `[{date}T00:00:00Z, {date}T23:59:59Z]`
pub fn daily_period(date: NaiveDate) -> (String, String) {
    let day = date.format("%Y-%m-%d");
    (format!("{day}T00:00:00Z"), format!("{day}T23:59:59Z"))
}

/// Union of `existing` and `new`, keeping first-seen order.
pub fn merge_article_ids(existing: &[String], new: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + new.len());
    for id in existing.iter().chain(new) {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    merged
}

impl DigestRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Create or update the digest covering `date`.
    #[instrument(skip(self, summary, article_ids, key_topics))]
    pub async fn upsert_daily(
        &self,
        user_id: &str,
        date: NaiveDate,
        summary: &str,
        article_ids: &[String],
        key_topics: &[String],
    ) -> Result<DigestOutcome> {
        let (period_start, period_end) = daily_period(date);

        let existing: Vec<ExistingDigest> = self
            .client
            .from(TABLE_DIGESTS)
            .select("id, article_ids")
            .eq("user_id", user_id)
            .gte("period_start", &period_start)
            .lte("period_end", &period_end)
            .execute()
            .await?;

        if let Some(current) = existing.into_iter().next() {
            let merged = merge_article_ids(&current.article_ids.unwrap_or_default(), article_ids);
            self.client
                .from(TABLE_DIGESTS)
                .eq("id", &current.id)
                .update(&serde_json::json!({
                    "summary": summary,
                    "article_ids": merged,
                    "key_topics": key_topics,
                }))
                .await?;
            info!("Updated digest for {}", date);
            return Ok(DigestOutcome::Updated);
        }

        let row = NewDigest {
            user_id: user_id.to_string(),
            period_start,
            period_end,
            summary: summary.to_string(),
            article_ids: article_ids.to_vec(),
            key_topics: key_topics.to_vec(),
        };
        let _: Vec<serde_json::Value> = self
            .client
            .from(TABLE_DIGESTS)
            .insert(std::slice::from_ref(&row))
            .await?;
        info!("Created new digest for {}", date);
        Ok(DigestOutcome::Created)
    }

    /// Most recent digests, newest first.
    #[instrument(skip(self))]
    pub async fn latest(&self, limit: usize) -> Result<Vec<Digest>> {
        self.client
            .from(TABLE_DIGESTS)
            .select("*")
            .order("period_start", false)
            .limit(limit)
            .execute()
            .await
    }
}
