//! External sources the collector reads from.

pub mod hn_comments;
pub mod hn_rss;

use async_trait::async_trait;
use crate::models::{Comment, FeedItem};

/// A feed of candidate articles.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<FeedItem>>;
}

/// Top-level comments for a discussion page.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn top_comments(&self, comments_url: &str, limit: usize) -> anyhow::Result<Vec<Comment>>;
}
