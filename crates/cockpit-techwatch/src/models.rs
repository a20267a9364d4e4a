//! Data models for the tech-watch collector.

use serde::{Deserialize, Serialize};

/// One entry of the Hacker News RSS feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// `<guid>`; for hnrss this is usually the discussion URL.
    pub id: String,
    pub title: String,
    pub link: String,
    pub comments_link: String,
    /// Raw `<pubDate>` text, empty when absent.
    pub published: String,
}

/// A top-level discussion comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

/// An article that made it through scraping and analysis in this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedArticle {
    pub title: String,
    pub url: String,
    pub comments_url: String,
    pub analysis: String,
}
