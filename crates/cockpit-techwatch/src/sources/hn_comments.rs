//! Hacker News discussion comments via the Algolia items API.
//!
//! The feed's comments link looks like `https://news.ycombinator.com/item?id=123456`.
//! The item id is extracted and resolved against:
//!   https://hn.algolia.com/api/v1/items/{id}

use async_trait::async_trait;
use cockpit_common::sandbox::SandboxClient as Client;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

use crate::models::Comment;
use super::CommentSource;

const ALGOLIA_ITEMS_URL: &str = "https://hn.algolia.com/api/v1/items";

static ITEM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=(\d+)").expect("valid item id pattern"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

pub struct AlgoliaCommentsClient {
    client: Client,
}

impl AlgoliaCommentsClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { client: Client::new()? })
    }
}

#[async_trait]
impl CommentSource for AlgoliaCommentsClient {
    #[instrument(skip(self))]
    async fn top_comments(&self, comments_url: &str, limit: usize) -> anyhow::Result<Vec<Comment>> {
        let Some(item_id) = extract_item_id(comments_url) else {
            warn!("Could not extract HN Item ID from {}", comments_url);
            return Ok(vec![]);
        };

        let api_url = format!("{}/{}", ALGOLIA_ITEMS_URL, item_id);
        info!("Fetching comments from Algolia API: {}", api_url);

        let item: serde_json::Value = self.client
            .get(&api_url)?
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(select_comments(&item, limit))
    }
}

pub fn extract_item_id(comments_url: &str) -> Option<&str> {
    ITEM_ID
        .captures(comments_url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// First `limit` children that still have both text and author (deleted comments have neither).
pub fn select_comments(item: &serde_json::Value, limit: usize) -> Vec<Comment> {
    item["children"]
        .as_array()
        .map(|children| {
            children
                .iter()
                .filter_map(|child| {
                    let text = child["text"].as_str().filter(|t| !t.is_empty())?;
                    let author = child["author"].as_str().filter(|a| !a.is_empty())?;
                    Some(Comment { author: author.to_string(), text: clean_comment_html(text) })
                })
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

/// Paragraph tags become newlines; every other tag is dropped.
pub fn clean_comment_html(text: &str) -> String {
    let text = text.replace("<p>", "\n").replace("</p>", "");
    HTML_TAG.replace_all(&text, "").trim().to_string()
}
