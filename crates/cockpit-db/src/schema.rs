//! Row types for the tech-watch tables.

use serde::{Deserialize, Deserializer, Serialize};

pub const TABLE_ARTICLES: &str = "tech_watch_articles";
pub const TABLE_DIGESTS: &str = "tech_watch_digests";

/// Source tag stored on every article collected from Hacker News.
pub const SOURCE_HACKER_NEWS: &str = "hacker_news";

/// A stored article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    pub collected_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
}

/// Insert payload for [`Article`]; the backend assigns `id`.
#[derive(Debug, Clone, Serialize)]
pub struct NewArticle {
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub content: Option<String>,
    pub summary: String,
    pub tags: Vec<String>,
    pub published_at: Option<String>,
    pub collected_at: String,
    pub read: bool,
}

/// A daily digest of analysed articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Digest {
    pub id: String,
    pub user_id: String,
    pub period_start: String,
    pub period_end: String,
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub article_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDigest {
    pub user_id: String,
    pub period_start: String,
    pub period_end: String,
    pub summary: String,
    pub article_ids: Vec<String>,
    pub key_topics: Vec<String>,
}

/// Nullable array/boolean columns read as their empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns at most `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
