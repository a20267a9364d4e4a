//! Main-text extraction for linked articles.
//!
//! Picks the most specific content root (`article`, `main`, `[role=main]`,
//! then `body`) and keeps text blocks outside navigation chrome. Tables are
//! kept.

use async_trait::async_trait;
use cockpit_common::sandbox::SandboxClient as Client;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{info, instrument, warn};

static ROOTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", "[role=main]", "body"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid root selector"))
        .collect()
});
static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, p, li, pre, blockquote, td, th").expect("valid block selector")
});
static CHROME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("nav, header, footer, aside, script, style, noscript, form").expect("valid chrome selector")
});

/// Fetches a page and returns its readable text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Option<String>;
}

pub struct ArticleScraper {
    client: Client,
}

impl ArticleScraper {
    pub fn new() -> anyhow::Result<Self> {
        // Article links point anywhere on the web.
        Ok(Self { client: Client::permissive()? })
    }

    async fn download(&self, url: &str) -> anyhow::Result<String> {
        let html = self.client
            .get(url)?
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[async_trait]
impl ContentExtractor for ArticleScraper {
    #[instrument(skip(self))]
    async fn extract(&self, url: &str) -> Option<String> {
        info!("Downloading content from {}", url);
        let html = match self.download(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to download content from {}: {}", url, e);
                return None;
            }
        };

        let text = extract_main_text(&html);
        if text.is_none() {
            warn!("Could not extract text from {}", url);
        }
        text
    }
}

fn inside_chrome_or_block(el: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| a.id() != root.id())
        .any(|a| CHROME.matches(&a) || BLOCKS.matches(&a))
}

/// Extract readable text from an HTML document. `None` when nothing readable is found.
pub fn extract_main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let root = ROOTS
        .iter()
        .find_map(|sel| document.select(sel).next())?;

    let blocks: Vec<String> = root
        .select(&BLOCKS)
        .filter(|el| !inside_chrome_or_block(el, &root))
        .map(|el| {
            if el.value().name() == "pre" {
                el.text().collect::<String>().trim_end().to_string()
            } else {
                el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
            }
        })
        .filter(|t| !t.is_empty())
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}
