//! Hacker News RSS client.
//!
//! Default feed: https://hnrss.org/newest?points=100 (stories above 100 points)

use async_trait::async_trait;
use cockpit_common::sandbox::SandboxClient as Client;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{info, instrument, warn};

use crate::models::FeedItem;
use super::FeedSource;

pub const DEFAULT_FEED_URL: &str = "https://hnrss.org/newest?points=100";

pub struct HnRssClient {
    client: Client,
    url: String,
}

impl HnRssClient {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let url = url.into();
        let mut client = Client::new()?;
        client.allow_url_host(&url)?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl FeedSource for HnRssClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> anyhow::Result<Vec<FeedItem>> {
        info!("Fetching RSS feed from {}", self.url);
        let xml = self.client
            .get(&self.url)?
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let items = parse_rss(&xml);
        info!("Found {} articles in feed.", items.len());
        Ok(items)
    }
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Title,
    Link,
    Comments,
    Published,
}

fn push_field(item: &mut FeedItem, field: Field, text: &str) {
    let target = match field {
        Field::Id        => &mut item.id,
        Field::Title     => &mut item.title,
        Field::Link      => &mut item.link,
        Field::Comments  => &mut item.comments_link,
        Field::Published => &mut item.published,
    };
    target.push_str(text);
}

/// Parse an RSS 2.0 document into feed items.
/// Malformed XML keeps whatever items were complete before the error.
pub fn parse_rss(xml: &str) -> Vec<FeedItem> {
    let mut items = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<FeedItem> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                field = match e.name().as_ref() {
                    b"item" => {
                        current = Some(FeedItem::default());
                        None
                    }
                    b"guid"     => Some(Field::Id),
                    b"title"    => Some(Field::Title),
                    b"link"     => Some(Field::Link),
                    b"comments" => Some(Field::Comments),
                    b"pubDate"  => Some(Field::Published),
                    _ => None,
                };
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    let text = e.unescape().unwrap_or_default();
                    push_field(item, f, &text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let (Some(item), Some(f)) = (current.as_mut(), field) {
                    push_field(item, f, &String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"item" {
                    if let Some(mut item) = current.take() {
                        if item.title.trim().is_empty() {
                            item.title = "No Title".to_string();
                        }
                        items.push(item);
                    }
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Feed parser reported an error: {}", e);
                break;
            }
            _ => {}
        }
    }

    items
}
