//! Tech Watch module: latest digests and articles collected by the
//! tech-watch bot.

use std::sync::Arc;

use async_trait::async_trait;
use cockpit_db::{create_client, Article, ArticleRepository, Digest, DigestRepository};
use futures_util::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::handlers::layout::escape;
use crate::registry::{Icon, ModuleCategory, ModuleComponent, ModuleDescriptor, ModuleError};

pub const ID: &str = "tech-watch";

const DIGEST_LIMIT: usize = 3;
const ARTICLE_LIMIT: usize = 20;

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(ID, "Tech Watch", load)
        .description("Daily Hacker News digest with AI analysis")
        .icon(Icon::Newspaper)
        .category(ModuleCategory::Productivity)
        .tags(["ai", "news", "rss"])
}

fn load() -> BoxFuture<'static, Arc<dyn ModuleComponent>> {
    async { Arc::new(TechWatchModule) as Arc<dyn ModuleComponent> }.boxed()
}

pub struct TechWatchModule;

#[async_trait]
impl ModuleComponent for TechWatchModule {
    async fn render(&self) -> Result<String, ModuleError> {
        let client = create_client()?;
        let digests = DigestRepository::new(client.clone()).latest(DIGEST_LIMIT).await?;
        let articles = ArticleRepository::new(client).latest(ARTICLE_LIMIT).await?;
        debug!("Tech watch: {} digests, {} articles", digests.len(), articles.len());
        Ok(render_view(&digests, &articles))
    }
}

fn day(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

pub fn render_view(digests: &[Digest], articles: &[Article]) -> String {
    let digest_html: String = if digests.is_empty() {
        r#"<p class="text-muted">No digest yet. The collector has not run.</p>"#.to_string()
    } else {
        digests
            .iter()
            .map(|d| {
                format!(
                    r#"
    <section class="card">
        <h2>Digest of {}</h2>
        <span class="badge">{} articles</span>
        <div class="digest-summary">{}</div>
    </section>"#,
                    day(&d.period_start),
                    d.article_ids.len(),
                    escape(&d.summary),
                )
            })
            .collect()
    };

    let article_rows: String = if articles.is_empty() {
        r#"<li class="text-muted">No articles collected yet.</li>"#.to_string()
    } else {
        articles
            .iter()
            .map(|a| {
                let analysis = a
                    .summary
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        format!(
                            r#"<details><summary>Analysis</summary><div class="digest-summary">{}</div></details>"#,
                            escape(s)
                        )
                    })
                    .unwrap_or_default();
                format!(
                    r#"
            <li>
                <a href="{}" target="_blank" rel="noopener">{}</a>
                <span class="badge">{}</span>{}
                {}
            </li>"#,
                    escape(&a.url),
                    escape(&a.title),
                    day(a.published_at.as_deref().unwrap_or(a.collected_at.as_str())),
                    if a.read { "" } else { r#"<span class="badge">new</span>"# },
                    analysis,
                )
            })
            .collect()
    };

    format!(
        r#"<div class="module-stack">{digest_html}
    <section class="card">
        <h2>Latest articles</h2>
        <ul class="article-list">{article_rows}
        </ul>
    </section>
</div>"#
    )
}
