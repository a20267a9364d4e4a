//! tech-watch-bot — one collector run, meant to be scheduled daily.
//!
//! Run with: cargo run -p cockpit-techwatch --bin tech-watch-bot

use std::sync::Arc;

use anyhow::Context;
use cockpit_config::CockpitConfig;
use cockpit_db::create_service_client;
use cockpit_llm::{GeminiBackend, LlmBackend};
use cockpit_techwatch::extract::ArticleScraper;
use cockpit_techwatch::sources::{hn_comments::AlgoliaCommentsClient, hn_rss::HnRssClient};
use cockpit_techwatch::store::SupabaseStore;
use cockpit_techwatch::{PipelineSettings, TechWatchPipeline};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USER_ID_ENV: &str = "USER_ID";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cockpit_config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cockpit=debug,info")),
        )
        .init();

    info!("Starting Tech Watch Bot...");

    let config = CockpitConfig::load()?;
    let tw = &config.tech_watch;

    let client = create_service_client()?;
    let user_id = std::env::var(USER_ID_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("Missing {USER_ID_ENV} environment variable"))?;

    let store = SupabaseStore::new(client, user_id, tw.stored_content_limit);
    let mut pipeline = TechWatchPipeline::new(
        Arc::new(HnRssClient::new(tw.feed_url.clone())?),
        Arc::new(ArticleScraper::new()?),
        Arc::new(AlgoliaCommentsClient::new()?),
        Arc::new(store),
    )
    .with_settings(PipelineSettings {
        comment_limit: tw.comment_limit,
        content_char_limit: tw.content_char_limit,
    });

    match GeminiBackend::from_env(tw.model.clone()) {
        Ok(backend) => {
            info!("LLM backend ready: {}", backend.model_id());
            pipeline = pipeline.with_analyzer(Arc::new(backend));
        }
        Err(e) => warn!("LLM backend unavailable, analyses will carry an error note: {e}"),
    }

    let report = pipeline.run(chrono::Local::now().date_naive()).await;
    info!(
        feed_items = report.feed_items,
        new_items = report.new_items,
        processed = report.processed,
        skipped = report.skipped,
        digest_written = report.digest_written,
        "Tech watch run finished"
    );

    Ok(())
}
