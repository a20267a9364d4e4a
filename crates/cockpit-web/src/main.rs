//! Cockpit Web Server
//!
//! Run with: cargo run -p cockpit-web --bin cockpit-web

use cockpit_config::CockpitConfig;
use cockpit_web::{modules::default_registry, router::build_router, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cockpit_config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cockpit=debug,info")),
        )
        .init();

    info!("Starting Cockpit Web Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = CockpitConfig::load()?;

    let registry = default_registry(&config.modules)?;
    let enabled: Vec<&str> = registry.enabled().map(|m| m.id.as_str()).collect();
    info!("Module registry ready: {} registered, enabled: {:?}", registry.len(), enabled);

    let state = AppState::new(registry, config.server.static_dir.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
