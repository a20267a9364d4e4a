//! Static export: renders every enabled module to
//! `{out}/modules/{id}/index.html` and writes `{out}/static-params.json`.
//!
//! Run with: cargo run -p cockpit-web --bin cockpit-prerender -- [out-dir]

use std::path::{Path, PathBuf};

use anyhow::Context;
use cockpit_config::CockpitConfig;
use cockpit_web::handlers::module::render_module_page;
use cockpit_web::modules::default_registry;
use cockpit_web::ModuleRegistry;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUT_DIR: &str = "out";

/// Writes the export and returns the pages written.
async fn export(registry: &ModuleRegistry, out: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for module in registry.enabled() {
        let dir = out.join("modules").join(&module.id);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;

        let html = render_module_page(registry, module).await;
        let path = dir.join("index.html");
        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Rendered {} -> {}", module.route, path.display());
        written.push(path);
    }

    let params = serde_json::to_string_pretty(&registry.generate_static_params())?;
    tokio::fs::write(out.join("static-params.json"), params).await?;

    Ok(written)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cockpit_config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cockpit=debug,info")),
        )
        .init();

    let out = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));

    let config = CockpitConfig::load()?;
    let registry = default_registry(&config.modules)?;

    tokio::fs::create_dir_all(&out).await?;
    let written = export(&registry, &out).await?;
    info!("Static export complete: {} pages in {}", written.len(), out.display());

    Ok(())
}
