//! Configuration loading for Cockpit.
//! Reads cockpit.toml from the current directory or the path in the COCKPIT_CONFIG env var.
//! Secrets never live here: backend credentials are read from the environment at call sites.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "COCKPIT_CONFIG";
pub const BIND_ENV: &str = "COCKPIT_BIND";
const DEFAULT_CONFIG_PATH: &str = "cockpit.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CockpitConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Per-deployment module enablement overrides, keyed by module id.
    #[serde(default)]
    pub modules: BTreeMap<String, bool>,
    #[serde(default)]
    pub tech_watch: TechWatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: default_static_dir() }
    }
}

fn default_bind()       -> String { "0.0.0.0:3000".to_string() }
fn default_static_dir() -> String { "static".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechWatchConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    #[serde(default = "default_comment_limit")]
    pub comment_limit: usize,
    /// Characters of article text sent to the analyzer.
    #[serde(default = "default_content_char_limit")]
    pub content_char_limit: usize,
    /// Characters of article text persisted with the article row.
    #[serde(default = "default_stored_content_limit")]
    pub stored_content_limit: usize,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for TechWatchConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            comment_limit: default_comment_limit(),
            content_char_limit: default_content_char_limit(),
            stored_content_limit: default_stored_content_limit(),
            model: default_model(),
        }
    }
}

fn default_feed_url()             -> String { "https://hnrss.org/newest?points=100".to_string() }
fn default_comment_limit()        -> usize  { 5 }
fn default_content_char_limit()   -> usize  { 15_000 }
fn default_stored_content_limit() -> usize  { 50_000 }
fn default_model()                -> String { "gemini-2.5-flash".to_string() }


/// Loads `.env` into the process environment if present. Existing variables win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring malformed .env file: {e}"),
    }
}

impl CockpitConfig {
    /// Load configuration from cockpit.toml.
    /// Checks COCKPIT_CONFIG env var first, then the current directory.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            info!("Loading config from {}", path);
            Self::from_path(&path)?
        } else {
            info!("No config file at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: CockpitConfig = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var(BIND_ENV) {
            if !bind.trim().is_empty() {
                self.server.bind = bind;
            }
        }
    }
}
