//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use crate::registry::ModuleRegistry;

/// Shared state injected into every Axum handler. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModuleRegistry>,
    /// Served under `/static`.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(registry: ModuleRegistry, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: Arc::new(registry),
            static_dir: static_dir.into(),
        }
    }
}

pub type SharedState = Arc<AppState>;
