//! JSON endpoints over the registry, plus the health probe.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::registry::{ModuleSummary, StaticParam};
use crate::state::SharedState;

/// `GET /api/modules`
pub async fn api_modules(State(state): State<SharedState>) -> Json<Vec<ModuleSummary>> {
    Json(state.registry.enabled().map(|m| m.summary()).collect())
}

/// `GET /api/modules/static-params`
pub async fn api_static_params(State(state): State<SharedState>) -> Json<Vec<StaticParam>> {
    Json(state.registry.generate_static_params())
}

/// `GET /health`
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "modules": state.registry.enabled().count(),
    }))
}
