//! Web-layer errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::handlers::layout::{escape, page};
use crate::registry::{ModuleError, RegistryError};

#[derive(Debug, Error)]
pub enum WebError {
    /// Unknown or disabled module, or any unmatched path.
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Module(#[from] ModuleError),
}

pub fn not_found_page() -> String {
    page(
        "Not found",
        r#"<nav class="sidebar"><a href="/" class="brand">Cockpit</a></nav>"#,
        r#"<div class="page-header">
        <h1 class="page-title">404</h1>
        <p class="text-muted">This page could not be found.</p>
        <a href="/">Back to the overview</a>
    </div>"#,
    )
}

/// In-page panel shown in place of content that failed to render.
pub fn error_panel(title: &str, detail: &str) -> String {
    format!(
        r#"<div class="card error-panel" role="alert">
    <h2>{}</h2>
    <p class="text-muted">{}</p>
</div>"#,
        escape(title),
        escape(detail)
    )
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound => (StatusCode::NOT_FOUND, Html(not_found_page())).into_response(),
            other => {
                error!("Request failed: {}", other);
                let body = page(
                    "Error",
                    r#"<nav class="sidebar"><a href="/" class="brand">Cockpit</a></nav>"#,
                    &error_panel("Something went wrong", &other.to_string()),
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            }
        }
    }
}
