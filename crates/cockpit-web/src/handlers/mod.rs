//! HTTP handlers for all web routes.

pub mod api;
pub mod dashboard;
pub mod layout;
pub mod loading;
pub mod module;

use crate::error::WebError;

/// Router fallback for unmatched paths.
pub async fn not_found() -> WebError {
    WebError::NotFound
}
