//! Database error types.

use cockpit_common::CockpitError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// Raised by the client factory when credentials are absent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {url_var} or {key_var} environment variables")]
    MissingEnv {
        url_var: &'static str,
        key_var: &'static str,
    },

    #[error("Failed to prepare backend client: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Sandbox(#[from] CockpitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PostgREST error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
