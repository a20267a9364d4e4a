//! Cockpit backend layer
//!
//! A thin PostgREST client for the Supabase project behind the dashboard.
//!
//! # Example
//!
//! ```rust,no_run
//! use cockpit_db::{create_client, ArticleRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fails fast when NEXT_PUBLIC_SUPABASE_URL / NEXT_PUBLIC_SUPABASE_ANON_KEY are unset
//!     let client = create_client()?;
//!     let articles = ArticleRepository::new(client).latest(10).await?;
//!     println!("{} articles", articles.len());
//!     Ok(())
//! }
//! ```

pub mod articles;
pub mod client;
pub mod digests;
pub mod error;
pub mod query;
pub mod schema;

pub use articles::{ArticleDraft, ArticleRepository};
pub use client::{create_client, create_client_with, create_service_client, SupabaseClient};
pub use digests::{DigestOutcome, DigestRepository};
pub use error::{ConfigError, DbError, Result};
pub use query::QueryBuilder;
pub use schema::{Article, Digest, NewArticle, NewDigest, TABLE_ARTICLES, TABLE_DIGESTS};
