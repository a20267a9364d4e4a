//! cockpit-techwatch — the tech-watch collector.
//!
//! Reads the Hacker News front-page feed, pulls the linked article and the
//! top-level discussion, asks the LLM for a verdict and stores the result
//! together with a daily digest:
//!   - `sources`  — RSS feed and Algolia comments
//!   - `extract`  — main-text extraction for linked pages
//!   - `analyzer` — prompt building and LLM call
//!   - `digest`   — markdown digest of one run
//!   - `store`    — persistence seam over `cockpit-db`
//!   - `pipeline` — one end-to-end run

pub mod analyzer;
pub mod digest;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod store;

pub use pipeline::{PipelineReport, PipelineSettings, TechWatchPipeline};
