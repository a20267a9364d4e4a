//! cockpit-common — Shared error type and HTTP plumbing used across all Cockpit crates.

pub mod error;
pub mod sandbox;

pub use error::{CockpitError, Result};
pub use sandbox::SandboxClient;
