//! cockpit-web — the dashboard front end.
//! Provides:
//!   - Module registry and lazily loaded module components
//!   - Dynamic `/modules/{id}` route with a streamed loading fallback
//!   - Loading placeholders
//!   - Registry JSON API and static export support

pub mod error;
pub mod handlers;
pub mod modules;
pub mod registry;
pub mod router;
pub mod state;

pub use error::WebError;
pub use registry::{ModuleDescriptor, ModuleRegistry};
