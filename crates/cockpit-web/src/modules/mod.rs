//! Built-in dashboard modules.
//!
//! Each stanza declares a descriptor and a loader; the loader is only run
//! the first time the module is rendered.

pub mod tech_watch;
pub mod template;

use std::collections::BTreeMap;

use crate::registry::{ModuleRegistry, RegistryError};

/// The deployment's registry: every built-in module, with `[modules]`
/// overrides from configuration applied.
pub fn default_registry(overrides: &BTreeMap<String, bool>) -> Result<ModuleRegistry, RegistryError> {
    ModuleRegistry::builder()
        .register(tech_watch::descriptor())
        .register(template::descriptor())
        .apply_overrides(overrides)
        .build()
}
