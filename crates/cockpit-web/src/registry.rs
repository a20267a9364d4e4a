//! Module Registry — the immutable table of dashboard modules.
//!
//! Built once at startup with [`ModuleRegistry::builder`], wrapped in `Arc`
//! and handed to the router. Lookups never fail; absence is `None`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

// ── Components ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Config(#[from] cockpit_db::ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] cockpit_db::DbError),

    #[error("Render error: {0}")]
    Render(String),
}

/// The renderable unit behind a module route.
#[async_trait]
pub trait ModuleComponent: Send + Sync {
    /// Render the module body as an HTML fragment.
    async fn render(&self) -> Result<String, ModuleError>;
}

/// Produces a module's component; invoked at most once per process.
pub type ComponentLoader = fn() -> BoxFuture<'static, Arc<dyn ModuleComponent>>;

struct LazyInner {
    loader: ComponentLoader,
    cell: OnceCell<Arc<dyn ModuleComponent>>,
}

/// Deferred handle to a module component.
///
/// The loader runs on first [`load`](Self::load); concurrent callers wait on
/// the same initialisation. Clones share the cached component.
#[derive(Clone)]
pub struct LazyComponent {
    inner: Arc<LazyInner>,
}

impl LazyComponent {
    pub fn new(loader: ComponentLoader) -> Self {
        Self {
            inner: Arc::new(LazyInner { loader, cell: OnceCell::new() }),
        }
    }

    pub async fn load(&self) -> Arc<dyn ModuleComponent> {
        self.inner
            .cell
            .get_or_init(|| (self.inner.loader)())
            .await
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.cell.initialized()
    }
}

impl fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// ── Descriptor ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Newspaper,
    Layout,
    Chart,
    Code,
    Settings,
}

impl Icon {
    /// Inline 24x24 SVG.
    pub fn svg(self, size: u32) -> String {
        let path = match self {
            Icon::Newspaper => "M4 4h13v16H6a2 2 0 01-2-2V4zm13 4h3v10a2 2 0 01-2 2h-1V8zM7 7h7v2H7V7zm0 4h7v2H7v-2zm0 4h5v2H7v-2z",
            Icon::Layout => "M3 3h18v5H3V3zm0 7h7v11H3V10zm9 0h9v11h-9V10z",
            Icon::Chart => "M3 21h18v-2H3v2zM5 17h3v-7H5v7zm5 0h3V5h-3v12zm5 0h3v-4h-3v4z",
            Icon::Code => "M9.4 16.6L4.8 12l4.6-4.6L8 6l-6 6 6 6 1.4-1.4zm5.2 0l4.6-4.6-4.6-4.6L16 6l6 6-6 6-1.4-1.4z",
            Icon::Settings => "M19.4 13a7.8 7.8 0 000-2l2.1-1.6-2-3.5-2.5 1a7.6 7.6 0 00-1.7-1L15 3h-4l-.4 2.9a7.6 7.6 0 00-1.7 1l-2.5-1-2 3.5L6.6 11a7.8 7.8 0 000 2l-2.1 1.6 2 3.5 2.5-1c.5.4 1.1.7 1.7 1L11 21h4l.4-2.9c.6-.3 1.2-.6 1.7-1l2.5 1 2-3.5-2.2-1.6zM13 15.5a3.5 3.5 0 110-7 3.5 3.5 0 010 7z",
        };
        format!(
            r#"<svg width="{size}" height="{size}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" aria-hidden="true"><path d="{path}"/></svg>"#
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleCategory {
    Productivity,
    Development,
    Finance,
    Health,
    #[default]
    Other,
}

impl fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModuleCategory::Productivity => "productivity",
            ModuleCategory::Development => "development",
            ModuleCategory::Finance => "finance",
            ModuleCategory::Health => "health",
            ModuleCategory::Other => "other",
        };
        f.write_str(s)
    }
}

/// Metadata and deferred component for one dashboard module.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: Icon,
    /// `/modules/{id}` unless set explicitly.
    pub route: String,
    pub enabled: bool,
    pub component: LazyComponent,
    pub category: ModuleCategory,
    pub tags: BTreeSet<String>,
}

impl ModuleDescriptor {
    /// Enabled, `Other` category, `Layout` icon and no tags until set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, loader: ComponentLoader) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: Icon::Layout,
            route: String::new(),
            enabled: true,
            component: LazyComponent::new(loader),
            category: ModuleCategory::default(),
            tags: BTreeSet::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn category(mut self, category: ModuleCategory) -> Self {
        self.category = category;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon,
            route: self.route.clone(),
            category: self.category,
            tags: self.tags.clone(),
        }
    }
}

/// Serialisable view of a descriptor, without the component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: Icon,
    pub route: String,
    pub category: ModuleCategory,
    pub tags: BTreeSet<String>,
}

/// One pre-rendered path value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticParam {
    #[serde(rename = "moduleId")]
    pub module_id: String,
}

// ── Registry ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Module '{0}' is registered more than once")]
    DuplicateModule(String),
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
    index: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.index.get(id).map(|&i| &self.modules[i])
    }

    /// Enabled modules in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().filter(|m| m.enabled)
    }

    pub fn generate_static_params(&self) -> Vec<StaticParam> {
        self.enabled()
            .map(|m| StaticParam { module_id: m.id.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ModuleRegistryBuilder {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleRegistryBuilder {
    pub fn register(mut self, module: ModuleDescriptor) -> Self {
        self.modules.push(module);
        self
    }

    /// Per-deployment enable/disable overrides. Unknown ids are ignored.
    pub fn apply_overrides(mut self, overrides: &BTreeMap<String, bool>) -> Self {
        for (id, &enabled) in overrides {
            match self.modules.iter_mut().find(|m| &m.id == id) {
                Some(module) => {
                    debug!("Module '{}' enabled override: {}", id, enabled);
                    module.enabled = enabled;
                }
                None => warn!("Ignoring enable override for unknown module '{}'", id),
            }
        }
        self
    }

    pub fn build(self) -> Result<ModuleRegistry, RegistryError> {
        let mut registry = ModuleRegistry::default();

        for mut module in self.modules {
            if registry.index.contains_key(&module.id) {
                return Err(RegistryError::DuplicateModule(module.id));
            }
            if module.route.is_empty() {
                module.route = format!("/modules/{}", module.id);
            }
            registry.index.insert(module.id.clone(), registry.modules.len());
            registry.modules.push(module);
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static LOADS: AtomicUsize = AtomicUsize::new(0);

    struct Fixed(&'static str);

    #[async_trait]
    impl ModuleComponent for Fixed {
        async fn render(&self) -> Result<String, ModuleError> {
            Ok(self.0.to_string())
        }
    }

    fn load_fixed() -> BoxFuture<'static, Arc<dyn ModuleComponent>> {
        async { Arc::new(Fixed("<p>fixed</p>")) as Arc<dyn ModuleComponent> }.boxed()
    }

    fn load_counted() -> BoxFuture<'static, Arc<dyn ModuleComponent>> {
        async {
            LOADS.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Arc::new(Fixed("<p>counted</p>")) as Arc<dyn ModuleComponent>
        }
        .boxed()
    }

    fn sample() -> ModuleRegistry {
        ModuleRegistry::builder()
            .register(ModuleDescriptor::new("tech-watch", "Tech Watch", load_fixed))
            .register(ModuleDescriptor::new("template", "Template", load_fixed).enabled(false))
            .register(ModuleDescriptor::new("budget", "Budget", load_fixed).category(ModuleCategory::Finance))
            .build()
            .unwrap()
    }

    #[test]
    fn test_get_and_absence() {
        let registry = sample();
        assert_eq!(registry.get("tech-watch").unwrap().name, "Tech Watch");
        assert!(registry.get("template").is_some());
        assert!(registry.get("unknown-id").is_none());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_enabled_preserves_registration_order() {
        let registry = sample();
        let ids: Vec<&str> = registry.enabled().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["tech-watch", "budget"]);
    }

    #[test]
    fn test_static_params_cover_enabled_only() {
        let registry = sample();
        let json = serde_json::to_string(&registry.generate_static_params()).unwrap();
        assert_eq!(json, r#"[{"moduleId":"tech-watch"},{"moduleId":"budget"}]"#);
    }

    #[test]
    fn test_route_is_derived_unless_set() {
        let registry = ModuleRegistry::builder()
            .register(ModuleDescriptor::new("a", "A", load_fixed))
            .register(ModuleDescriptor::new("b", "B", load_fixed).route("/custom/b"))
            .build()
            .unwrap();
        assert_eq!(registry.get("a").unwrap().route, "/modules/a");
        assert_eq!(registry.get("b").unwrap().route, "/custom/b");
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let err = ModuleRegistry::builder()
            .register(ModuleDescriptor::new("a", "A", load_fixed))
            .register(ModuleDescriptor::new("a", "Again", load_fixed))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateModule("a".into()));
    }

    #[test]
    fn test_overrides_toggle_known_modules() {
        let overrides = BTreeMap::from([
            ("template".to_string(), true),
            ("tech-watch".to_string(), false),
            ("missing".to_string(), true),
        ]);
        let registry = ModuleRegistry::builder()
            .register(ModuleDescriptor::new("tech-watch", "Tech Watch", load_fixed))
            .register(ModuleDescriptor::new("template", "Template", load_fixed).enabled(false))
            .apply_overrides(&overrides)
            .build()
            .unwrap();

        let ids: Vec<&str> = registry.enabled().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["template"]);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_summary_serialises_lowercase_enums() {
        let module = ModuleDescriptor::new("tech-watch", "Tech Watch", load_fixed)
            .icon(Icon::Newspaper)
            .category(ModuleCategory::Productivity)
            .tags(["ai", "rss"]);
        let json = serde_json::to_value(module.summary()).unwrap();
        assert_eq!(json["icon"], "newspaper");
        assert_eq!(json["category"], "productivity");
        assert_eq!(json["tags"], serde_json::json!(["ai", "rss"]));
    }

    #[tokio::test]
    async fn test_lazy_component_loads_once() {
        let lazy = LazyComponent::new(load_counted);
        let shared = lazy.clone();
        assert!(!lazy.is_loaded());

        let (a, b) = tokio::join!(lazy.load(), shared.load());
        assert_eq!(a.render().await.unwrap(), "<p>counted</p>");
        assert_eq!(b.render().await.unwrap(), "<p>counted</p>");
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
        assert!(shared.is_loaded());
    }
}
