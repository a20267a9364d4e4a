//! Starter module copied when adding a new one. Disabled by default.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};

use crate::registry::{Icon, ModuleCategory, ModuleComponent, ModuleDescriptor, ModuleError};

pub const ID: &str = "template";

pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor::new(ID, "Template", load)
        .description("Starting point for new modules")
        .icon(Icon::Code)
        .category(ModuleCategory::Other)
        .tags(["template"])
        .enabled(false)
}

fn load() -> BoxFuture<'static, Arc<dyn ModuleComponent>> {
    async { Arc::new(TemplateModule) as Arc<dyn ModuleComponent> }.boxed()
}

pub struct TemplateModule;

#[async_trait]
impl ModuleComponent for TemplateModule {
    async fn render(&self) -> Result<String, ModuleError> {
        Ok(r#"<div class="card">
    <h2>Template module</h2>
    <p class="text-muted">Replace this component with your module's content.</p>
</div>"#
            .to_string())
    }
}
