//! Dynamic module route: `/modules/{module_id}`.
//!
//! The response is streamed in two chunks. The first carries the page shell
//! with a loading fallback inside `<div data-boundary>`; the second carries
//! the rendered module in a `<template>` plus a script that swaps it in.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Html,
};
use futures_util::stream::{self, StreamExt};
use tracing::{debug, error};

use crate::error::{error_panel, WebError};
use crate::handlers::layout::{escape, nav, page, page_open, PAGE_CLOSE};
use crate::handlers::loading::{skeleton, spinner};
use crate::registry::{ModuleDescriptor, ModuleRegistry};
use crate::state::SharedState;

const SWAP_SCRIPT: &str = r#"<script>
(function () {
    var t = document.getElementById("boundary-content");
    var b = document.querySelector("[data-boundary]");
    if (t && b) { b.replaceWith(t.content.cloneNode(true)); t.remove(); }
})();
</script>"#;

/// Look up an id, treating disabled modules as absent.
pub fn resolve<'a>(registry: &'a ModuleRegistry, id: &str) -> Result<&'a ModuleDescriptor, WebError> {
    registry
        .get(id)
        .filter(|m| m.enabled)
        .ok_or(WebError::NotFound)
}

/// Load the module's component and render it. Render failures become an
/// error panel in place of the content.
pub async fn render_module(module: &ModuleDescriptor) -> String {
    let component = module.component.load().await;
    match component.render().await {
        Ok(html) => html,
        Err(e) => {
            error!(module = %module.id, "Module render failed: {}", e);
            error_panel(&format!("{} is unavailable", module.name), &e.to_string())
        }
    }
}

fn header(module: &ModuleDescriptor) -> String {
    format!(
        r#"<div class="page-header">
        <h1 class="page-title">{} {}</h1>
        <p class="text-muted">{}</p>
    </div>"#,
        module.icon.svg(32),
        escape(&module.name),
        escape(&module.description),
    )
}

/// Fallback shown until the module resolves. A component that has never
/// been loaded gets the spinner; one already in memory gets the skeleton.
fn fallback(module: &ModuleDescriptor) -> String {
    if module.component.is_loaded() {
        skeleton()
    } else {
        spinner(&format!("Loading {}...", module.name))
    }
}

/// Fully rendered page with no fallback, used by the static export.
pub async fn render_module_page(registry: &ModuleRegistry, module: &ModuleDescriptor) -> String {
    let content = render_module(module).await;
    page(
        &module.name,
        &nav(registry, Some(&module.id)),
        &format!("{}\n{}", header(module), content),
    )
}

pub async fn module_page(
    State(state): State<SharedState>,
    Path(module_id): Path<String>,
) -> Result<Html<Body>, WebError> {
    let module = resolve(&state.registry, &module_id)?;
    debug!("Rendering module '{}'", module.id);

    let shell = format!(
        "{}{}\n<div data-boundary>\n{}\n</div>\n",
        page_open(&module.name, &nav(&state.registry, Some(&module.id))),
        header(module),
        fallback(module),
    );

    let module = module.clone();
    let content = async move {
        let html = render_module(&module).await;
        Ok::<_, Infallible>(format!(
            "<template id=\"boundary-content\">\n{}\n</template>\n{}\n{}",
            html, SWAP_SCRIPT, PAGE_CLOSE
        ))
    };

    let body = stream::once(async move { Ok::<_, Infallible>(shell) }).chain(stream::once(content));
    Ok(Html(Body::from_stream(body)))
}
