//! Dashboard handler — landing page listing the enabled modules.

use axum::{extract::State, response::Html};

use crate::handlers::layout::{escape, nav, page};
use crate::registry::ModuleRegistry;
use crate::state::SharedState;

pub async fn dashboard(State(state): State<SharedState>) -> Html<String> {
    Html(render_dashboard(&state.registry))
}

pub fn render_dashboard(registry: &ModuleRegistry) -> String {
    let cards: String = registry
        .enabled()
        .map(|m| {
            let tags: String = m
                .tags
                .iter()
                .map(|t| format!(r#"<span class="badge">#{}</span>"#, escape(t)))
                .collect();
            format!(
                r#"
        <a href="{}" class="card card-hover">
            <h3 class="page-title">{} {}</h3>
            <p class="text-muted">{}</p>
            <span class="badge">{}</span>{}
        </a>"#,
                escape(&m.route),
                m.icon.svg(24),
                escape(&m.name),
                escape(&m.description),
                m.category,
                tags,
            )
        })
        .collect();

    let grid = if cards.is_empty() {
        r#"<p class="text-muted">No modules are enabled for this deployment.</p>"#.to_string()
    } else {
        format!(r#"<div class="module-grid">{cards}
    </div>"#)
    };

    page(
        "Overview",
        &nav(registry, None),
        &format!(
            r#"<div class="page-header">
        <h1 class="page-title">Overview</h1>
        <p class="text-muted">Your personal dashboard modules</p>
    </div>
    {grid}"#
        ),
    )
}
