//! Loading placeholders shown while a module resolves.

use super::layout::escape;

/// Structural skeleton: a heading block, three cards and one large block.
pub fn skeleton() -> String {
    r#"<div class="skeleton" aria-busy="true" aria-label="Loading">
    <div class="skeleton-block skeleton-heading"></div>
    <div class="skeleton-cards">
        <div class="skeleton-block skeleton-card"></div>
        <div class="skeleton-block skeleton-card"></div>
        <div class="skeleton-block skeleton-card"></div>
    </div>
    <div class="skeleton-block skeleton-large"></div>
</div>"#
        .to_string()
}

/// Full-screen spinner with a caption; the route-level fallback.
pub fn spinner(text: &str) -> String {
    format!(
        r#"<div class="spinner-screen" role="status" aria-live="polite">
    <div class="spinner"></div>
    <p class="text-muted">{}</p>
</div>"#,
        escape(text)
    )
}
