//! Page shell shared by every HTML view.

use crate::registry::{Icon, ModuleRegistry};

const STYLESHEET: &str = include_str!("../../templates/cockpit.css");

pub const PAGE_CLOSE: &str = "</main>\n</div>\n</body>\n</html>\n";

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sidebar listing the home page and every enabled module.
pub fn nav(registry: &ModuleRegistry, active: Option<&str>) -> String {
    let mut links = format!(
        r#"<a href="/" class="nav-link{}">{} Overview</a>"#,
        if active.is_none() { " active" } else { "" },
        Icon::Layout.svg(18),
    );

    for module in registry.enabled() {
        let class = if active == Some(module.id.as_str()) { "nav-link active" } else { "nav-link" };
        links.push_str(&format!(
            r#"
        <a href="{}" class="{}">{} {}</a>"#,
            escape(&module.route),
            class,
            module.icon.svg(18),
            escape(&module.name),
        ));
    }

    format!(
        r#"<nav class="sidebar">
        <a href="/" class="brand">Cockpit</a>
        {links}
    </nav>"#
    )
}

/// Everything up to and including the opening `<main>` tag.
pub fn page_open(title: &str, nav_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{} | Cockpit</title>
    <style>{}</style>
</head>
<body>
<div class="app-container">
{}
<main class="main-content">
"#,
        escape(title),
        STYLESHEET,
        nav_html,
    )
}

/// A complete page around `body`.
pub fn page(title: &str, nav_html: &str, body: &str) -> String {
    format!("{}{}\n{}", page_open(title, nav_html), body, PAGE_CLOSE)
}
