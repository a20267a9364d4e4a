//! Markdown digest of the articles processed in one run.

use crate::models::ProcessedArticle;

pub fn build_digest_summary(articles: &[ProcessedArticle]) -> String {
    let mut lines = Vec::with_capacity(articles.len() * 4);

    for article in articles {
        lines.push(format!("\n## [{}]({})", article.title, article.url));
        lines.push(format!("*Discussion: [Hacker News]({})*\n", article.comments_url));
        lines.push(article.analysis.clone());
        lines.push("\n---".to_string());
    }

    lines.join("\n")
}
