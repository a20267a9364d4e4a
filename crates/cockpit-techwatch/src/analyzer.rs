//! LLM analysis of an article and its discussion.

use cockpit_db::schema::truncate_chars;
use cockpit_llm::{LlmBackend, LlmRequest, Message};
use tracing::{error, info};

use crate::models::Comment;

pub const SYSTEM_PROMPT: &str = "Tu es un CTO expérimenté et sceptique. Analyse cet article et la discussion Hacker News associée.

Le Pitch : En une phrase, quelle est l'innovation prétendue ?

Le Verdict Communautaire : Est-ce que les experts de Hacker News valident ou détruisent l'idée ? Identifie les contre-arguments techniques majeurs.

TL;DR Pépite : Est-ce que je dois vraiment lire cet article ou est-ce juste du marketing ? Sois tranchant.
";

pub fn build_user_message(title: &str, content: &str, comments: &[Comment], char_limit: usize) -> String {
    let comments_text = comments
        .iter()
        .map(|c| format!("- {}: {}", c.author, c.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Titre de l'article : {title}\n\n\
         --- CONTENU DE L'ARTICLE ---\n\
         {content}\n\
         (Contenu tronqué si trop long)\n\n\
         --- COMMENTAIRES HACKER NEWS (Top Level) ---\n\
         {comments_text}\n",
        content = truncate_chars(content, char_limit),
    )
}

/// Returns the markdown analysis, or an `Error: ...` string when no backend
/// is configured or the call fails. Never aborts the batch.
pub async fn analyze_article(
    backend: Option<&dyn LlmBackend>,
    content: &str,
    comments: &[Comment],
    title: &str,
    char_limit: usize,
) -> String {
    let Some(backend) = backend else {
        error!("No API key found. Please set GEMINI_API_KEY.");
        return "Error: No GEMINI_API_KEY configured.".to_string();
    };

    let req = LlmRequest {
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_user_message(title, content, comments, char_limit)),
        ],
        model: None,
        max_tokens: None,
        temperature: None,
    };

    info!("Sending analysis request for '{}' to {}", title, backend.model_id());
    match backend.complete(req).await {
        Ok(resp) => resp.content,
        Err(e) => {
            error!("Error during LLM analysis: {}", e);
            format!("Error analyzing article: {}", e)
        }
    }
}
