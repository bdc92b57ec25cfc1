//! Grounded question answering and document summarization.
//!
//! The [`KtAssistant`] turns assembled context into displayable text: it
//! builds the grounded prompts, runs them through the quota-aware
//! [`FallbackChain`], and renders provider failures as warning strings so
//! the chat and summary surfaces always have something to show.

use std::sync::Arc;

use tracing::{error, info};

use kt_gemini::{FallbackChain, GeminiError};

use crate::chunking::truncate_chars;
use crate::error::Result;
use crate::pipeline::KtPipeline;

/// The exact sentence the model is instructed to emit when the answer is
/// not present in the supplied context. This is the hallucination guard;
/// downstream checks depend on the wording.
pub const NOT_IN_CONTEXT: &str =
    "This information is not available in the uploaded documents.";

/// A knowledge-transfer assistant over a [`KtPipeline`].
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use kt_gemini::{FallbackChain, Gemini};
/// use kt_rag::KtAssistant;
///
/// let client = Arc::new(Gemini::from_env()?);
/// let assistant = KtAssistant::new(pipeline, FallbackChain::new(client));
/// let reply = assistant.chat("How does the auth module work?", "team-a").await;
/// ```
pub struct KtAssistant {
    pipeline: Arc<KtPipeline>,
    chain: FallbackChain,
}

impl KtAssistant {
    /// Create a new assistant over the given pipeline and model chain.
    pub fn new(pipeline: Arc<KtPipeline>, chain: FallbackChain) -> Self {
        Self { pipeline, chain }
    }

    /// Answer a question strictly from the supplied context.
    ///
    /// The context is truncated to the configured bound before prompting.
    ///
    /// # Errors
    ///
    /// Propagates generation failures ([`GeminiError`]) after the fallback
    /// chain is exhausted; use [`chat`](KtAssistant::chat) for a surface
    /// that never errors.
    pub async fn answer(&self, query: &str, context: &str) -> Result<String> {
        let prompt = answer_prompt(query, context, self.pipeline.config().max_context_len);
        Ok(self.chain.generate(&prompt).await?)
    }

    /// Summarize a document's text as at most six bullet points.
    ///
    /// # Errors
    ///
    /// Propagates generation failures after the fallback chain is
    /// exhausted.
    pub async fn summarize(&self, text: &str) -> Result<String> {
        let prompt = summary_prompt(text, self.pipeline.config().max_summary_input_len);
        Ok(self.chain.generate(&prompt).await?)
    }

    /// Answer a team-scoped question end to end: retrieve context, then
    /// generate a grounded answer.
    ///
    /// Always returns displayable text — retrieval and generation failures
    /// are rendered as warning strings, never surfaced as errors.
    pub async fn chat(&self, query: &str, team_id: &str) -> String {
        let context = match self.pipeline.context_for_query(query, team_id).await {
            Ok(context) => context,
            Err(e) => {
                error!(team_id, error = %e, "context assembly failed");
                return format!("Error answering question: {e}");
            }
        };

        match self.answer(query, &context).await {
            Ok(text) => text,
            Err(e) => {
                error!(team_id, error = %e, "answer generation failed");
                render_generation_warning(&e, "answering question")
            }
        }
    }

    /// Summarize a document, rendering any failure as displayable text.
    pub async fn summarize_document(&self, text: &str) -> String {
        match self.summarize(text).await {
            Ok(summary) => {
                info!(summary_len = summary.len(), "generated document summary");
                summary
            }
            Err(e) => {
                error!(error = %e, "summary generation failed");
                render_generation_warning(&e, "generating summary")
            }
        }
    }
}

/// Render a generation failure as a user-facing warning, distinguishing
/// the cases a user can act on.
fn render_generation_warning(error: &crate::error::RagError, action: &str) -> String {
    match error {
        crate::error::RagError::Gemini(GeminiError::Auth(_)) => {
            "Error: the Gemini API key is invalid or expired. Please check the \
             GEMINI_API_KEY configuration."
                .to_string()
        }
        crate::error::RagError::Gemini(
            GeminiError::Exhausted | GeminiError::RateLimited { .. },
        ) => {
            "Error: Gemini quota exceeded on all available models. Please try again \
             in a few minutes."
                .to_string()
        }
        other => format!("Error {action}: {other}"),
    }
}

fn answer_prompt(query: &str, context: &str, max_context: usize) -> String {
    format!(
        "You are a Knowledge Transfer (KT) assistant. Answer the user's question based ONLY \
         on the provided document context.\n\
         \n\
         If the answer is not in the context, say: \"{NOT_IN_CONTEXT}\"\n\
         Do not hallucinate facts.\n\
         \n\
         Context from uploaded documents:\n\
         {context}\n\
         \n\
         User Question: {query}",
        context = truncate_chars(context, max_context),
    )
}

fn summary_prompt(text: &str, max_input: usize) -> String {
    format!(
        "Provide a clear, comprehensive summary of the following document in bullet point \
         format.\n\
         \n\
         Requirements:\n\
         - Maximum 6 bullet points (exactly 6 or fewer)\n\
         - Each bullet point must be on a new line\n\
         - Cover all important information within these 6 points\n\
         - Use bullet format: -\n\
         - Be concise but comprehensive\n\
         \n\
         Focus on covering:\n\
         - Main purpose or topic\n\
         - Key information or processes\n\
         - Important details, contacts, or decisions\n\
         - Critical information that should be known\n\
         \n\
         Format: Each bullet point on a separate line. Maximum 6 points total.\n\
         \n\
         Document Content:\n\
         {content}\n\
         \n\
         Summary (exactly 6 bullet points maximum, each on a new line):",
        content = truncate_chars(text, max_input),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagError;

    #[test]
    fn answer_prompt_carries_refusal_string_verbatim() {
        let prompt = answer_prompt("what is X?", "some context", 50_000);
        assert!(prompt.contains(NOT_IN_CONTEXT));
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("User Question: what is X?"));
    }

    #[test]
    fn answer_prompt_bounds_context_length() {
        let context = "x".repeat(60_000);
        let prompt = answer_prompt("q", &context, 50_000);
        assert!(prompt.len() < 51_000);
    }

    #[test]
    fn summary_prompt_bounds_document_length() {
        let text = "y".repeat(40_000);
        let prompt = summary_prompt(&text, 30_000);
        assert!(prompt.len() < 31_000);
        assert!(prompt.contains("Maximum 6 bullet points"));
    }

    #[test]
    fn auth_failure_renders_key_warning() {
        let err = RagError::Gemini(GeminiError::Auth("API key not valid".into()));
        let warning = render_generation_warning(&err, "answering question");
        assert!(warning.contains("invalid or expired"));
    }

    #[test]
    fn quota_exhaustion_renders_quota_warning() {
        let err = RagError::Gemini(GeminiError::Exhausted);
        let warning = render_generation_warning(&err, "answering question");
        assert!(warning.contains("quota exceeded"));
    }

    #[test]
    fn generic_failure_renders_action_prefix() {
        let err = RagError::Store("connection refused".into());
        let warning = render_generation_warning(&err, "generating summary");
        assert!(warning.starts_with("Error generating summary:"));
    }
}
