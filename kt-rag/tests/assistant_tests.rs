//! End-to-end tests for the assistant surface: retrieval plus grounded
//! generation with displayable error rendering.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kt_gemini::{FallbackChain, GeminiError, Model, TextGenerator};
use kt_rag::{
    DocumentInput, EmbeddingProvider, InMemoryDocumentStore, InMemoryVectorIndex, KtAssistant,
    KtPipeline, RagConfig, RagError,
};

struct EchoEmbedder;

#[async_trait]
impl EmbeddingProvider for EchoEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![text.len() as f32, 1.0])
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Captures the prompt it receives and returns a canned reply.
struct CapturingGenerator {
    reply: Result<String, fn() -> GeminiError>,
    prompts: Mutex<Vec<String>>,
}

impl CapturingGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(reply.to_string()), prompts: Mutex::new(Vec::new()) })
    }

    fn failing(error: fn() -> GeminiError) -> Arc<Self> {
        Arc::new(Self { reply: Err(error), prompts: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl TextGenerator for CapturingGenerator {
    async fn generate(&self, _model: &Model, prompt: &str) -> Result<String, GeminiError> {
        self.prompts.lock().await.push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

async fn assistant_over(generator: Arc<CapturingGenerator>) -> KtAssistant {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pipeline = Arc::new(
        KtPipeline::builder()
            .config(RagConfig::default())
            .embedder(Arc::new(EchoEmbedder))
            .vector_index(Arc::new(InMemoryVectorIndex::new()))
            .document_store(store)
            .build()
            .unwrap(),
    );

    pipeline
        .index_document(&DocumentInput {
            team_id: "alpha".to_string(),
            doc_id: "doc-1".to_string(),
            filename: "auth.md".to_string(),
            content: "The auth module validates access codes against the team table.".to_string(),
            uploaded_by: "sam".to_string(),
            summary: None,
            team_name: None,
        })
        .await
        .unwrap();

    KtAssistant::new(pipeline, FallbackChain::new(generator))
}

#[tokio::test]
async fn chat_grounds_the_prompt_in_retrieved_context() {
    let generator = CapturingGenerator::replying("It validates access codes.");
    let assistant = assistant_over(generator.clone()).await;

    let reply = assistant.chat("How does the auth module work?", "alpha").await;

    assert_eq!(reply, "It validates access codes.");
    let prompts = generator.prompts.lock().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("From auth.md:"));
    assert!(prompts[0].contains("validates access codes"));
    assert!(prompts[0].contains("This information is not available in the uploaded documents."));
    assert!(prompts[0].contains("User Question: How does the auth module work?"));
}

#[tokio::test]
async fn auth_failure_becomes_a_key_warning_not_an_error() {
    let generator =
        CapturingGenerator::failing(|| GeminiError::Auth("API key not valid".to_string()));
    let assistant = assistant_over(generator).await;

    let reply = assistant.chat("anything", "alpha").await;

    assert!(reply.contains("API key is invalid or expired"));
}

#[tokio::test(start_paused = true)]
async fn quota_exhaustion_becomes_a_quota_warning() {
    let generator = CapturingGenerator::failing(|| GeminiError::RateLimited {
        message: "quota exceeded".to_string(),
        retry_after: None,
    });
    let assistant = assistant_over(generator.clone()).await;

    let reply = assistant.chat("anything", "alpha").await;

    assert!(reply.contains("quota exceeded on all available models"));
    // Three candidates plus the post-wait final retry.
    assert_eq!(generator.prompts.lock().await.len(), 4);
}

#[tokio::test]
async fn summarize_document_uses_the_bullet_prompt() {
    let generator = CapturingGenerator::replying("- point one\n- point two");
    let assistant = assistant_over(generator.clone()).await;

    let summary = assistant.summarize_document("Long onboarding document text.").await;

    assert_eq!(summary, "- point one\n- point two");
    let prompts = generator.prompts.lock().await;
    assert!(prompts[0].contains("Maximum 6 bullet points"));
    assert!(prompts[0].contains("Long onboarding document text."));
}
