//! State machine tests for quota-based model fallback.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kt_gemini::{FallbackChain, GeminiError, Model, TextGenerator};

/// A generator that replays a scripted sequence of outcomes and records
/// which model each call used.
struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GeminiError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(script: Vec<Result<String, GeminiError>>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(script.into()), calls: Mutex::new(Vec::new()) })
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, model: &Model, _prompt: &str) -> Result<String, GeminiError> {
        self.calls.lock().await.push(model.as_str().to_string());
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| panic!("generator called more times than scripted"))
    }
}

fn quota_error(retry_after: Option<Duration>) -> GeminiError {
    GeminiError::RateLimited { message: "quota exceeded".into(), retry_after }
}

#[tokio::test]
async fn primary_success_uses_one_model() {
    let generator = ScriptedGenerator::new(vec![Ok("answer".into())]);
    let chain = FallbackChain::new(generator.clone());

    let text = chain.generate("q").await.unwrap();

    assert_eq!(text, "answer");
    assert_eq!(generator.calls().await, vec!["gemini-2.5-flash"]);
}

#[tokio::test]
async fn quota_error_advances_to_next_candidate() {
    let generator = ScriptedGenerator::new(vec![Err(quota_error(None)), Ok("from lite".into())]);
    let chain = FallbackChain::new(generator.clone());

    let text = chain.generate("q").await.unwrap();

    assert_eq!(text, "from lite");
    assert_eq!(generator.calls().await, vec!["gemini-2.5-flash", "gemini-2.5-flash-lite"]);
}

#[tokio::test]
async fn non_quota_error_propagates_without_fallback() {
    let generator =
        ScriptedGenerator::new(vec![Err(GeminiError::Auth("API key not valid".into()))]);
    let chain = FallbackChain::new(generator.clone());

    let err = chain.generate("q").await.unwrap_err();

    assert!(matches!(err, GeminiError::Auth(_)));
    assert_eq!(generator.calls().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn exhausted_chain_waits_and_retries_last_candidate_once() {
    let generator = ScriptedGenerator::new(vec![
        Err(quota_error(None)),
        Err(quota_error(None)),
        Err(quota_error(Some(Duration::from_secs(30)))),
        Ok("after wait".into()),
    ]);
    let chain = FallbackChain::new(generator.clone());

    let text = chain.generate("q").await.unwrap();

    assert_eq!(text, "after wait");
    let calls = generator.calls().await;
    assert_eq!(calls.len(), 4);
    // Final retry targets the last candidate in the chain.
    assert_eq!(calls[3], "gemini-2.5-pro");
}

#[tokio::test(start_paused = true)]
async fn final_retry_quota_error_surfaces_exhausted() {
    let generator = ScriptedGenerator::new(vec![
        Err(quota_error(None)),
        Err(quota_error(None)),
        Err(quota_error(None)),
        Err(quota_error(None)),
    ]);
    let chain = FallbackChain::new(generator.clone());

    let err = chain.generate("q").await.unwrap_err();

    assert!(matches!(err, GeminiError::Exhausted));
    assert_eq!(generator.calls().await.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn suggested_retry_delay_is_capped() {
    let generator = ScriptedGenerator::new(vec![
        Err(quota_error(Some(Duration::from_secs(600)))),
        Ok("late".into()),
    ]);
    let chain = FallbackChain::new(generator.clone())
        .with_models(vec![Model::Gemini25Flash])
        .with_max_wait(Duration::from_secs(60));

    let start = tokio::time::Instant::now();
    let text = chain.generate("q").await.unwrap();

    assert_eq!(text, "late");
    // The 600 s suggestion must have been capped to the 60 s maximum.
    assert!(start.elapsed() <= Duration::from_secs(61));
}

#[tokio::test]
async fn empty_candidate_list_is_exhausted() {
    let generator = ScriptedGenerator::new(vec![]);
    let chain = FallbackChain::new(generator).with_models(Vec::new());

    assert!(matches!(chain.generate("q").await.unwrap_err(), GeminiError::Exhausted));
}
