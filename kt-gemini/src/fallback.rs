//! Quota-aware model fallback for text generation.
//!
//! Free-tier Gemini quotas are enforced per model, so a chat turn that
//! exhausts `gemini-2.5-flash` can still succeed on a sibling model. The
//! [`FallbackChain`] walks an ordered candidate list, advancing only on
//! quota errors; anything else propagates immediately since retrying it on
//! another model cannot succeed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{GeminiError, Result};
use crate::model::Model;

/// Upper bound on the pre-final-retry wait, whatever the provider suggests.
const MAX_RETRY_WAIT: Duration = Duration::from_secs(60);

/// Wait used when the quota error carries no suggested delay.
const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(15);

/// A text-generation backend addressable by model name.
///
/// [`Gemini`](crate::Gemini) implements this; tests substitute scripted
/// doubles to drive the fallback state machine without network access.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` using `model`.
    async fn generate(&self, model: &Model, prompt: &str) -> Result<String>;
}

/// An ordered chain of candidate models with quota fallback.
///
/// State machine per prompt:
///
/// ```text
/// Trying(model_i) ── Ok ──────────────▶ Success
///        │ quota error
///        ▼
/// Trying(model_i+1) ... exhausted ────▶ wait (bounded) ─▶ retry last once
///        │ other error                                      │
///        ▼                                                  ▼
///      Failed                                        Success | Exhausted
/// ```
pub struct FallbackChain {
    generator: Arc<dyn TextGenerator>,
    models: Vec<Model>,
    max_wait: Duration,
}

impl FallbackChain {
    /// Create a chain over the default candidate list
    /// ([`Model::default_chat_chain`]).
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, models: Model::default_chat_chain(), max_wait: MAX_RETRY_WAIT }
    }

    /// Replace the candidate list. The first entry is the primary model.
    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = models;
        self
    }

    /// Cap the pre-final-retry wait (defaults to 60 seconds).
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// The configured candidate models, in order.
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Generate text, falling back across candidate models on quota errors.
    ///
    /// # Errors
    ///
    /// - Non-quota errors from any model propagate immediately.
    /// - [`GeminiError::Exhausted`] once every candidate and the final
    ///   post-wait retry have run out of quota.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let mut last_quota: Option<GeminiError> = None;

        for model in &self.models {
            match self.generator.generate(model, prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_quota() => {
                    warn!(model = %model, error = %e, "model quota exhausted, trying next");
                    last_quota = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let Some(last_model) = self.models.last() else {
            return Err(GeminiError::Exhausted);
        };

        // Every candidate hit its quota. One bounded wait, then one final
        // attempt on the last candidate.
        let wait = last_quota
            .as_ref()
            .and_then(GeminiError::suggested_retry)
            .unwrap_or(DEFAULT_RETRY_WAIT)
            .min(self.max_wait);
        info!(
            wait_secs = wait.as_secs(),
            model = %last_model,
            "all candidate models exhausted, waiting before final retry"
        );
        tokio::time::sleep(wait).await;

        match self.generator.generate(last_model, prompt).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_quota() => Err(GeminiError::Exhausted),
            Err(e) => Err(e),
        }
    }
}
