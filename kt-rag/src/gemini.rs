//! Gemini embedding provider backed by the `kt-gemini` client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use kt_gemini::{Gemini, Model};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// An [`EmbeddingProvider`] using Gemini's `text-embedding-004` model.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use kt_gemini::Gemini;
/// use kt_rag::GeminiEmbedding;
///
/// let provider = GeminiEmbedding::new(Arc::new(Gemini::from_env()?));
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), 768);
/// ```
pub struct GeminiEmbedding {
    client: Arc<Gemini>,
    model: Model,
    dimensions: usize,
}

impl GeminiEmbedding {
    /// Embedding dimensions for `text-embedding-004`.
    const DEFAULT_DIMENSIONS: usize = 768;

    /// Create a new provider over an existing Gemini client.
    pub fn new(client: Arc<Gemini>) -> Self {
        Self { client, model: Model::TextEmbedding004, dimensions: Self::DEFAULT_DIMENSIONS }
    }

    /// Override the embedding model and its dimensionality.
    pub fn with_model(mut self, model: Model, dimensions: usize) -> Self {
        self.model = model;
        self.dimensions = dimensions;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            debug!(provider = "Gemini", "blank input, no embedding available");
            return Ok(Vec::new());
        }

        self.client.embed(&self.model, text).await.map_err(|e| RagError::Embedding {
            provider: "Gemini".into(),
            message: e.to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
