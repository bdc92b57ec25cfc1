//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The result distinguishes three outcomes the orchestrators care about:
///
/// - `Ok(vector)` — an embedding of [`dimensions()`](EmbeddingProvider::dimensions) floats
/// - `Ok(empty)` — no embedding available (empty or whitespace-only input);
///   not an error, callers check for emptiness
/// - `Err(reason)` — the provider failed (network, auth, quota, malformed
///   response); callers log the reason and degrade gracefully
///
/// A single failed chunk embedding never aborts indexing of the remaining
/// chunks, and a failed query embedding sends retrieval down the fallback
/// path; both policies live in the orchestrator, not here.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
