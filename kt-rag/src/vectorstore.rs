//! Vector index trait for storing and searching embeddings.

use async_trait::async_trait;

use crate::document::{QueryMatch, VectorRecord};
use crate::error::Result;

/// A storage backend for vector records with team-scoped similarity search.
///
/// Implementations must apply the team filter at the index layer — never by
/// post-filtering results client-side — so a record tagged with one team is
/// never returned for another team's query, even under index bugs.
///
/// # Example
///
/// ```rust,ignore
/// use kt_rag::{InMemoryVectorIndex, VectorIndex};
///
/// let index = InMemoryVectorIndex::new();
/// index.upsert(&records).await?;
/// let matches = index.query(&embedding, "team-a", 10).await?;
/// index.delete_document("team-a", "doc-1").await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or overwrite records by their composite identifiers.
    ///
    /// Callers keep batches bounded (the pipeline uses the configured
    /// `upsert_batch_size`); each call is independent of the others.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Search for the `top_k` records most similar to `embedding` within
    /// the given team, ordered by descending similarity score.
    async fn query(
        &self,
        embedding: &[f32],
        team_id: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>>;

    /// Remove every record belonging to the given document. Returns the
    /// number of records removed.
    async fn delete_document(&self, team_id: &str, doc_id: &str) -> Result<usize>;
}
