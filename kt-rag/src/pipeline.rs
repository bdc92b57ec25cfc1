//! Pipeline orchestrators for indexing and retrieval.
//!
//! The [`KtPipeline`] composes an [`EmbeddingProvider`], an optional
//! [`VectorIndex`], and a [`DocumentStore`] into the two operations the
//! knowledge base runs on:
//!
//! - [`index_document`](KtPipeline::index_document) — chunk → embed → upsert
//! - [`context_for_query`](KtPipeline::context_for_query) — embed → query →
//!   dedup/assemble, with automatic full-corpus fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kt_rag::{InMemoryVectorIndex, KtPipeline, RagConfig};
//!
//! let pipeline = KtPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(embedder))
//!     .vector_index(Arc::new(InMemoryVectorIndex::new()))
//!     .document_store(Arc::new(store))
//!     .build()?;
//!
//! pipeline.index_document(&document).await?;
//! let context = pipeline.context_for_query("How does auth work?", "team-a").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::chunking::{chunks, truncate_chars};
use crate::config::RagConfig;
use crate::context::{build_context, fallback_context};
use crate::document::{ChunkMetadata, DocumentInput, VectorRecord};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::store::DocumentStore;
use crate::vectorstore::VectorIndex;

/// The knowledge-base pipeline orchestrator.
///
/// Construct one via [`KtPipeline::builder()`]. The vector index is
/// optional: when absent, indexing no-ops and retrieval always takes the
/// fallback path, so the knowledge base keeps working without a vector
/// backend.
pub struct KtPipeline {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Option<Arc<dyn VectorIndex>>,
    store: Arc<dyn DocumentStore>,
}

impl KtPipeline {
    /// Create a new [`KtPipelineBuilder`].
    pub fn builder() -> KtPipelineBuilder {
        KtPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Whether a vector backend is configured and vector search is active.
    pub fn vector_search_enabled(&self) -> bool {
        self.index.is_some()
    }

    /// Index a document: chunk its content, embed each chunk, and upsert
    /// the resulting vector records.
    ///
    /// Best-effort by design: the caller invokes this after the document
    /// row is durably saved, and treats `Ok(false)` as "not searchable via
    /// vectors right now", never as an upload failure. Chunks whose
    /// embedding fails are skipped (keeping their ordinal); the operation
    /// reports failure only when no chunk could be embedded or no batch
    /// could be upserted.
    ///
    /// Returns `Ok(true)` when at least one record was stored, `Ok(false)`
    /// when the vector backend is disabled or nothing could be stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if `team_id` or `content` is
    /// empty — missing required input is not retried and not degraded.
    pub async fn index_document(&self, document: &DocumentInput) -> Result<bool> {
        if document.team_id.trim().is_empty() {
            return Err(RagError::InvalidInput("team_id is required to index documents".into()));
        }
        if document.content.trim().is_empty() {
            return Err(RagError::InvalidInput(format!(
                "document '{}' has no content to index",
                document.filename
            )));
        }

        let Some(index) = &self.index else {
            debug!(document.id = %document.doc_id, "vector search disabled, skipping indexing");
            return Ok(false);
        };

        let mut records = Vec::new();
        let chunk_iter = chunks(&document.content, self.config.chunk_size, self.config.chunk_overlap);
        for (i, chunk) in chunk_iter.enumerate() {
            let values = match self.embedder.embed(chunk).await {
                Ok(values) if !values.is_empty() => values,
                Ok(_) => {
                    warn!(
                        document.id = %document.doc_id,
                        chunk_index = i,
                        "no embedding available for chunk, skipping"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        document.id = %document.doc_id,
                        chunk_index = i,
                        error = %e,
                        "embedding failed for chunk, skipping"
                    );
                    continue;
                }
            };

            records.push(VectorRecord {
                id: self.vector_id(document, i),
                values,
                metadata: ChunkMetadata {
                    team_id: document.team_id.clone(),
                    doc_id: document.doc_id.clone(),
                    filename: document.filename.clone(),
                    uploaded_by: document.uploaded_by.clone(),
                    chunk_index: i,
                    snippet: truncate_chars(chunk, self.config.snippet_len).to_string(),
                    team_name: document.team_name.clone(),
                    summary: document
                        .summary
                        .as_deref()
                        .map(|s| truncate_chars(s, self.config.summary_metadata_len).to_string()),
                },
            });
        }

        if records.is_empty() {
            warn!(document.id = %document.doc_id, "no chunks produced embeddings, nothing indexed");
            return Ok(false);
        }

        // A re-index with fewer chunks than before would otherwise leave
        // stale trailing ordinals from the previous version in the index.
        if let Err(e) = index.delete_document(&document.team_id, &document.doc_id).await {
            warn!(
                document.id = %document.doc_id,
                error = %e,
                "failed to clear previous vectors before reindex"
            );
        }

        let mut upserted = 0usize;
        for batch in records.chunks(self.config.upsert_batch_size) {
            match index.upsert(batch).await {
                Ok(()) => upserted += batch.len(),
                // Each batch is independent; keep going with the rest.
                Err(e) => {
                    error!(
                        document.id = %document.doc_id,
                        batch_size = batch.len(),
                        error = %e,
                        "batch upsert failed"
                    );
                }
            }
        }

        if upserted == 0 {
            return Ok(false);
        }

        info!(document.id = %document.doc_id, chunk_count = upserted, "indexed document");
        Ok(true)
    }

    /// Remove every vector record derived from a document.
    ///
    /// Returns the number of records removed; `Ok(0)` when the vector
    /// backend is disabled.
    pub async fn delete_document(&self, team_id: &str, doc_id: &str) -> Result<usize> {
        let Some(index) = &self.index else {
            return Ok(0);
        };
        let removed = index.delete_document(team_id, doc_id).await?;
        info!(document.id = %doc_id, count = removed, "deleted document vectors");
        Ok(removed)
    }

    /// Assemble the context for a free-text query, scoped to one team.
    ///
    /// Primary path: embed the query, run a team-filtered similarity
    /// search, deduplicate by source document, and join snippet blocks in
    /// similarity order. Falls back to the team's full corpus when the
    /// vector backend is disabled, the query cannot be embedded, the
    /// search fails, or no relevant chunk is found — an answer must stay
    /// attemptable even without a working vector backend.
    ///
    /// Under both paths, only content belonging to `team_id` enters the
    /// returned context.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidInput`] if `team_id` is empty, or
    /// [`RagError::Store`] if the fallback corpus cannot be read.
    pub async fn context_for_query(&self, query: &str, team_id: &str) -> Result<String> {
        if team_id.trim().is_empty() {
            return Err(RagError::InvalidInput("team_id is required to build context".into()));
        }

        let Some(index) = &self.index else {
            return self.fallback(team_id, "vector search disabled").await;
        };

        let embedding = match self.embedder.embed(query).await {
            Ok(values) if !values.is_empty() => values,
            Ok(_) => return self.fallback(team_id, "query produced no embedding").await,
            Err(e) => {
                warn!(error = %e, "query embedding failed");
                return self.fallback(team_id, "query embedding failed").await;
            }
        };

        let matches = match index.query(&embedding, team_id, self.config.top_k).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "vector index query failed");
                return self.fallback(team_id, "vector index query failed").await;
            }
        };

        let context = build_context(&matches);
        if context.is_empty() {
            return self.fallback(team_id, "no similar chunks found").await;
        }

        debug!(team_id, match_count = matches.len(), "assembled context from vector matches");
        Ok(context)
    }

    /// Deterministic composite identifier for one chunk of a document.
    /// The team name is preferred over the raw team id for readability.
    fn vector_id(&self, document: &DocumentInput, chunk_index: usize) -> String {
        let scope = document.team_name.as_deref().unwrap_or(&document.team_id);
        format!("{scope}:{}:chunk-{chunk_index}", document.doc_id)
    }

    async fn fallback(&self, team_id: &str, reason: &str) -> Result<String> {
        info!(team_id, reason, "falling back to full-corpus context");
        let documents = self.store.documents(team_id).await?;
        Ok(fallback_context(&documents))
    }
}

/// Builder for constructing a [`KtPipeline`].
///
/// `config`, `embedder`, and `document_store` are required; `vector_index`
/// is optional (omitting it disables vector search).
#[derive(Default)]
pub struct KtPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl KtPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend. Skipping this disables vector search;
    /// retrieval then always uses the full-corpus fallback.
    pub fn vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the document store collaborator.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the [`KtPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing.
    pub fn build(self) -> Result<KtPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder =
            self.embedder.ok_or_else(|| RagError::Config("embedder is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| RagError::Config("document_store is required".to_string()))?;

        Ok(KtPipeline { config, embedder, index: self.index, store })
    }
}
