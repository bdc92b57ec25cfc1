//! Data types for documents, vector records, and query matches.

use serde::{Deserialize, Serialize};

/// A document handed to the indexing orchestrator.
///
/// Carries the extracted plain text plus the metadata that ends up on every
/// vector record derived from it. The document row itself lives in the
/// external relational store; this type only describes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInput {
    /// The owning team's identifier. Required — the sole retrieval scope.
    pub team_id: String,
    /// Opaque document identifier assigned by the document store.
    pub doc_id: String,
    /// Original filename, shown in assembled context.
    pub filename: String,
    /// Full extracted text content.
    pub content: String,
    /// Username of the uploader.
    pub uploaded_by: String,
    /// Optional short summary, stored (truncated) in vector metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Optional human-readable team name, preferred over `team_id` in
    /// vector identifiers for readability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

/// Metadata attached to every vector record.
///
/// `team_id` is the access-control boundary: queries filter on it at the
/// index layer, and a record is never returned for another team's query.
/// The snippet carries enough chunk text to rebuild context without
/// re-fetching the full document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// The owning team's identifier.
    pub team_id: String,
    /// The source document's identifier.
    pub doc_id: String,
    /// The source document's filename.
    pub filename: String,
    /// Username of the uploader.
    pub uploaded_by: String,
    /// Ordinal of this chunk within the document.
    pub chunk_index: usize,
    /// Bounded-length prefix of the chunk text.
    pub snippet: String,
    /// Human-readable team name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    /// Bounded-length document summary, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// A vector record persisted in the index.
///
/// The identifier is the deterministic composite
/// `{team_name_or_id}:{doc_id}:chunk-{ordinal}`, so re-indexing the same
/// document overwrites its previous records instead of duplicating them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    /// Composite identifier.
    pub id: String,
    /// The embedding vector.
    pub values: Vec<f32>,
    /// Record metadata.
    pub metadata: ChunkMetadata,
}

/// A single similarity-query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    /// The matched record's identifier.
    pub id: String,
    /// Similarity score (higher is more relevant).
    pub score: f32,
    /// The matched record's metadata.
    pub metadata: ChunkMetadata,
}

/// A document row as read from the document store collaborator.
///
/// The retrieval fallback path depends only on this read contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    /// Opaque document identifier.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Full extracted text content.
    pub content: String,
    /// Stored summary, if one has been generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Username of the uploader.
    pub uploaded_by: String,
    /// The owning team's identifier.
    pub team_id: String,
}
