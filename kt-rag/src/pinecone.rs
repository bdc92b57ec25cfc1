//! Pinecone vector index backend over the REST data-plane API.
//!
//! Pinecone has no native "delete by metadata filter", so
//! [`delete_document`](crate::VectorIndex::delete_document) runs a
//! zero-vector query that exists only to exercise the metadata filter, then
//! deletes the returned identifiers explicitly.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::document::{ChunkMetadata, QueryMatch, VectorRecord};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorIndex;

/// Per-request timeout against the Pinecone data plane.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `top_k` used by the delete-by-document query; large enough to cover
/// every chunk of a single document.
const DELETE_QUERY_TOP_K: usize = 10_000;

/// A [`VectorIndex`] backed by a [Pinecone](https://www.pinecone.io/) index.
///
/// Talks to the index's data-plane host (`https://<index>-<project>.svc.<region>.pinecone.io`)
/// using the REST endpoints `/vectors/upsert`, `/query`, and `/vectors/delete`.
///
/// # Example
///
/// ```rust,ignore
/// use kt_rag::PineconeIndex;
///
/// // Explicit configuration, or from PINECONE_API_KEY / PINECONE_INDEX_HOST:
/// let index = PineconeIndex::new("pc-...", "https://kt-docs-abc123.svc.us-east-1.pinecone.io")?;
/// let index = PineconeIndex::from_env();   // None when unconfigured
/// ```
pub struct PineconeIndex {
    http: reqwest::Client,
    api_key: String,
    index_host: String,
    dimensions: usize,
}

impl PineconeIndex {
    /// Default embedding dimensionality (Gemini `text-embedding-004`).
    const DEFAULT_DIMENSIONS: usize = 768;

    /// Create a new adapter for the given API key and index host.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if either value is empty.
    pub fn new(api_key: impl Into<String>, index_host: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let mut index_host = index_host.into();
        if api_key.trim().is_empty() {
            return Err(RagError::Config("Pinecone API key must not be empty".to_string()));
        }
        if index_host.trim().is_empty() {
            return Err(RagError::Config("Pinecone index host must not be empty".to_string()));
        }
        if !index_host.starts_with("http") {
            index_host = format!("https://{index_host}");
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Self::map_err(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            index_host: index_host.trim_end_matches('/').to_string(),
            dimensions: Self::DEFAULT_DIMENSIONS,
        })
    }

    /// Create an adapter from `PINECONE_API_KEY` and `PINECONE_INDEX_HOST`.
    ///
    /// Returns `None` when either variable is missing or the configuration
    /// is invalid — the caller treats that as the vector backend being
    /// disabled, not as an error.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("PINECONE_API_KEY").ok()?;
        let index_host = std::env::var("PINECONE_INDEX_HOST").ok()?;
        match Self::new(api_key, index_host) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(error = %e, "failed to initialize Pinecone, vector search will be disabled");
                None
            }
        }
    }

    /// Override the index dimensionality (used for the zero-vector delete
    /// query).
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn map_err(message: impl Into<String>) -> RagError {
        RagError::VectorIndex { backend: "Pinecone".to_string(), message: message.into() }
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{path}", self.index_host);
        let response = self
            .http
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::map_err(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Self::map_err(format!("{path} returned {status}: {detail}")));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| Self::map_err(format!("failed to parse {path} response: {e}")))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let vectors: Vec<UpsertVector<'_>> = records
            .iter()
            .map(|record| UpsertVector {
                id: &record.id,
                values: &record.values,
                metadata: &record.metadata,
            })
            .collect();

        let response: UpsertResponse =
            self.post("/vectors/upsert", &UpsertRequest { vectors }).await?;

        debug!(count = response.upserted_count, "upserted vectors to Pinecone");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        team_id: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            filter: json!({ "team_id": { "$eq": team_id } }),
            include_metadata: true,
        };
        let response: QueryResponse = self.post("/query", &request).await?;

        let matches = response
            .matches
            .into_iter()
            .filter_map(|m| {
                let Some(metadata) = m.metadata else {
                    warn!(id = %m.id, "Pinecone match carried no metadata, dropping");
                    return None;
                };
                Some(QueryMatch { id: m.id, score: m.score, metadata })
            })
            .collect();

        Ok(matches)
    }

    async fn delete_document(&self, team_id: &str, doc_id: &str) -> Result<usize> {
        // Zero vector: the query is only a vehicle for the metadata filter.
        let zero = vec![0.0f32; self.dimensions];
        let request = QueryRequest {
            vector: &zero,
            top_k: DELETE_QUERY_TOP_K,
            filter: json!({
                "team_id": { "$eq": team_id },
                "doc_id": { "$eq": doc_id },
            }),
            include_metadata: false,
        };
        let response: QueryResponse = self.post("/query", &request).await?;

        let ids: Vec<String> = response.matches.into_iter().map(|m| m.id).collect();
        if ids.is_empty() {
            return Ok(0);
        }

        let _: DeleteResponse = self.post("/vectors/delete", &DeleteRequest { ids: &ids }).await?;
        debug!(doc_id, count = ids.len(), "deleted document vectors from Pinecone");
        Ok(ids.len())
    }
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a ChunkMetadata,
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: u64,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    filter: serde_json::Value,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<ChunkMetadata>,
}

#[derive(Deserialize, Default)]
struct DeleteResponse {}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [String],
}
