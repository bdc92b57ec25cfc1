//! In-memory vector index using cosine similarity.
//!
//! [`InMemoryVectorIndex`] backs the pipeline in tests and small
//! deployments: a `HashMap` behind a `tokio::sync::RwLock`, cosine scoring,
//! and the same team-filter contract as the Pinecone backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{QueryMatch, VectorRecord};
use crate::error::Result;
use crate::vectorstore::VectorIndex;

/// An in-memory [`VectorIndex`] using cosine similarity for search.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the index holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut store = self.records.write().await;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        embedding: &[f32],
        team_id: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>> {
        let store = self.records.read().await;

        // Team scope is a hard predicate applied before scoring, matching
        // the filtered-query contract of the real backend.
        let mut scored: Vec<QueryMatch> = store
            .values()
            .filter(|record| record.metadata.team_id == team_id)
            .map(|record| QueryMatch {
                id: record.id.clone(),
                score: cosine_similarity(&record.values, embedding),
                metadata: record.metadata.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn delete_document(&self, team_id: &str, doc_id: &str) -> Result<usize> {
        let mut store = self.records.write().await;
        let before = store.len();
        store.retain(|_, record| {
            !(record.metadata.team_id == team_id && record.metadata.doc_id == doc_id)
        });
        Ok(before - store.len())
    }
}
