//! Document store collaborator.
//!
//! Document rows live in an external relational store; the pipeline only
//! needs the team-scoped read contract for its full-corpus fallback path.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::StoredDocument;
use crate::error::Result;

/// Read access to a team's document rows.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents belonging to `team_id`, in arrival order.
    async fn documents(&self, team_id: &str) -> Result<Vec<StoredDocument>>;
}

/// An in-memory [`DocumentStore`] for tests and small deployments.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, replacing any existing row with the same team and
    /// filename (uploads of the same file overwrite).
    pub async fn add(&self, document: StoredDocument) {
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents
            .iter_mut()
            .find(|d| d.team_id == document.team_id && d.filename == document.filename)
        {
            *existing = document;
        } else {
            documents.push(document);
        }
    }

    /// Remove a document by team and filename. Returns whether a row was
    /// removed.
    pub async fn remove(&self, team_id: &str, filename: &str) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !(d.team_id == team_id && d.filename == filename));
        documents.len() < before
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn documents(&self, team_id: &str) -> Result<Vec<StoredDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| d.team_id == team_id).cloned().collect())
    }
}
