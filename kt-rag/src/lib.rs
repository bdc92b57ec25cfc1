//! Retrieval-augmented context assembly for the team-scoped KT hub.
//!
//! Uploaded documents are chunked, embedded, and indexed per team; free-text
//! questions are answered from the most similar chunks, with an automatic
//! full-corpus fallback when the vector backend is unavailable. Every vector,
//! query, and context is scoped to exactly one team.
//!
//! # Components
//!
//! - [`chunking`] — overlapping fixed-size text windows
//! - [`EmbeddingProvider`] / [`GeminiEmbedding`] — text → fixed-dimension vector
//! - [`VectorIndex`] / [`PineconeIndex`] / [`InMemoryVectorIndex`] — upsert,
//!   team-filtered query, delete-by-document
//! - [`DocumentStore`] — the external document rows (fallback corpus)
//! - [`KtPipeline`] — the indexing and retrieval orchestrators
//! - [`KtAssistant`] — grounded answers and summaries via quota-aware
//!   model fallback
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kt_gemini::{FallbackChain, Gemini};
//! use kt_rag::{
//!     GeminiEmbedding, InMemoryDocumentStore, KtAssistant, KtPipeline, PineconeIndex, RagConfig,
//! };
//!
//! let gemini = Arc::new(Gemini::from_env()?);
//! let store = Arc::new(InMemoryDocumentStore::new());
//!
//! let mut builder = KtPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedder(Arc::new(GeminiEmbedding::new(gemini.clone())))
//!     .document_store(store.clone());
//! if let Some(index) = PineconeIndex::from_env() {
//!     builder = builder.vector_index(Arc::new(index));
//! }
//! let pipeline = Arc::new(builder.build()?);
//!
//! pipeline.index_document(&document).await?;
//!
//! let assistant = KtAssistant::new(pipeline, FallbackChain::new(gemini));
//! let reply = assistant.chat("How does the auth module work?", "team-a").await;
//! ```

pub mod assistant;
pub mod chunking;
pub mod config;
pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod gemini;
pub mod inmemory;
pub mod pinecone;
pub mod pipeline;
pub mod store;
pub mod vectorstore;

pub use assistant::{KtAssistant, NOT_IN_CONTEXT};
pub use chunking::{Chunks, chunks};
pub use config::{RagConfig, RagConfigBuilder};
pub use context::{build_context, fallback_context};
pub use document::{ChunkMetadata, DocumentInput, QueryMatch, StoredDocument, VectorRecord};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use gemini::GeminiEmbedding;
pub use inmemory::InMemoryVectorIndex;
pub use pinecone::PineconeIndex;
pub use pipeline::{KtPipeline, KtPipelineBuilder};
pub use store::{DocumentStore, InMemoryDocumentStore};
pub use vectorstore::VectorIndex;
