//! Error types for the `kt-rag` crate.

use thiserror::Error;

/// Errors that can occur in the knowledge-base pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("Vector index error ({backend}): {message}")]
    VectorIndex {
        /// The vector index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred reading from the document store.
    #[error("Document store error: {0}")]
    Store(String),

    /// Required input was missing or empty. Not retried, not degraded:
    /// no fallback can supply a missing team scope or empty document.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error propagated from the Gemini client.
    #[error(transparent)]
    Gemini(#[from] kt_gemini::GeminiError),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
