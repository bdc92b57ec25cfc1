//! Configuration for the knowledge-base pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the pipeline.
///
/// Defaults match the production deployment: 1000-character chunks with a
/// 200-character overlap, 500-character metadata snippets, and Pinecone's
/// recommended upsert batch size of 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to request from vector search.
    pub top_k: usize,
    /// Maximum snippet length stored in vector metadata, in characters.
    pub snippet_len: usize,
    /// Maximum summary length stored in vector metadata, in characters.
    pub summary_metadata_len: usize,
    /// Maximum number of records per upsert call.
    pub upsert_batch_size: usize,
    /// Maximum context length handed to generation, in characters.
    pub max_context_len: usize,
    /// Maximum document length handed to summarization, in characters.
    pub max_summary_input_len: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 10,
            snippet_len: 500,
            summary_metadata_len: 500,
            upsert_batch_size: 100,
            max_context_len: 50_000,
            max_summary_input_len: 30_000,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to request from vector search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum snippet length stored in vector metadata.
    pub fn snippet_len(mut self, len: usize) -> Self {
        self.config.snippet_len = len;
        self
    }

    /// Set the maximum summary length stored in vector metadata.
    pub fn summary_metadata_len(mut self, len: usize) -> Self {
        self.config.summary_metadata_len = len;
        self
    }

    /// Set the maximum document length handed to summarization.
    pub fn max_summary_input_len(mut self, len: usize) -> Self {
        self.config.max_summary_input_len = len;
        self
    }

    /// Set the maximum number of records per upsert call.
    pub fn upsert_batch_size(mut self, size: usize) -> Self {
        self.config.upsert_batch_size = size;
        self
    }

    /// Set the maximum context length handed to generation.
    pub fn max_context_len(mut self, len: usize) -> Self {
        self.config.max_context_len = len;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size` (the chunker would never advance)
    /// - `top_k == 0`
    /// - `upsert_batch_size == 0`
    pub fn build(self) -> Result<RagConfig> {
        if self.config.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.upsert_batch_size == 0 {
            return Err(RagError::Config(
                "upsert_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = RagConfig::builder().build().unwrap();
        assert_eq!(config, RagConfig::default());
    }

    #[test]
    fn overlap_must_be_less_than_chunk_size() {
        let result = RagConfig::builder().chunk_size(100).chunk_overlap(100).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let result = RagConfig::builder().chunk_size(0).chunk_overlap(0).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let result = RagConfig::builder().top_k(0).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }
}
