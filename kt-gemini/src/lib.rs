//! Gemini REST client for the KT hub.
//!
//! This crate wraps the Google Gemini API behind a small async surface:
//!
//! - [`Gemini`] — HTTP client for `generateContent` and `embedContent`
//! - [`Model`] — model identifiers used by the KT hub
//! - [`FallbackChain`] — quota-aware model fallback for generation
//! - [`GeminiError`] — typed errors with quota/auth classification
//!
//! # Example
//!
//! ```rust,ignore
//! use kt_gemini::{FallbackChain, Gemini, Model};
//!
//! let client = Gemini::from_env()?;
//! let embedding = client.embed(&Model::TextEmbedding004, "hello world").await?;
//!
//! let chain = FallbackChain::new(std::sync::Arc::new(client));
//! let answer = chain.generate("What is a vector index?").await?;
//! ```

pub mod client;
pub mod error;
pub mod fallback;
pub mod model;

pub use client::Gemini;
pub use error::{GeminiError, Result};
pub use fallback::{FallbackChain, TextGenerator};
pub use model::Model;
