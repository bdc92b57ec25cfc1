//! HTTP client for the Gemini REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{GeminiError, Result, classify_response};
use crate::fallback::TextGenerator;
use crate::model::Model;

/// The default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-request timeout. A hung provider call must not block an upload or a
/// chat turn indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An async client for the Gemini `generateContent` and `embedContent`
/// endpoints.
///
/// # Example
///
/// ```rust,ignore
/// use kt_gemini::{Gemini, Model};
///
/// let client = Gemini::new("AIza...")?;
/// let text = client.generate(&Model::Gemini25Flash, "Say hello").await?;
/// let vector = client.embed(&Model::TextEmbedding004, "hello").await?;
/// ```
pub struct Gemini {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl Gemini {
    /// Create a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Auth`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::Auth("API key must not be empty".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GeminiError::Transport)?;

        Ok(Self { http, api_key, base_url: DEFAULT_BASE_URL.to_string() })
    }

    /// Create a new client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::Auth("GEMINI_API_KEY environment variable not set".into()))?;
        Self::new(api_key)
    }

    /// Override the API base URL (test servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn model_url(&self, model: &Model, method: &str) -> String {
        format!("{}/models/{}:{method}", self.base_url, model.as_str())
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(GeminiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_response(status.as_u16(), &body);
            error!(status = status.as_u16(), error = %err, "Gemini API error");
            return Err(err);
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| GeminiError::Decode(e.to_string()))
    }

    /// Generate text from a single prompt.
    ///
    /// # Errors
    ///
    /// Returns the classified provider error, or [`GeminiError::EmptyResponse`]
    /// if the API answered without any candidate text.
    pub async fn generate(&self, model: &Model, prompt: &str) -> Result<String> {
        debug!(model = %model, prompt_len = prompt.len(), "generating content");

        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };
        let url = self.model_url(model, "generateContent");
        let response: GenerateResponse = self.post(&url, &request).await?;

        response
            .candidates
            .into_iter()
            .flatten()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts)
            .into_iter()
            .flatten()
            .filter_map(|part| part.text)
            .reduce(|mut acc, part| {
                acc.push_str(&part);
                acc
            })
            .ok_or(GeminiError::EmptyResponse)
    }

    /// Generate an embedding vector for a single text input.
    ///
    /// Providers are inconsistent about the response shape: the adapter
    /// accepts both the singular `embedding` object and the plural
    /// `embeddings` list, and normalizes to one `Vec<f32>`.
    pub async fn embed(&self, model: &Model, text: &str) -> Result<Vec<f32>> {
        debug!(model = %model, text_len = text.len(), "embedding text");

        let request = EmbedRequest {
            content: Content { parts: vec![Part { text }] },
        };
        let url = self.model_url(model, "embedContent");
        let response: EmbedResponse = self.post(&url, &request).await?;

        let values = response
            .embedding
            .map(|e| e.values)
            .or_else(|| response.embeddings.into_iter().flatten().next().map(|e| e.values))
            .ok_or(GeminiError::EmptyResponse)?;

        if values.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(values)
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    async fn generate(&self, model: &Model, prompt: &str) -> Result<String> {
        Gemini::generate(self, model, prompt).await
    }
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    /// Singular shape: `{"embedding": {"values": [...]}}`.
    embedding: Option<ContentEmbedding>,
    /// Plural shape: `{"embeddings": [{"values": [...]}]}`.
    embeddings: Option<Vec<ContentEmbedding>>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
