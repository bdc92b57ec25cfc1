//! Gemini model identifiers.

use std::fmt::{self, Formatter};

use serde::{Deserialize, Serialize};

/// A Gemini model name.
///
/// Known models used by the KT hub are listed as variants; anything else
/// can be passed through [`Model::Custom`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// Primary chat model.
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    /// Lightweight chat model, first fallback when quota runs out.
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    /// Highest-capability chat model, last fallback.
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    /// Text embedding model (768 dimensions).
    #[serde(rename = "text-embedding-004")]
    TextEmbedding004,
    /// Any other model name, passed through verbatim.
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    /// The bare model name, without the `models/` URL prefix.
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::TextEmbedding004 => "text-embedding-004",
            Model::Custom(model) => model,
        }
    }

    /// The default ordered candidate list for chat generation: primary
    /// first, cheaper and stronger fallbacks after it.
    pub fn default_chat_chain() -> Vec<Model> {
        vec![Model::Gemini25Flash, Model::Gemini25FlashLite, Model::Gemini25Pro]
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Self::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Self::Custom(model.to_string())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
