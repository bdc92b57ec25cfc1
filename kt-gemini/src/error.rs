//! Error types for the `kt-gemini` crate.
//!
//! Provider failures are classified into typed variants so callers can
//! distinguish quota exhaustion (retryable on another model) from auth
//! problems and generic API failures (not retryable). Classification uses
//! the HTTP status code first, the structured `status` field of the error
//! body second, and message substrings only as a last resort.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when calling the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The API key was rejected (invalid, expired, or lacking permission).
    #[error("Gemini API key rejected: {0}")]
    Auth(String),

    /// The current model's quota is exhausted.
    #[error("Gemini quota exceeded: {message}")]
    RateLimited {
        /// The provider's error message.
        message: String,
        /// Retry delay suggested by the provider, if any.
        retry_after: Option<Duration>,
    },

    /// Any other API-level failure.
    #[error("Gemini API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// A description of the failure.
        message: String,
    },

    /// The request never produced an HTTP response (network, timeout, TLS).
    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("failed to decode Gemini response: {0}")]
    Decode(String),

    /// The API answered but carried no usable candidate or embedding.
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// Every candidate model in a fallback chain ran out of quota.
    #[error("all candidate models exhausted their quota")]
    Exhausted,
}

impl GeminiError {
    /// Whether this error means the current model's quota is exhausted and
    /// another model may still succeed.
    pub fn is_quota(&self) -> bool {
        matches!(self, GeminiError::RateLimited { .. })
    }

    /// The provider-suggested retry delay, if the error carries one.
    pub fn suggested_retry(&self) -> Option<Duration> {
        match self {
            GeminiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A convenience result type for Gemini operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

// ── Error-body classification ──────────────────────────────────────

/// Google API error envelope: `{"error": {"code", "message", "status", "details"}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Matches `"retry in 26.37s"` / `"Please retry in 7s"` in error messages
/// and the `"37s"` form used by `RetryInfo.retryDelay` detail payloads.
static RETRY_DELAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)retry in\s+(\d+(?:\.\d+)?)s").expect("valid regex"));
static BARE_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)s$").expect("valid regex"));

/// Extract a suggested retry delay from an error message.
pub(crate) fn parse_retry_delay(message: &str) -> Option<Duration> {
    let secs: f64 = RETRY_DELAY.captures(message)?.get(1)?.as_str().parse().ok()?;
    Some(Duration::from_secs_f64(secs))
}

/// Extract the `retryDelay` from a `google.rpc.RetryInfo` detail entry.
fn retry_delay_from_details(details: &[serde_json::Value]) -> Option<Duration> {
    for detail in details {
        if let Some(delay) = detail.get("retryDelay").and_then(|v| v.as_str()) {
            if let Some(caps) = BARE_SECONDS.captures(delay) {
                if let Ok(secs) = caps[1].parse::<f64>() {
                    return Some(Duration::from_secs_f64(secs));
                }
            }
        }
    }
    None
}

/// Classify a non-success HTTP response into a [`GeminiError`].
pub(crate) fn classify_response(status: u16, body: &str) -> GeminiError {
    const NO_DETAILS: &[serde_json::Value] = &[];

    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let (message, api_status, details) = match &parsed {
        Some(envelope) => (
            envelope.error.message.clone(),
            envelope.error.status.as_str(),
            envelope.error.details.as_slice(),
        ),
        None => (body.trim().to_string(), "", NO_DETAILS),
    };

    let quota = status == 429 || api_status == "RESOURCE_EXHAUSTED";
    if quota {
        let retry_after =
            retry_delay_from_details(details).or_else(|| parse_retry_delay(&message));
        return GeminiError::RateLimited { message, retry_after };
    }

    let auth = matches!(status, 401 | 403)
        || matches!(api_status, "UNAUTHENTICATED" | "PERMISSION_DENIED")
        // Gemini reports a bad key as 400 INVALID_ARGUMENT; the message is
        // the only remaining signal.
        || message.contains("API key not valid")
        || message.contains("API_KEY_INVALID");
    if auth {
        return GeminiError::Auth(message);
    }

    GeminiError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_is_quota() {
        let err = classify_response(429, r#"{"error":{"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#);
        assert!(err.is_quota());
    }

    #[test]
    fn resource_exhausted_status_is_quota_even_without_429() {
        let err = classify_response(503, r#"{"error":{"message":"slow down","status":"RESOURCE_EXHAUSTED"}}"#);
        assert!(err.is_quota());
    }

    #[test]
    fn retry_delay_parsed_from_message() {
        let err = classify_response(
            429,
            r#"{"error":{"message":"Quota exceeded. Please retry in 26.5s.","status":"RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(err.suggested_retry(), Some(Duration::from_secs_f64(26.5)));
    }

    #[test]
    fn retry_delay_parsed_from_retry_info_detail() {
        let body = r#"{"error":{"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED","details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"37s"}]}}"#;
        let err = classify_response(429, body);
        assert_eq!(err.suggested_retry(), Some(Duration::from_secs(37)));
    }

    #[test]
    fn bad_key_is_auth_not_quota() {
        let err = classify_response(
            400,
            r#"{"error":{"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#,
        );
        assert!(matches!(err, GeminiError::Auth(_)));
    }

    #[test]
    fn forbidden_is_auth() {
        let err = classify_response(403, r#"{"error":{"message":"no","status":"PERMISSION_DENIED"}}"#);
        assert!(matches!(err, GeminiError::Auth(_)));
    }

    #[test]
    fn unparseable_body_falls_back_to_api_error() {
        let err = classify_response(500, "internal error");
        match err {
            GeminiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
