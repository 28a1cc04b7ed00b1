//! Error types for the OpenAlex client.

use serde_json::{json, Value};
use std::time::Duration;

/// Link included in every JSON error envelope.
pub const DOCUMENTATION_URL: &str = "https://docs.openalex.org/";

/// Errors that can occur when interacting with the OpenAlex API.
#[derive(Debug, thiserror::Error)]
pub enum OpenAlexError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("Connection error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenAlex returned an unexpected error status code.
    #[error("API request failed: {status}")]
    Api { status: u16, message: String },

    /// OpenAlex rejected the query (HTTP 400).
    #[error("{message}")]
    BadRequest { message: String },

    /// Entity not found (HTTP 404).
    #[error("Entity not found")]
    NotFound,

    /// Rate limited by OpenAlex (HTTP 429) after all retries were spent.
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    /// Identifier is not something OpenAlex can resolve.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// A command-line or builder argument is out of range or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to interpret an API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL or request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl OpenAlexError {
    /// HTTP status associated with the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::BadRequest { .. } => Some(400),
            Self::NotFound => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// A hint telling the user what to try next.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Http(_) => Some("Check your network connection"),
            Self::BadRequest { .. } => Some("Check the query parameters and filter syntax"),
            Self::NotFound => Some(
                "Check the ID format. OpenAlex IDs start with W (works), A (authors), \
                 I (institutions), S (sources), etc.",
            ),
            Self::RateLimited { .. } => Some(
                "Wait a moment or add your email via --email or OPENALEX_EMAIL env var for higher limits",
            ),
            Self::InvalidId(_) => Some(
                "Use an OpenAlex ID (W123, A123, I123, S123) or a DOI, ORCID, ROR, or ISSN",
            ),
            _ => None,
        }
    }

    /// Error envelope printed in JSON output mode.
    pub fn to_json(&self) -> Value {
        let mut out = json!({ "error": self.to_string() });
        if let Some(status) = self.status_code() {
            out["status_code"] = json!(status);
        }
        if let Some(suggestion) = self.suggestion() {
            out["suggestion"] = json!(suggestion);
        }
        out["documentation"] = json!(DOCUMENTATION_URL);
        out
    }
}

/// Convenience alias for Results using [`OpenAlexError`].
pub type Result<T> = std::result::Result<T, OpenAlexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_envelope() {
        let v = OpenAlexError::NotFound.to_json();
        assert_eq!(v["error"], "Entity not found");
        assert_eq!(v["status_code"], 404);
        assert!(v["suggestion"].as_str().unwrap().contains("W (works)"));
        assert_eq!(v["documentation"], DOCUMENTATION_URL);
    }

    #[test]
    fn envelope_without_status() {
        let v = OpenAlexError::InvalidArgument("page must be at least 1".into()).to_json();
        assert_eq!(v["error"], "Invalid argument: page must be at least 1");
        assert!(v.get("status_code").is_none());
        assert!(v.get("suggestion").is_none());
    }

    #[test]
    fn bad_request_uses_server_message() {
        let err = OpenAlexError::BadRequest {
            message: "Invalid query parameter".into(),
        };
        assert_eq!(err.to_string(), "Invalid query parameter");
        assert_eq!(err.status_code(), Some(400));
    }
}
