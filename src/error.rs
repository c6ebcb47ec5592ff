//! Error types for page generation.

use std::time::Duration;

/// Errors that can occur while generating a landing page.
#[derive(Debug, thiserror::Error)]
pub enum NanoBrandError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Delay hinted by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters (e.g. no product images).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model reply did not match the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The strategy reply contained no decodable plan.
    #[error("strategy engine failed: {0}")]
    StrategyParse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 or data-URL payloads.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g. reading an upload, writing an export).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NanoBrandError {
    /// Returns true if this error is likely transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }

    /// Returns the suggested retry delay, if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            Self::Network(_) => Some(Duration::from_secs(2)),
            _ => None,
        }
    }
}

/// Result type alias for page generation operations.
pub type Result<T> = std::result::Result<T, NanoBrandError>;

/// Parses a `Retry-After` header value in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Trims error bodies before they end up in logs or messages.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    const MAX_LEN: usize = 500;
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    if cleaned.len() > MAX_LEN {
        let mut end = MAX_LEN;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &cleaned[..end])
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(NanoBrandError::RateLimited { retry_after: None }.is_retryable());

        assert!(!NanoBrandError::Auth("bad key".into()).is_retryable());
        assert!(!NanoBrandError::StrategyParse("no block".into()).is_retryable());
        assert!(!NanoBrandError::ContentBlocked("nsfw".into()).is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let rate_limited = NanoBrandError::RateLimited {
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(rate_limited.retry_after(), Some(Duration::from_secs(60)));

        let auth = NanoBrandError::Auth("bad".into());
        assert_eq!(auth.retry_after(), None);
    }

    #[test]
    fn test_error_display() {
        let err = NanoBrandError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = NanoBrandError::StrategyParse("no fenced json block".into());
        assert_eq!(
            err.to_string(),
            "strategy engine failed: no fenced json block"
        );
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "17".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(17));

        headers.insert(reqwest::header::RETRY_AFTER, "soon".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_sanitize_error_message() {
        assert_eq!(sanitize_error_message("  plain \n"), "plain");

        let long = "x".repeat(600);
        let sanitized = sanitize_error_message(&long);
        assert!(sanitized.len() <= 503);
        assert!(sanitized.ends_with("..."));
    }
}
