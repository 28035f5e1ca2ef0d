//! Error type for page retrieval.
//!
//! [`FetchError`] separates failures worth retrying (timeouts, failed
//! connects, 429, 5xx) from permanent ones; [`crate::fetch::RetryFetch`]
//! only retries the former.

use thiserror::Error;

/// Failure to retrieve a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported URL scheme `{0}` (only http and https are fetched)")]
    UnsupportedScheme(String),
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("empty response body from {0}")]
    EmptyBody(String),
}

impl FetchError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transience() {
        let status = |status| FetchError::Status {
            url: "https://example.com".to_string(),
            status,
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(403).is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        assert!(!FetchError::UnsupportedScheme("ftp".into()).is_transient());
        assert!(!FetchError::EmptyBody("https://example.com".into()).is_transient());
    }

    #[test]
    fn test_malformed_request_is_permanent() {
        let source = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let e = FetchError::Transport {
            url: "not a url".to_string(),
            source,
        };
        assert!(!e.is_transient());
    }

    #[test]
    fn test_display() {
        let e = FetchError::Status {
            url: "https://example.com/a".to_string(),
            status: 404,
        };
        assert_eq!(e.to_string(), "HTTP 404 from https://example.com/a");
    }
}
