//! Error handling for the feed fetchers

use strum::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// Reqwest error, typically related to network issues or request timeouts.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The feed answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON for the expected shape.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but does not carry usable data.
    #[error("Invalid data format received: {0}")]
    InvalidFormat(String),
}

/// Broad failure classes surfaced to the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum FailureKind {
    /// Transport error, timeout, or non-2xx status.
    Network,
    /// The payload does not match the expected shape.
    Format,
}

impl FeedError {
    pub async fn from_response(response: reqwest::Response) -> FeedError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        FeedError::Http { status, message }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FeedError::Reqwest(e) if e.is_decode() => FailureKind::Format,
            FeedError::Reqwest(_) | FeedError::Http { .. } => FailureKind::Network,
            FeedError::Decode(_) | FeedError::InvalidFormat(_) => FailureKind::Format,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Http { status, .. } => Some(*status),
            FeedError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The two upstream feeds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum FeedKind {
    #[strum(to_string = "ArbiPair")]
    Pairs,
    #[strum(to_string = "ArbiTrack")]
    Track,
}

/// A failed refresh cycle, attributed to the feed that failed first.
#[derive(Debug, Error)]
#[error("{feed} fetch failed: {source}")]
pub struct RefreshError {
    pub feed: FeedKind,
    #[source]
    pub source: FeedError,
}

impl RefreshError {
    pub fn new(feed: FeedKind, source: FeedError) -> Self {
        Self { feed, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kinds() {
        let http = FeedError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(http.kind(), FailureKind::Network);
        assert_eq!(http.status(), Some(503));

        let format = FeedError::InvalidFormat("empty mapping".to_string());
        assert_eq!(format.kind(), FailureKind::Format);
        assert_eq!(format.status(), None);

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(FeedError::from(decode).kind(), FailureKind::Format);
    }

    #[test]
    // The refresh error message names the failing feed first.
    fn test_refresh_error_message() {
        let err = RefreshError::new(
            FeedKind::Pairs,
            FeedError::Http {
                status: 500,
                message: String::new(),
            },
        );
        assert_eq!(
            err.to_string(),
            "ArbiPair fetch failed: HTTP error! status: 500"
        );

        let err = RefreshError::new(
            FeedKind::Track,
            FeedError::InvalidFormat("expected a non-empty object".to_string()),
        );
        assert!(err.to_string().starts_with("ArbiTrack fetch failed: Invalid data format"));
    }
}
