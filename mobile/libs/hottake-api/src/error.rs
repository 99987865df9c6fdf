//! Error handling for HotTake API calls
//!
//! One error type covers configuration, input validation, transport and
//! server rejections so callers can treat every remote failure uniformly.

use thiserror::Error;

/// Result type alias for API calls
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required identifier or content missing; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request exceeded its deadline
    #[error("Timeout: {0}")]
    Timeout(#[from] resilience::TimeoutError),

    /// Server answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Success status but the body could not be decoded
    #[error("Failed to decode {operation} response: {reason}")]
    Decode { operation: String, reason: String },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status returned by the server, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::Config(_) | Self::Validation(_) | Self::Decode { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn rejected(status: u16) -> ApiError {
        ApiError::Rejected {
            status,
            message: format!("agree failed: {}", status),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(rejected(500).is_retryable());
        assert!(rejected(503).is_retryable());
        assert!(rejected(429).is_retryable());
        assert!(!rejected(400).is_retryable());
        assert!(!rejected(404).is_retryable());
        assert!(ApiError::Timeout(resilience::TimeoutError::Elapsed(Duration::from_secs(1)))
            .is_retryable());
        assert!(!ApiError::validation("Missing postID").is_retryable());
        assert!(!ApiError::Config("no base url".into()).is_retryable());
    }

    #[test]
    fn test_rejected_displays_message_verbatim() {
        assert_eq!(rejected(500).to_string(), "agree failed: 500");
        assert_eq!(rejected(502).status(), Some(502));
        assert_eq!(ApiError::validation("x").status(), None);
    }
}
