//! HTTP client errors

/// JSON API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Base URL is not an absolute http(s) URL
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// URL as given
        url: String,
        /// Parse failure
        reason: String,
    },

    /// Transport failure (connect, timeout, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{method} {path} failed: HTTP {status}")]
    Status {
        /// Request method
        method: String,
        /// API path
        path: String,
        /// Status code
        status: u16,
    },

    /// Body was not the expected JSON
    #[error("invalid JSON from {path}: {reason}")]
    Decode {
        /// API path
        path: String,
        /// Decoder message
        reason: String,
    },

    /// `/csrf-token` answered without a token
    #[error("CSRF token missing from response")]
    MissingCsrfToken,
}

impl ApiError {
    /// Check if error is transient and worth retrying
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => (500..600).contains(status),
            Self::InvalidBaseUrl { .. } | Self::Decode { .. } | Self::MissingCsrfToken => false,
        }
    }
}
