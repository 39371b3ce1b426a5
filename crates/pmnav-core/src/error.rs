//! Error types for the navigator
//!
//! Failure taxonomy:
//! - Network errors, timeouts and HTTP 5xx are transient and retried
//! - HTTP 4xx and other statuses are not retried
//! - Template, routing and initializer failures surface like any other
//!   load failure, without retry

use pmnav_model::ViewId;
use pmnav_routing::RouteError;
use std::path::PathBuf;

/// Fragment fetch errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Server answered with a non-success status
    #[error("HTTP {status}")]
    Status {
        /// Status code
        status: u16,
    },

    /// Connection or transport failure
    #[error("network error: {0}")]
    Network(String),

    /// No response within the per-attempt timeout
    #[error("request timed out after {after_ms}ms")]
    Timeout {
        /// Timeout that elapsed
        after_ms: u64,
    },

    /// Response body could not be read
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Check if error is transient and worth retrying
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status } => (500..600).contains(status),
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::InvalidResponse(_) => false,
        }
    }

    /// Check if the server rejected the request itself (4xx)
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status } if (400..500).contains(status))
    }
}

/// Session storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Storage backend refused the operation
    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    /// Backend I/O failed
    #[error("session storage I/O failed: {0}")]
    Io(String),
}

/// Per-view initializer failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InitError {
    /// What went wrong
    pub message: String,
}

impl InitError {
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Main navigator error type
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// URL or fragment route could not be built
    #[error("routing failed: {0}")]
    Route(#[from] RouteError),

    /// Session storage failed
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),

    /// Context could not be (de)serialized
    #[error("context serialization failed: {0}")]
    Context(#[from] serde_json::Error),

    /// Per-view initializer failed
    #[error("initializer for '{view}' failed: {source}")]
    Initializer {
        /// View being initialized
        view: ViewId,
        /// Underlying error
        #[source]
        source: InitError,
    },

    /// Operation needs a current view and none is loaded yet
    #[error("no view has been navigated to yet")]
    NoActiveView,

    /// Breadcrumb index out of range
    #[error("no breadcrumb at position {0}")]
    UnknownBreadcrumb(usize),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_network_are_retryable() {
        assert!(FetchError::Status { status: 503 }.is_retryable());
        assert!(FetchError::Status { status: 500 }.is_retryable());
        assert!(FetchError::Network("reset".to_string()).is_retryable());
        assert!(FetchError::Timeout { after_ms: 10_000 }.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = FetchError::Status { status: 404 };
        assert!(!err.is_retryable());
        assert!(err.is_client_error());
        assert!(!FetchError::Status { status: 302 }.is_retryable());
        assert!(!FetchError::InvalidResponse("bad utf-8".to_string()).is_retryable());
    }

    #[test]
    fn nav_error_display() {
        let err = NavError::Initializer {
            view: ViewId::Gantt,
            source: InitError::new("timeline container missing"),
        };
        assert_eq!(
            err.to_string(),
            "initializer for 'gantt' failed: timeline container missing"
        );
        assert_eq!(FetchError::Status { status: 503 }.to_string(), "HTTP 503");
    }
}
