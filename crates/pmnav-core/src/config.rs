//! Navigator configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! app_title = "Acme PMO"
//! default_view = "projects"
//! max_attempts = 5
//! ```

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use pmnav_model::{ViewId, DEFAULT_BREADCRUMB_LIMIT, NAVIGATION_CONTEXT_KEY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Navigator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Suffix of every document title
    pub app_title: String,
    /// View for unmapped paths and the "go home" action
    pub default_view: ViewId,
    /// Breadcrumb entries kept
    pub breadcrumb_limit: usize,
    /// Transient failures tolerated per load
    pub max_attempts: u32,
    /// Linear backoff step in milliseconds
    pub backoff_step_ms: u64,
    /// Per-attempt fragment timeout in seconds
    pub request_timeout_secs: u64,
    /// Session storage key for the page context
    pub context_key: String,
}

impl NavigatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With app title
    #[inline]
    #[must_use]
    pub fn with_app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = title.into();
        self
    }

    /// With default view
    #[inline]
    #[must_use]
    pub fn with_default_view(mut self, view: ViewId) -> Self {
        self.default_view = view;
        self
    }

    /// With retry budget
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// With per-attempt timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Parse TOML and validate
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML, `ConfigError::Invalid` for
    /// out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, plus the errors of
    /// [`NavigatorConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".to_string()));
        }
        if self.breadcrumb_limit == 0 {
            return Err(ConfigError::Invalid(
                "breadcrumb_limit must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.context_key.trim().is_empty() {
            return Err(ConfigError::Invalid("context_key must not be empty".to_string()));
        }
        Ok(())
    }

    /// Retry policy for fragment loads
    #[inline]
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.max_attempts, Duration::from_millis(self.backoff_step_ms))
    }

    /// Per-attempt timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            app_title: "PM Dashboard".to_string(),
            default_view: ViewId::Dashboard,
            breadcrumb_limit: DEFAULT_BREADCRUMB_LIMIT,
            max_attempts: 3,
            backoff_step_ms: 1000,
            request_timeout_secs: 10,
            context_key: NAVIGATION_CONTEXT_KEY.to_string(),
        }
    }
}
