//! `reqwest`-backed fragment fetcher

use crate::error::ApiError;
use async_trait::async_trait;
use pmnav_core::{FetchError, FragmentFetcher};
use reqwest::header::ACCEPT;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Check and normalize a base URL (no trailing slash)
pub(crate) fn parse_base_url(raw: &str) -> Result<String, ApiError> {
    let url = Url::parse(raw).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Client shared by fetcher and API client: cookie session, fixed timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .build()?)
}

/// Fetches view fragments over HTTP with the session cookie
#[derive(Debug, Clone)]
pub struct HttpFragmentFetcher {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpFragmentFetcher {
    /// Create fetcher with the default timeout
    ///
    /// # Errors
    /// `ApiError::InvalidBaseUrl` or a client build failure.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create fetcher with a custom per-request timeout
    ///
    /// # Errors
    /// `ApiError::InvalidBaseUrl` or a client build failure.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
            timeout,
        })
    }

    /// Reuse an existing client (sharing its cookie jar)
    ///
    /// # Errors
    /// `ApiError::InvalidBaseUrl`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, route: &str) -> String {
        if route.starts_with('/') {
            format!("{}{}", self.base_url, route)
        } else {
            format!("{}/{}", self.base_url, route)
        }
    }

    fn map_error(&self, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl FragmentFetcher for HttpFragmentFetcher {
    async fn fetch(&self, route: &str) -> Result<String, FetchError> {
        let url = self.url_for(route);
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("GET {} returned {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))
    }
}
