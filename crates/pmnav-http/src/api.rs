//! JSON API client
//!
//! State-changing calls carry the session's CSRF token twice: in the
//! `X-CSRF-Token` header and as a `csrf_token` field merged into the JSON
//! body. The token is fetched once from `/csrf-token` and cached for the
//! lifetime of the client.

use crate::error::ApiError;
use crate::fetcher::{build_client, parse_base_url, DEFAULT_TIMEOUT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

/// Path prefix of every API route
pub const API_PREFIX: &str = "/api/v1";

/// Token endpoint, relative to the site root
pub const CSRF_PATH: &str = "/csrf-token";

/// Header carrying the token
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Body field carrying the token
pub const CSRF_FIELD: &str = "csrf_token";

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    csrf_token: Option<String>,
}

/// Client for the dashboard's `/api/v1` routes
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    csrf: OnceCell<String>,
}

impl ApiClient {
    /// Create client with the default timeout
    ///
    /// # Errors
    /// `ApiError::InvalidBaseUrl` or a client build failure.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_client(DEFAULT_TIMEOUT)?,
            base_url: parse_base_url(base_url)?,
            csrf: OnceCell::new(),
        })
    }

    /// Reuse an existing client (sharing its cookie jar)
    ///
    /// # Errors
    /// `ApiError::InvalidBaseUrl`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            csrf: OnceCell::new(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path.trim_start_matches('/'))
    }

    /// Session CSRF token, fetched on first use
    ///
    /// # Errors
    /// Transport and status errors from `/csrf-token`, or
    /// `ApiError::MissingCsrfToken`.
    pub async fn csrf_token(&self) -> Result<&str, ApiError> {
        let token = self
            .csrf
            .get_or_try_init(|| async {
                let url = format!("{}{}", self.base_url, CSRF_PATH);
                tracing::debug!("Fetching CSRF token");
                let resp = self.http.get(&url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(ApiError::Status {
                        method: "GET".to_string(),
                        path: CSRF_PATH.to_string(),
                        status: status.as_u16(),
                    });
                }
                let body: CsrfResponse = resp.json().await.map_err(|e| ApiError::Decode {
                    path: CSRF_PATH.to_string(),
                    reason: e.to_string(),
                })?;
                body.csrf_token
                    .filter(|t| !t.is_empty())
                    .ok_or(ApiError::MissingCsrfToken)
            })
            .await?;
        Ok(token.as_str())
    }

    /// GET and decode JSON
    ///
    /// # Errors
    /// Transport, status and decode errors.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None).await
    }

    /// GET and decode JSON, falling back on any failure
    ///
    /// For dashboards that assemble several independent fetches: one
    /// failing source shows its fallback instead of blanking the page.
    pub async fn get_json_or<T: DeserializeOwned>(&self, path: &str, fallback: T) -> T {
        match self.get_json(path).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Using fallback for {}: {}", path, e);
                fallback
            }
        }
    }

    /// POST JSON with the CSRF token
    ///
    /// # Errors
    /// Token, transport, status and decode errors.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    /// PUT JSON with the CSRF token
    ///
    /// # Errors
    /// Token, transport, status and decode errors.
    pub async fn put_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// DELETE with the CSRF token
    ///
    /// # Errors
    /// Token, transport and status errors.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let _: Value = self.send(Method::DELETE, path, None).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = self.api_url(path);
        let mut request = self.http.request(method.clone(), &url);

        if method != Method::GET {
            let token = self.csrf_token().await?.to_string();
            request = request.header(CSRF_HEADER, token.as_str());
            if let Some(body) = body {
                request = request.json(&with_csrf_field(body, &token));
            }
        } else if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!("{} {}", method, url);
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("{} {} returned {}", method, path, status);
            return Err(ApiError::Status {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        let raw: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(raw).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Merge the token into an object body; other bodies are sent unchanged
fn with_csrf_field(body: Value, token: &str) -> Value {
    match body {
        Value::Object(mut map) => {
            map.insert(CSRF_FIELD.to_string(), Value::String(token.to_string()));
            Value::Object(map)
        }
        other => other,
    }
}
