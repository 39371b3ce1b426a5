//! HTTP adapters for the dashboard navigator
//!
//! - [`HttpFragmentFetcher`]: the navigator's [`pmnav_core::FragmentFetcher`]
//!   over `reqwest`, sending the session cookie and mapping transport
//!   failures onto [`pmnav_core::FetchError`]
//! - [`ApiClient`]: JSON calls under `/api/v1` with the CSRF token attached
//!   to state-changing requests

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod error;
pub mod fetcher;

pub use api::{ApiClient, API_PREFIX, CSRF_FIELD, CSRF_HEADER, CSRF_PATH};
pub use error::ApiError;
pub use fetcher::{HttpFragmentFetcher, DEFAULT_TIMEOUT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
