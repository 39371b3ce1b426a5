//! PM Dashboard view navigator
//!
//! Turns `(view, params)` into:
//! - an updated history entry and URL
//! - an updated breadcrumb trail and document title
//! - a freshly loaded HTML fragment, retried on transient failures
//! - saved and restored scroll and form context
//!
//! # Example
//!
//! ```rust,ignore
//! use pmnav_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     fetcher: Arc<dyn FragmentFetcher>,
//! #     renderer: Arc<dyn ViewRenderer>,
//! #     surface: Arc<dyn PageSurface>,
//! # ) -> Result<(), NavError> {
//! let navigator = Navigator::new(
//!     NavigatorConfig::default(),
//!     fetcher,
//!     Arc::new(MemorySessionStore::new()),
//!     renderer,
//!     surface,
//! );
//!
//! let outcome = navigator.start("/projects?status=%22Active%22").await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod initializers;
pub mod navigator;
pub mod overlay;
pub mod panels;
pub mod phase;
pub mod ports;
pub mod retry;

pub use config::NavigatorConfig;
pub use error::{ConfigError, FetchError, InitError, NavError, StoreError};
pub use initializers::{FnInitializer, InitializerRegistry, ViewInitializer};
pub use navigator::{KeyOutcome, LoadOutcome, Navigator};
pub use overlay::{quick_nav_items, QuickNavItem};
pub use panels::{loading_placeholder, ErrorPanel, RecoveryAction};
pub use phase::{allowed_transitions, validate_transition, LoadPhase, PhaseError};
pub use ports::{FragmentFetcher, MemorySessionStore, PageSurface, SessionStore, ViewRenderer};
pub use retry::{with_retry, Backoff, RetryFailure, RetryPolicy, Retryable};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for embedding the navigator
    pub use crate::{
        FragmentFetcher, InitializerRegistry, KeyOutcome, LoadOutcome, LoadPhase,
        MemorySessionStore, NavError, Navigator, NavigatorConfig, PageSurface, RecoveryAction,
        SessionStore, ViewRenderer,
    };
    pub use pmnav_model::{NavParams, ViewId};
    pub use pmnav_routing::KeyEvent;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
