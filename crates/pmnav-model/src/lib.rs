//! PM Dashboard navigation model
//!
//! Plain data shared by routing, the navigator and its collaborators:
//! - [`ViewId`]: the closed set of logical pages (plus unknown ids)
//! - [`NavParams`]: ordered `string | number` parameters
//! - [`BreadcrumbTrail`]: bounded history of [`NavigationEntry`] values
//! - [`NavigationContext`] / [`ErrorState`]: persisted page state and the
//!   last unrecoverable load failure

#![warn(unreachable_pub)]

pub mod context;
pub mod entry;
pub mod params;
pub mod view;

pub use context::{ErrorState, FormSnapshots, NavigationContext, NAVIGATION_CONTEXT_KEY};
pub use entry::{BreadcrumbTrail, HistoryState, NavigationEntry, DEFAULT_BREADCRUMB_LIMIT};
pub use params::{NavParams, ParamValue};
pub use view::ViewId;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
