//! PM Dashboard routing
//!
//! The URL contract of the dashboard and the small pure helpers the
//! navigator needs around it:
//! - [`RouteTable`]: path ↔ view lookup, URL building, fragment routes
//! - [`page_title`] / [`view_label`]: human-readable names
//! - [`ShortcutMap`]: keyboard chord → action table
//! - [`render_placeholders`]: `{{token}}` substitution in fragments
//!
//! # Example
//!
//! ```rust
//! use pmnav_model::{NavParams, ViewId};
//! use pmnav_routing::RouteTable;
//!
//! let table = RouteTable::default();
//! let url = table
//!     .build_url(&ViewId::Projects, &NavParams::new().with("status", "Active"))
//!     .unwrap();
//! assert_eq!(url, "/projects?status=%22Active%22");
//!
//! let resolved = table.resolve_location(&url).unwrap();
//! assert_eq!(resolved.view, ViewId::Projects);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod location;
pub mod shortcuts;
pub mod table;
pub mod template;
pub mod title;

pub use error::RouteError;
pub use location::{decode_query, encode_query, Location};
pub use shortcuts::{Chord, KeyEvent, ShortcutAction, ShortcutMap};
pub use table::{ResolvedRoute, RouteSpec, RouteTable};
pub use template::{escape_html, render_placeholders, AmbientValues};
pub use title::{page_title, view_label};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
