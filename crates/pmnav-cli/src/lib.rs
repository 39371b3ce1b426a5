//! `pmnav` command-line front end
//!
//! Inspects the dashboard's URL contract (`resolve`, `url`, `shortcuts`)
//! and drives the navigator against a running server (`open`).

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod store;
pub mod terminal;

pub use commands::{OpenOptions, OpenReport};
pub use store::JsonFileSessionStore;
pub use terminal::{CapturingRenderer, TerminalSurface};

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber; `RUST_LOG` overrides `default_level`
pub fn init_tracing(default_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        eprintln!("tracing already initialized: {e}");
    }
}
