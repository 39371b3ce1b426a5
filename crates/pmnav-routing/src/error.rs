//! Error types for routing

use pmnav_model::ViewId;

/// Routing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Path template needs a parameter the navigation did not carry
    #[error("view '{view}' requires parameter '{param}'")]
    MissingParam {
        /// View being routed
        view: ViewId,
        /// Name of the missing template parameter
        param: String,
    },

    /// Location could not be parsed as a URL or path
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// Shortcut chord could not be parsed
    #[error("invalid chord: {0}")]
    InvalidChord(String),
}
