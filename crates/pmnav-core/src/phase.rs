//! Load phase state machine
//!
//! ```text
//! Idle ──▶ Loading ──▶ Idle             (fragment rendered)
//!            │  ▲
//!            └──┘                       (transient failure, retry)
//!            └────▶ ErrorDisplayed ──▶ Loading   (user retry / new navigation)
//! ```

use std::fmt;

/// Where the current navigation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadPhase {
    /// Nothing in flight
    #[default]
    Idle,
    /// Fetching a fragment (including backoff waits)
    Loading,
    /// Retries exhausted, error panel shown
    ErrorDisplayed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Loading => "loading",
            LoadPhase::ErrorDisplayed => "error-displayed",
        };
        f.write_str(name)
    }
}

/// Illegal phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal load phase transition: {from} -> {to}")]
pub struct PhaseError {
    /// Phase before
    pub from: LoadPhase,
    /// Requested phase
    pub to: LoadPhase,
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: LoadPhase) -> Vec<LoadPhase> {
    use LoadPhase::{ErrorDisplayed, Idle, Loading};
    match from {
        Idle => vec![Loading],
        Loading => vec![Loading, Idle, ErrorDisplayed],
        ErrorDisplayed => vec![Loading],
    }
}

/// Validate a phase change
///
/// # Errors
/// `PhaseError` if `to` is not reachable from `from`.
pub fn validate_transition(from: LoadPhase, to: LoadPhase) -> Result<(), PhaseError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PhaseError { from, to })
    }
}
