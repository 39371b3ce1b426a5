//! Loading placeholder and error panel markup

use pmnav_model::ErrorState;
use pmnav_routing::escape_html;
use std::fmt::Write as _;

/// Placeholder shown while a fragment is in flight
#[must_use]
pub fn loading_placeholder(label: &str) -> String {
    format!(
        "<div class=\"view-loading\" role=\"status\" aria-busy=\"true\">\
         <div class=\"spinner\"></div><p>Loading {}…</p></div>",
        escape_html(label)
    )
}

/// User-initiated way out of an error panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAction {
    /// Load the same view again with a fresh retry budget
    Retry,
    /// Reload the whole page
    ReloadPage,
    /// Navigate to the default view
    GoToDefault,
}

impl RecoveryAction {
    /// Value of the button's `data-action` attribute
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryAction::Retry => "retry",
            RecoveryAction::ReloadPage => "reload",
            RecoveryAction::GoToDefault => "home",
        }
    }

    /// Parse a `data-action` value
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "retry" => Some(RecoveryAction::Retry),
            "reload" => Some(RecoveryAction::ReloadPage),
            "home" => Some(RecoveryAction::GoToDefault),
            _ => None,
        }
    }
}

/// Inline error panel for a failed fragment load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    /// Label of the view that failed
    pub view_label: String,
    /// Error message
    pub message: String,
    /// Transient failures absorbed
    pub retry_count: u32,
    /// Retry budget
    pub max_attempts: u32,
    /// Label of the default view
    pub default_label: String,
}

impl ErrorPanel {
    /// Build panel for an error state
    #[must_use]
    pub fn new(
        state: &ErrorState,
        view_label: impl Into<String>,
        max_attempts: u32,
        default_label: impl Into<String>,
    ) -> Self {
        Self {
            view_label: view_label.into(),
            message: state.error.clone(),
            retry_count: state.retry_count,
            max_attempts,
            default_label: default_label.into(),
        }
    }

    /// Buttons in display order with their labels
    #[must_use]
    pub fn actions(&self) -> Vec<(RecoveryAction, String)> {
        vec![
            (
                RecoveryAction::Retry,
                format!("Retry ({}/{})", self.retry_count, self.max_attempts),
            ),
            (RecoveryAction::ReloadPage, "Reload page".to_string()),
            (
                RecoveryAction::GoToDefault,
                format!("Go to {}", self.default_label),
            ),
        ]
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"view-error\" role=\"alert\">");
        let _ = write!(
            html,
            "<h3>Could not load {}</h3><p class=\"error-message\">{}</p><div class=\"error-actions\">",
            escape_html(&self.view_label),
            escape_html(&self.message)
        );
        for (action, label) in self.actions() {
            let _ = write!(
                html,
                "<button type=\"button\" data-action=\"{}\">{}</button>",
                action.as_str(),
                escape_html(&label)
            );
        }
        html.push_str("</div></div>");
        html
    }
}
