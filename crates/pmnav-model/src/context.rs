//! Persisted page context and load failures
//!
//! [`NavigationContext`] is what survives a navigation inside the session:
//! the view being left, its scroll offset and the values typed into its
//! forms. [`ErrorState`] records the most recent unrecoverable fragment load.

use crate::params::NavParams;
use crate::view::ViewId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Session storage key holding the serialized [`NavigationContext`]
pub const NAVIGATION_CONTEXT_KEY: &str = "navigation-context";

/// Form field values keyed by form, then by field name
pub type FormSnapshots = BTreeMap<String, BTreeMap<String, String>>;

/// Scroll and form state of the view being left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContext {
    /// View the context belongs to
    #[serde(rename = "view")]
    pub current_view: ViewId,
    /// Parameters the view was showing
    #[serde(default)]
    pub params: NavParams,
    /// When the context was captured
    pub timestamp: DateTime<Utc>,
    /// Vertical scroll offset in pixels
    #[serde(default)]
    pub scroll_position: f64,
    /// Serialized form fields
    #[serde(rename = "formData", default)]
    pub form_snapshots: FormSnapshots,
}

impl NavigationContext {
    /// Capture context for a view now
    #[must_use]
    pub fn capture(
        current_view: ViewId,
        params: NavParams,
        scroll_position: f64,
        form_snapshots: FormSnapshots,
    ) -> Self {
        Self {
            current_view,
            params,
            timestamp: Utc::now(),
            scroll_position,
            form_snapshots,
        }
    }

    /// Number of field values across all forms
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.form_snapshots.values().map(BTreeMap::len).sum()
    }
}

/// Most recent fragment load that failed after exhausting retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    /// View whose load failed
    pub view: ViewId,
    /// Error message shown to the user
    pub error: String,
    /// Transient failures absorbed before giving up
    pub retry_count: u32,
    /// When the failure was recorded
    pub timestamp: DateTime<Utc>,
}

impl ErrorState {
    #[must_use]
    pub fn new(view: ViewId, error: impl Into<String>, retry_count: u32) -> Self {
        Self {
            view,
            error: error.into(),
            retry_count,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_uses_page_field_names() {
        let mut forms = FormSnapshots::new();
        forms
            .entry("filters".to_string())
            .or_default()
            .insert("status".to_string(), "Active".to_string());

        let ctx = NavigationContext::capture(
            ViewId::Projects,
            NavParams::new().with("page", 2_i64),
            450.0,
            forms,
        );
        let value = serde_json::to_value(&ctx).unwrap();

        assert_eq!(value["view"], "projects");
        assert_eq!(value["scrollPosition"], 450.0);
        assert_eq!(value["formData"]["filters"]["status"], "Active");
        assert_eq!(value["params"]["page"], 2);
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn context_round_trips() {
        let ctx = NavigationContext::capture(ViewId::Risks, NavParams::new(), 12.5, FormSnapshots::new());
        let json = serde_json::to_string(&ctx).unwrap();
        let back: NavigationContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
        assert_eq!(back.field_count(), 0);
    }

    #[test]
    fn error_state_records_retry_count() {
        let state = ErrorState::new(ViewId::Gantt, "HTTP 503", 3);
        assert_eq!(state.retry_count, 3);
        assert_eq!(state.view, ViewId::Gantt);
    }
}
