//! Terminal stand-ins for the page
//!
//! Page chrome (title, breadcrumbs, overlay) is reported through tracing on
//! stderr; the content container keeps the last HTML so the caller can
//! print it once navigation settles.

use parking_lot::Mutex;
use pmnav_core::{PageSurface, QuickNavItem, ViewRenderer};
use pmnav_model::{FormSnapshots, HistoryState, NavParams, NavigationEntry};

/// Content container that keeps what it was last given
#[derive(Debug, Default)]
pub struct CapturingRenderer {
    last: Mutex<Option<String>>,
}

impl CapturingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last HTML rendered
    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.last.lock().clone()
    }
}

impl ViewRenderer for CapturingRenderer {
    fn render(&self, fragment_html: &str, _params: &NavParams) {
        *self.last.lock() = Some(fragment_html.to_string());
    }
}

/// Page surface without a page: no scroll, no forms
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl PageSurface for TerminalSurface {
    fn set_title(&self, title: &str) {
        tracing::info!("Title: {}", title);
    }

    fn push_history(&self, _state: &HistoryState, url: &str) {
        tracing::debug!("History: {}", url);
    }

    fn render_breadcrumbs(&self, trail: &[NavigationEntry]) {
        let crumbs: Vec<&str> = trail.iter().map(|e| e.title.as_str()).collect();
        tracing::info!("Breadcrumbs: {}", crumbs.join(" › "));
    }

    fn scroll_position(&self) -> f64 {
        0.0
    }

    fn scroll_to(&self, _x: f64, y: f64) {
        tracing::debug!("Scroll to {}", y);
    }

    fn form_snapshots(&self) -> FormSnapshots {
        FormSnapshots::new()
    }

    fn fill_form_field(&self, _form: &str, _field: &str, _value: &str) -> bool {
        false
    }

    fn show_quick_nav(&self, items: &[QuickNavItem]) {
        for item in items {
            tracing::info!("  {} ({})", item.label, item.view);
        }
    }

    fn hide_quick_nav(&self) {}

    fn reload(&self) {
        tracing::info!("Reload requested");
    }
}
