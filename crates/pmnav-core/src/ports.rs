//! Capabilities the navigator needs from its host page
//!
//! The navigator never touches a browser directly. Everything it does to
//! the page goes through these traits, so the same state machine runs
//! against a real page, a terminal or a test recorder.

use crate::error::{FetchError, StoreError};
use crate::overlay::QuickNavItem;
use async_trait::async_trait;
use parking_lot::Mutex;
use pmnav_model::{FormSnapshots, HistoryState, NavParams, NavigationEntry};
use std::collections::HashMap;

/// HTTP GET of a view fragment
#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    /// Fetch the HTML served at `route`
    async fn fetch(&self, route: &str) -> Result<String, FetchError>;
}

/// Session-scoped key-value storage
pub trait SessionStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Main content container
pub trait ViewRenderer: Send + Sync {
    /// Replace the container content with `fragment_html`
    fn render(&self, fragment_html: &str, params: &NavParams);
}

/// Page chrome around the content container
pub trait PageSurface: Send + Sync {
    /// Set the document title
    fn set_title(&self, title: &str);

    /// Push a browser history entry
    fn push_history(&self, state: &HistoryState, url: &str);

    /// Redraw the breadcrumb bar, oldest entry first
    fn render_breadcrumbs(&self, trail: &[NavigationEntry]);

    /// Current vertical scroll offset
    fn scroll_position(&self) -> f64;

    /// Scroll the page
    fn scroll_to(&self, x: f64, y: f64);

    /// Values of every form currently on the page
    fn form_snapshots(&self) -> FormSnapshots;

    /// Set a field by form key and field name; false if no such field exists
    fn fill_form_field(&self, form: &str, field: &str, value: &str) -> bool;

    /// Show the quick-navigation overlay
    fn show_quick_nav(&self, items: &[QuickNavItem]);

    /// Hide the quick-navigation overlay
    fn hide_quick_nav(&self);

    /// Full page reload
    fn reload(&self);
}

/// In-process [`SessionStore`]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
