//! Breadcrumb trail and history entries

use crate::params::NavParams;
use crate::view::ViewId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of breadcrumb entries kept by default
pub const DEFAULT_BREADCRUMB_LIMIT: usize = 10;

/// One visited view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// View that was requested
    pub view: ViewId,
    /// Parameters it was requested with
    pub params: NavParams,
    /// When the navigation happened
    pub timestamp: DateTime<Utc>,
    /// Human-readable title at the time of the visit
    pub title: String,
}

impl NavigationEntry {
    /// Create entry stamped with the current time
    #[inline]
    #[must_use]
    pub fn new(view: ViewId, params: NavParams, title: impl Into<String>) -> Self {
        Self {
            view,
            params,
            timestamp: Utc::now(),
            title: title.into(),
        }
    }
}

/// State object pushed with every browser history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    /// View to replay on back/forward
    pub view: ViewId,
    /// Parameters to replay with
    #[serde(default)]
    pub params: NavParams,
}

impl HistoryState {
    #[inline]
    #[must_use]
    pub fn new(view: ViewId, params: NavParams) -> Self {
        Self { view, params }
    }
}

/// Bounded, insertion-ordered trail of visited views
///
/// The oldest entry is evicted first once the limit is reached, so the trail
/// always holds the most recent `limit` navigations in call order.
#[derive(Debug, Clone)]
pub struct BreadcrumbTrail {
    entries: VecDeque<NavigationEntry>,
    limit: usize,
}

impl BreadcrumbTrail {
    /// Create trail with the default limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_BREADCRUMB_LIMIT)
    }

    /// Create trail with a custom limit (at least one entry is always kept)
    #[inline]
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Append an entry, evicting from the front past the limit
    pub fn push(&mut self, entry: NavigationEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Most recent entry
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&NavigationEntry> {
        self.entries.back()
    }

    /// Entry by position, oldest first
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NavigationEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry> {
        self.entries.iter()
    }

    /// Copy of the entries, oldest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<NavigationEntry> {
        self.entries.iter().cloned().collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for BreadcrumbTrail {
    fn default() -> Self {
        Self::new()
    }
}
