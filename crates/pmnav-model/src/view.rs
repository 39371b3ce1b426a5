//! Logical page identifiers
//!
//! The dashboard knows a closed set of views at compile time. Anything else
//! arriving from a URL, a history state or a stored context is kept verbatim
//! in [`ViewId::Other`] so it can still be labelled and routed.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identifier of a logical dashboard page
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ViewId {
    /// Portfolio overview with health metrics
    #[default]
    Dashboard,
    /// Project list
    Projects,
    /// Single project page
    ProjectDetail,
    /// Resource allocation
    Resources,
    /// Risk register
    Risks,
    /// Work-plan timeline
    Gantt,
    /// Reports
    Reports,
    /// User and workspace settings
    Settings,
    /// Backlog items
    Backlog,
    /// AI assistant console
    AiChat,
    /// Unrecognized id, kept as received
    Other(String),
}

impl ViewId {
    /// All views known at compile time, in menu order
    #[must_use]
    pub fn known() -> [ViewId; 10] {
        [
            ViewId::Dashboard,
            ViewId::Projects,
            ViewId::ProjectDetail,
            ViewId::Resources,
            ViewId::Risks,
            ViewId::Gantt,
            ViewId::Reports,
            ViewId::Settings,
            ViewId::Backlog,
            ViewId::AiChat,
        ]
    }

    /// Parse a raw id. Never fails: unknown ids become [`ViewId::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "dashboard" => ViewId::Dashboard,
            "projects" => ViewId::Projects,
            "project-detail" => ViewId::ProjectDetail,
            "resources" => ViewId::Resources,
            "risks" => ViewId::Risks,
            "gantt" => ViewId::Gantt,
            "reports" => ViewId::Reports,
            "settings" => ViewId::Settings,
            "backlog" => ViewId::Backlog,
            "ai-chat" => ViewId::AiChat,
            other => ViewId::Other(other.to_string()),
        }
    }

    /// Kebab-case id as used in URLs and persisted state
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ViewId::Dashboard => "dashboard",
            ViewId::Projects => "projects",
            ViewId::ProjectDetail => "project-detail",
            ViewId::Resources => "resources",
            ViewId::Risks => "risks",
            ViewId::Gantt => "gantt",
            ViewId::Reports => "reports",
            ViewId::Settings => "settings",
            ViewId::Backlog => "backlog",
            ViewId::AiChat => "ai-chat",
            ViewId::Other(raw) => raw,
        }
    }

    /// Whether this id belongs to the closed set
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, ViewId::Other(_))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ViewId {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for ViewId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ViewId> for String {
    fn from(view: ViewId) -> Self {
        view.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_views_round_trip_through_their_ids() {
        for view in ViewId::known() {
            assert_eq!(ViewId::parse(view.as_str()), view);
            assert!(view.is_known());
        }
    }

    #[test]
    fn unknown_id_is_kept_verbatim() {
        let view = ViewId::parse("capacity-planner");
        assert_eq!(view, ViewId::Other("capacity-planner".to_string()));
        assert_eq!(view.to_string(), "capacity-planner");
        assert!(!view.is_known());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ViewId::ProjectDetail).unwrap();
        assert_eq!(json, "\"project-detail\"");

        let back: ViewId = serde_json::from_str("\"risks\"").unwrap();
        assert_eq!(back, ViewId::Risks);
    }
}
