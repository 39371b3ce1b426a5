//! Quick-navigation overlay entries

use pmnav_model::ViewId;
use pmnav_routing::{view_label, Chord, RouteTable, ShortcutMap};

/// One row of the quick-navigation overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickNavItem {
    /// Target view
    pub view: ViewId,
    /// Menu label
    pub label: String,
    /// Shortcut that reaches the view directly, if any
    pub chord: Option<Chord>,
}

/// Entries for every known view that can be opened without parameters
///
/// Views whose path template needs parameters (`/projects/{id}`) are left
/// out: the overlay has nothing to fill them with.
#[must_use]
pub fn quick_nav_items(routes: &RouteTable, shortcuts: &ShortcutMap) -> Vec<QuickNavItem> {
    ViewId::known()
        .into_iter()
        .filter(|view| {
            routes
                .route(view)
                .is_some_and(|route| !route.path.contains('{'))
        })
        .map(|view| QuickNavItem {
            label: view_label(&view),
            chord: shortcuts.chord_for(&view).cloned(),
            view,
        })
        .collect()
}
