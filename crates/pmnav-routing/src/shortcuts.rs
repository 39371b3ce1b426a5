//! Keyboard shortcuts
//!
//! Pressed keys are normalized into a canonical chord string
//! (`ctrl+alt+shift+meta+key`, modifiers in that order, key lowercased) and
//! looked up in a [`ShortcutMap`]. A chord maps to exactly one action.

use crate::error::RouteError;
use pmnav_model::ViewId;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A key press as reported by the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key name (`"d"`, `"Escape"`, `","`)
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// Key without modifiers
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Key with Ctrl held
    #[must_use]
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// Canonical chord string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chord(String);

impl Chord {
    /// Normalize a key event; `None` for a bare modifier press
    #[must_use]
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let key = normalize_key(&event.key)?;
        Some(Self::compose(event.ctrl, event.alt, event.shift, event.meta, &key))
    }

    /// Parse a written chord such as `"Ctrl+Shift+R"`
    ///
    /// # Errors
    /// `RouteError::InvalidChord` if there is not exactly one non-modifier key.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let (mut ctrl, mut alt, mut shift, mut meta) = (false, false, false, false);
        let mut key = None;

        for part in split_chord(raw) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "alt" | "option" => alt = true,
                "shift" => shift = true,
                "meta" | "cmd" | "command" | "super" => meta = true,
                other => {
                    if key.is_some() {
                        return Err(RouteError::InvalidChord(raw.to_string()));
                    }
                    key = normalize_key(other);
                }
            }
        }

        let key = key.ok_or_else(|| RouteError::InvalidChord(raw.to_string()))?;
        Ok(Self::compose(ctrl, alt, shift, meta, &key))
    }

    fn compose(ctrl: bool, alt: bool, shift: bool, meta: bool, key: &str) -> Self {
        let mut parts = Vec::with_capacity(5);
        if ctrl {
            parts.push("ctrl");
        }
        if alt {
            parts.push("alt");
        }
        if shift {
            parts.push("shift");
        }
        if meta {
            parts.push("meta");
        }
        parts.push(key);
        Self(parts.join("+"))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Chord {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split on `+`, keeping a trailing `+` as the key itself (`ctrl++`)
fn split_chord(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if let Some(head) = trimmed.strip_suffix("++") {
        let mut parts: Vec<String> = head.split('+').map(|p| p.trim().to_string()).collect();
        parts.push("+".to_string());
        return parts.into_iter().filter(|p| !p.is_empty()).collect();
    }
    trimmed
        .split('+')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn normalize_key(key: &str) -> Option<String> {
    let lower = key.to_lowercase();
    let name = match lower.as_str() {
        "" => return None,
        "control" | "shift" | "alt" | "meta" | "os" => return None,
        " " | "spacebar" => "space",
        "esc" => "escape",
        "del" => "delete",
        other => other,
    };
    Some(name.to_string())
}

/// What a chord does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Navigate to a view
    Navigate(ViewId),
    /// Open or close the quick-navigation overlay
    ToggleQuickNav,
    /// Close whatever overlay is open
    CloseOverlay,
}

/// Chord → action table
#[derive(Debug, Clone, Default)]
pub struct ShortcutMap {
    bindings: HashMap<Chord, ShortcutAction>,
}

impl ShortcutMap {
    /// Create empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The dashboard's default bindings
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        let table: [(&str, ShortcutAction); 12] = [
            ("ctrl+d", ShortcutAction::Navigate(ViewId::Dashboard)),
            ("ctrl+p", ShortcutAction::Navigate(ViewId::Projects)),
            ("ctrl+u", ShortcutAction::Navigate(ViewId::Resources)),
            ("ctrl+shift+r", ShortcutAction::Navigate(ViewId::Risks)),
            ("ctrl+g", ShortcutAction::Navigate(ViewId::Gantt)),
            ("ctrl+shift+e", ShortcutAction::Navigate(ViewId::Reports)),
            ("ctrl+,", ShortcutAction::Navigate(ViewId::Settings)),
            ("ctrl+b", ShortcutAction::Navigate(ViewId::Backlog)),
            ("ctrl+shift+a", ShortcutAction::Navigate(ViewId::AiChat)),
            ("ctrl+k", ShortcutAction::ToggleQuickNav),
            ("ctrl+/", ShortcutAction::ToggleQuickNav),
            ("escape", ShortcutAction::CloseOverlay),
        ];
        for (chord, action) in table {
            if let Ok(chord) = Chord::parse(chord) {
                map.bind(chord, action);
            }
        }
        map
    }

    /// Bind a chord, returning the action it replaced
    pub fn bind(&mut self, chord: Chord, action: ShortcutAction) -> Option<ShortcutAction> {
        self.bindings.insert(chord, action)
    }

    /// Remove a binding
    pub fn unbind(&mut self, chord: &Chord) -> Option<ShortcutAction> {
        self.bindings.remove(chord)
    }

    /// Action for a key event, if any
    #[must_use]
    pub fn lookup(&self, event: &KeyEvent) -> Option<&ShortcutAction> {
        Chord::from_event(event).and_then(|chord| self.bindings.get(&chord))
    }

    /// First chord (in canonical order) that navigates to `view`
    #[must_use]
    pub fn chord_for(&self, view: &ViewId) -> Option<&Chord> {
        self.bindings
            .iter()
            .filter(|(_, action)| matches!(action, ShortcutAction::Navigate(v) if v == view))
            .map(|(chord, _)| chord)
            .min()
    }

    /// All bindings sorted by chord
    #[must_use]
    pub fn bindings(&self) -> Vec<(&Chord, &ShortcutAction)> {
        let mut all: Vec<_> = self.bindings.iter().collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
