//! `{{placeholder}}` substitution in fragment HTML

use once_cell::sync::Lazy;
use pmnav_model::{NavParams, ViewId};
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Page-wide values available to every fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientValues {
    /// Display name of the signed-in user
    pub current_user: Option<String>,
    /// View being rendered
    pub current_view: ViewId,
}

impl AmbientValues {
    #[must_use]
    pub fn new(current_view: ViewId, current_user: Option<String>) -> Self {
        Self {
            current_user,
            current_view,
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "current_user" | "user_name" | "currentUser" => self.current_user.clone(),
            "current_view" | "currentView" => Some(self.current_view.to_string()),
            _ => None,
        }
    }
}

/// Replace `{{name}}` tokens with parameter values, then ambient values
///
/// Substituted values are HTML-escaped. Unknown tokens are left in place so
/// collaborator scripts can fill them later.
#[must_use]
pub fn render_placeholders(html: &str, params: &NavParams, ambient: &AmbientValues) -> String {
    PLACEHOLDER
        .replace_all(html, |caps: &Captures<'_>| {
            let key = &caps[1];
            params
                .get(key)
                .map(ToString::to_string)
                .or_else(|| ambient.lookup(key))
                .map_or_else(|| caps[0].to_string(), |value| escape_html(&value))
        })
        .into_owned()
}

/// Minimal HTML text escaping
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient() -> AmbientValues {
        AmbientValues::new(ViewId::Projects, Some("Dana".to_string()))
    }

    #[test]
    fn params_and_ambient_are_substituted() {
        let params = NavParams::new().with("status", "Active").with("page", 2_i64);
        let html = "<h1>{{ current_view }}</h1><p>{{status}} p{{page}} for {{current_user}}</p>";
        assert_eq!(
            render_placeholders(html, &params, &ambient()),
            "<h1>projects</h1><p>Active p2 for Dana</p>"
        );
    }

    #[test]
    fn params_shadow_ambient_values() {
        let params = NavParams::new().with("current_user", "Override");
        assert_eq!(render_placeholders("{{current_user}}", &params, &ambient()), "Override");
    }

    #[test]
    fn unknown_tokens_are_kept() {
        let html = "<span>{{chart_total}}</span>";
        assert_eq!(render_placeholders(html, &NavParams::new(), &ambient()), html);
    }

    #[test]
    fn missing_user_leaves_token() {
        let ambient = AmbientValues::new(ViewId::Dashboard, None);
        assert_eq!(
            render_placeholders("{{current_user}}", &NavParams::new(), &ambient),
            "{{current_user}}"
        );
    }

    #[test]
    fn values_are_escaped() {
        let params = NavParams::new().with("q", "<b>&</b>");
        assert_eq!(
            render_placeholders("{{q}}", &params, &ambient()),
            "&lt;b&gt;&amp;&lt;/b&gt;"
        );
    }
}
