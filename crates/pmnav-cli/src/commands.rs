//! Subcommand implementations
//!
//! Each command returns its output as a string so `main` only prints.

use crate::store::JsonFileSessionStore;
use crate::terminal::{CapturingRenderer, TerminalSurface};
use anyhow::{bail, Context, Result};
use pmnav_core::{
    LoadOutcome, MemorySessionStore, Navigator, NavigatorConfig, SessionStore,
};
use pmnav_http::HttpFragmentFetcher;
use pmnav_model::{NavParams, ParamValue, ViewId};
use pmnav_routing::{view_label, RouteTable, ShortcutAction, ShortcutMap};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

/// Load config from `path`, or defaults when none is given
///
/// # Errors
/// Read, parse or validation failures.
pub fn load_config(path: Option<&Path>) -> Result<NavigatorConfig> {
    match path {
        Some(path) => NavigatorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(NavigatorConfig::default()),
    }
}

/// Route table honoring the configured default view
#[must_use]
pub fn route_table(config: &NavigatorConfig) -> RouteTable {
    let mut routes = RouteTable::default();
    routes.set_default_view(config.default_view.clone());
    routes
}

/// Parse `key=value`; the value is read as JSON when it is a string or number
///
/// # Errors
/// Missing `=` or empty key.
pub fn parse_param(raw: &str) -> Result<(String, ParamValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("parameter '{raw}' is not key=value");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("parameter '{raw}' has an empty key");
    }
    Ok((key.to_string(), ParamValue::from_json(value)))
}

/// `pmnav resolve`
///
/// # Errors
/// Unparseable locations.
pub fn resolve(routes: &RouteTable, location: &str) -> Result<String> {
    let resolved = routes.resolve_location(location)?;
    let params = serde_json::to_string(&resolved.params)?;

    let mut out = String::new();
    writeln!(out, "view:    {}", resolved.view)?;
    writeln!(out, "label:   {}", view_label(&resolved.view))?;
    writeln!(out, "params:  {params}")?;
    write!(
        out,
        "matched: {}",
        if resolved.matched { "yes" } else { "no (default view)" }
    )?;
    Ok(out)
}

/// `pmnav url`
///
/// # Errors
/// Invalid parameters or a path parameter missing.
pub fn url(routes: &RouteTable, view: &str, params: &[String]) -> Result<String> {
    let params = params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<Result<NavParams>>()?;
    Ok(routes.build_url(&ViewId::parse(view), &params)?)
}

/// `pmnav shortcuts`
#[must_use]
pub fn shortcuts(map: &ShortcutMap) -> String {
    map.bindings()
        .into_iter()
        .map(|(chord, action)| {
            let target = match action {
                ShortcutAction::Navigate(view) => view_label(view),
                ShortcutAction::ToggleQuickNav => "Quick navigation".to_string(),
                ShortcutAction::CloseOverlay => "Close overlay".to_string(),
            };
            format!("{:<14} {}", chord.as_str(), target)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Options for `pmnav open`
#[derive(Debug, Clone)]
pub struct OpenOptions<'a> {
    pub base_url: &'a str,
    pub location: &'a str,
    pub session: Option<&'a Path>,
}

/// Result of `pmnav open`
#[derive(Debug, Clone)]
pub struct OpenReport {
    pub outcome: LoadOutcome,
    pub content: Option<String>,
}

impl OpenReport {
    /// Process exit code: 0 when the view loaded
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.outcome.is_loaded())
    }
}

/// `pmnav open`: run the navigator against a live server
///
/// # Errors
/// Invalid base URL or location.
pub async fn open(config: NavigatorConfig, options: OpenOptions<'_>) -> Result<OpenReport> {
    let fetcher = HttpFragmentFetcher::with_timeout(options.base_url, config.request_timeout())?;
    let store: Arc<dyn SessionStore> = match options.session {
        Some(path) => Arc::new(JsonFileSessionStore::new(path)),
        None => Arc::new(MemorySessionStore::new()),
    };
    let renderer = Arc::new(CapturingRenderer::new());

    let navigator = Navigator::new(
        config,
        Arc::new(fetcher),
        store,
        Arc::clone(&renderer) as Arc<dyn pmnav_core::ViewRenderer>,
        Arc::new(TerminalSurface),
    );

    let outcome = navigator.start(options.location).await?;
    if let Err(e) = navigator.save_context() {
        tracing::warn!("Could not save navigation context: {}", e);
    }

    Ok(OpenReport {
        outcome,
        content: renderer.content(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn param_values_typed() {
        let (key, value) = parse_param("id=42").unwrap();
        assert_eq!(key, "id");
        assert_eq!(value.as_i64(), Some(42));

        let (_, text) = parse_param("status=Active").unwrap();
        assert_eq!(text.as_text(), Some("Active"));

        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn url_round_trips_through_resolve() {
        let routes = RouteTable::default();
        let built = url(&routes, "projects", &["status=Active".to_string()]).unwrap();
        assert_eq!(built, "/projects?status=%22Active%22");

        let report = resolve(&routes, &built).unwrap();
        assert!(report.contains("view:    projects"));
        assert!(report.contains("params:  {\"status\":\"Active\"}"));
    }

    #[test]
    fn unmapped_location_reports_default() {
        let config = NavigatorConfig::default().with_default_view(ViewId::Projects);
        let report = resolve(&route_table(&config), "/foobar").unwrap();
        assert!(report.contains("view:    projects"));
        assert!(report.contains("matched: no"));
    }

    #[test]
    fn detail_url_needs_id() {
        let routes = RouteTable::default();
        assert!(url(&routes, "project-detail", &[]).is_err());
        assert_eq!(
            url(&routes, "project-detail", &["id=7".to_string()]).unwrap(),
            "/projects/7"
        );
    }

    #[test]
    fn shortcut_listing() {
        let listing = shortcuts(&ShortcutMap::with_defaults());
        assert!(listing.lines().any(|l| l.starts_with("ctrl+d") && l.ends_with("Dashboard")));
        assert!(listing.lines().any(|l| l.ends_with("Quick navigation")));
    }

    #[test]
    fn config_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, NavigatorConfig::default());
    }
}
