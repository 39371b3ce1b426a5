//! Route table: the fixed mapping between URLs, views and fragment routes
//!
//! Every known view has one canonical path template. Templates may carry
//! `{name}` segments that are filled from (and parsed back into) navigation
//! parameters; the remaining parameters go into the query string.

use crate::error::RouteError;
use crate::location::{encode_query, encode_segment, Location};
use pmnav_model::{NavParams, ParamValue, ViewId};

/// One route: the page path and the backend route serving its fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// View served by this route
    pub view: ViewId,
    /// Page path template, e.g. `/projects/{id}`
    pub path: String,
    /// Backend fragment route template
    pub fragment: String,
}

impl RouteSpec {
    /// Route whose fragment is served from the page path itself
    #[must_use]
    pub fn new(view: ViewId, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            view,
            fragment: path.clone(),
            path,
        }
    }

    /// Override the backend fragment route
    #[must_use]
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }
}

/// Result of resolving a location against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// View the location maps to
    pub view: ViewId,
    /// Path captures followed by query parameters
    pub params: NavParams,
    /// False when the path was unmapped and the default view was used
    pub matched: bool,
}

/// Fixed path ↔ view lookup table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
    aliases: Vec<(String, ViewId)>,
    default_view: ViewId,
}

impl RouteTable {
    /// Create empty table falling back to `default_view`
    #[must_use]
    pub fn new(default_view: ViewId) -> Self {
        Self {
            routes: Vec::new(),
            aliases: Vec::new(),
            default_view,
        }
    }

    /// Register a route. A later route for the same view replaces the earlier one.
    pub fn register(&mut self, spec: RouteSpec) {
        self.routes.retain(|r| r.view != spec.view);
        self.routes.push(spec);
    }

    /// Map an additional exact path onto a view (`/` → dashboard)
    pub fn alias(&mut self, path: &str, view: ViewId) {
        let normalized = normalize(path);
        self.aliases.retain(|(p, _)| *p != normalized);
        self.aliases.push((normalized, view));
    }

    /// View used for unmapped paths and the "go home" action
    #[inline]
    #[must_use]
    pub fn default_view(&self) -> &ViewId {
        &self.default_view
    }

    /// Change the fallback view
    pub fn set_default_view(&mut self, view: ViewId) {
        self.default_view = view;
    }

    /// Route registered for a view
    #[must_use]
    pub fn route(&self, view: &ViewId) -> Option<&RouteSpec> {
        self.routes.iter().find(|r| &r.view == view)
    }

    /// All registered routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter()
    }

    /// Build the page URL for a navigation
    ///
    /// Template segments consume their parameters; every other parameter is
    /// appended as `key=<json>`. Views without a route use `/{raw-id}`.
    ///
    /// # Errors
    /// `RouteError::MissingParam` if a template segment has no parameter.
    pub fn build_url(&self, view: &ViewId, params: &NavParams) -> Result<String, RouteError> {
        let template = self
            .route(view)
            .map_or_else(|| format!("/{}", encode_segment(view.as_str())), |r| r.path.clone());
        let (path, rest) = fill_template(view, &template, params)?;
        if rest.is_empty() {
            Ok(path)
        } else {
            Ok(format!("{path}?{}", encode_query(rest.iter())))
        }
    }

    /// Backend route to GET for a view's fragment
    ///
    /// Unlike [`RouteTable::build_url`] the query string is left off: the
    /// fragment endpoints take their input from the path only.
    ///
    /// # Errors
    /// `RouteError::MissingParam` if a template segment has no parameter.
    pub fn fragment_route(&self, view: &ViewId, params: &NavParams) -> Result<String, RouteError> {
        let template = self
            .route(view)
            .map_or_else(|| format!("/{}", encode_segment(view.as_str())), |r| r.fragment.clone());
        fill_template(view, &template, params).map(|(path, _)| path)
    }

    /// Resolve a page location into a view and its parameters
    ///
    /// Unmapped paths resolve to the default view; their query parameters
    /// are still parsed.
    ///
    /// # Errors
    /// `RouteError::InvalidLocation` if the input is not a URL or path.
    pub fn resolve_location(&self, location: &str) -> Result<ResolvedRoute, RouteError> {
        let loc = Location::parse(location)?;
        let query = loc.query_params();
        let path = format!("/{}", loc.segments.join("/"));

        if let Some((_, view)) = self.aliases.iter().find(|(p, _)| *p == path) {
            return Ok(ResolvedRoute {
                view: view.clone(),
                params: query,
                matched: true,
            });
        }

        for route in &self.routes {
            if let Some(mut captures) = match_template(&route.path, &loc.segments) {
                for (key, value) in query.iter() {
                    if captures.get(key).is_none() {
                        captures.insert(key, value.clone());
                    }
                }
                return Ok(ResolvedRoute {
                    view: route.view.clone(),
                    params: captures,
                    matched: true,
                });
            }
        }

        Ok(ResolvedRoute {
            view: self.default_view.clone(),
            params: query,
            matched: false,
        })
    }
}

impl Default for RouteTable {
    /// The dashboard's route table
    fn default() -> Self {
        let mut table = Self::new(ViewId::Dashboard);
        table.register(RouteSpec::new(ViewId::Dashboard, "/dashboard"));
        table.register(RouteSpec::new(ViewId::Projects, "/projects"));
        table.register(RouteSpec::new(ViewId::ProjectDetail, "/projects/{id}"));
        table.register(RouteSpec::new(ViewId::Resources, "/resources"));
        table.register(RouteSpec::new(ViewId::Risks, "/risks"));
        table.register(RouteSpec::new(ViewId::Gantt, "/gantt"));
        table.register(RouteSpec::new(ViewId::Reports, "/reports"));
        table.register(RouteSpec::new(ViewId::Settings, "/settings"));
        table.register(RouteSpec::new(ViewId::Backlog, "/backlog"));
        table.register(RouteSpec::new(ViewId::AiChat, "/ai-chat"));
        table.alias("/", ViewId::Dashboard);
        table.alias("/work-plan", ViewId::Gantt);
        table
    }
}

fn normalize(path: &str) -> String {
    let trimmed: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", trimmed.join("/"))
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Fill `{name}` segments, returning the path and the unused parameters
fn fill_template(
    view: &ViewId,
    template: &str,
    params: &NavParams,
) -> Result<(String, NavParams), RouteError> {
    let mut rest = params.clone();
    let mut path = String::new();

    for segment in template.split('/').filter(|s| !s.is_empty()) {
        path.push('/');
        match placeholder(segment) {
            Some(name) => {
                let value = rest.remove(name).ok_or_else(|| RouteError::MissingParam {
                    view: view.clone(),
                    param: name.to_string(),
                })?;
                path.push_str(&encode_segment(&value.to_string()));
            }
            None => path.push_str(segment),
        }
    }

    if path.is_empty() {
        path.push('/');
    }
    Ok((path, rest))
}

/// Decode a captured path segment
///
/// Segments carry no JSON quoting, so a segment that reads as a JSON number
/// becomes a number and everything else is kept as text. A text parameter
/// made only of digits therefore comes back as a number.
fn segment_value(segment: &str) -> ParamValue {
    segment
        .parse::<serde_json::Number>()
        .map_or_else(|_| ParamValue::Text(segment.to_string()), ParamValue::Number)
}

fn match_template(template: &str, segments: &[String]) -> Option<NavParams> {
    let parts: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }

    let mut captures = NavParams::new();
    for (part, segment) in parts.iter().zip(segments) {
        match placeholder(part) {
            Some(name) => captures.insert(name, segment_value(segment)),
            None if *part == segment => {}
            None => return None,
        }
    }
    Some(captures)
}
