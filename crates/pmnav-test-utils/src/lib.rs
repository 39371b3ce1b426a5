//! Testing utilities for the navigator workspace
//!
//! Scripted and recording implementations of the navigator's capability
//! traits, plus a [`Harness`] that wires them into a [`Navigator`].

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pmnav_core::{
    FetchError, FragmentFetcher, InitializerRegistry, MemorySessionStore, Navigator,
    NavigatorConfig, PageSurface, QuickNavItem, ViewRenderer,
};
use pmnav_model::{FormSnapshots, HistoryState, NavParams, NavigationEntry, ViewId};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Scripted {
    delay: Duration,
    result: Result<String, FetchError>,
}

/// A fetch the [`ScriptedFetcher`] received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub route: String,
    pub at: Instant,
}

/// Fetcher answering from per-route queues
///
/// Routes with an empty queue answer with a small fragment naming the
/// route.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl ScriptedFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_ok(&self, route: &str, html: &str) {
        self.push_delayed(route, Duration::ZERO, Ok(html.to_string()));
    }

    /// Queue a failure
    pub fn push_err(&self, route: &str, error: FetchError) {
        self.push_delayed(route, Duration::ZERO, Err(error));
    }

    /// Queue the same failure `times` times
    pub fn push_errs(&self, route: &str, error: &FetchError, times: usize) {
        for _ in 0..times {
            self.push_err(route, error.clone());
        }
    }

    /// Queue a response that arrives after `delay`
    pub fn push_delayed(&self, route: &str, delay: Duration, result: Result<String, FetchError>) {
        self.scripts
            .lock()
            .entry(route.to_string())
            .or_default()
            .push_back(Scripted { delay, result });
    }

    /// Every fetch so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().clone()
    }

    /// Fetches of one route
    #[must_use]
    pub fn call_count(&self, route: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.route == route).count()
    }

    /// When each fetch of `route` started
    #[must_use]
    pub fn call_times(&self, route: &str) -> Vec<Instant> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.route == route)
            .map(|c| c.at)
            .collect()
    }
}

/// Default fragment for unscripted routes
#[must_use]
pub fn default_fragment(route: &str) -> String {
    format!("<section data-route=\"{route}\"></section>")
}

#[async_trait]
impl FragmentFetcher for ScriptedFetcher {
    async fn fetch(&self, route: &str) -> Result<String, FetchError> {
        self.calls.lock().push(FetchCall {
            route: route.to_string(),
            at: Instant::now(),
        });

        let scripted = self
            .scripts
            .lock()
            .get_mut(route)
            .and_then(VecDeque::pop_front);
        let Some(scripted) = scripted else {
            return Ok(default_fragment(route));
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.result
    }
}

/// Renderer keeping every piece of HTML it was given
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    renders: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn renders(&self) -> Vec<String> {
        self.renders.lock().clone()
    }

    /// What the content container shows now
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.renders.lock().last().cloned()
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render(&self, fragment_html: &str, _params: &NavParams) {
        self.renders.lock().push(fragment_html.to_string());
    }
}

/// Something the navigator did to the page
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Title(String),
    History { state: HistoryState, url: String },
    Breadcrumbs(Vec<ViewId>),
    ScrollTo(f64, f64),
    FilledField { form: String, field: String, value: String },
    ShowQuickNav(Vec<ViewId>),
    HideQuickNav,
    Reload,
}

/// Page surface with settable scroll/forms that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    scroll: Mutex<f64>,
    forms: Mutex<FormSnapshots>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user scrolling
    pub fn set_scroll(&self, y: f64) {
        *self.scroll.lock() = y;
    }

    /// Put a field on the page (or change its value)
    pub fn set_field(&self, form: &str, field: &str, value: &str) {
        self.forms
            .lock()
            .entry(form.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Remove every form from the page
    pub fn clear_forms(&self) {
        self.forms.lock().clear();
    }

    #[must_use]
    pub fn field(&self, form: &str, field: &str) -> Option<String> {
        self.forms.lock().get(form).and_then(|f| f.get(field)).cloned()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.collect(|e| match e {
            SurfaceEvent::Title(title) => Some(title.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn history(&self) -> Vec<(HistoryState, String)> {
        self.collect(|e| match e {
            SurfaceEvent::History { state, url } => Some((state.clone(), url.clone())),
            _ => None,
        })
    }

    #[must_use]
    pub fn scrolls(&self) -> Vec<(f64, f64)> {
        self.collect(|e| match e {
            SurfaceEvent::ScrollTo(x, y) => Some((*x, *y)),
            _ => None,
        })
    }

    /// Number of full page reloads requested
    #[must_use]
    pub fn reloads(&self) -> usize {
        self.collect(|e| matches!(e, SurfaceEvent::Reload).then_some(()))
            .len()
    }

    fn collect<T>(&self, pick: impl Fn(&SurfaceEvent) -> Option<T>) -> Vec<T> {
        self.events.lock().iter().filter_map(pick).collect()
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl PageSurface for RecordingSurface {
    fn set_title(&self, title: &str) {
        self.record(SurfaceEvent::Title(title.to_string()));
    }

    fn push_history(&self, state: &HistoryState, url: &str) {
        self.record(SurfaceEvent::History {
            state: state.clone(),
            url: url.to_string(),
        });
    }

    fn render_breadcrumbs(&self, trail: &[NavigationEntry]) {
        self.record(SurfaceEvent::Breadcrumbs(
            trail.iter().map(|e| e.view.clone()).collect(),
        ));
    }

    fn scroll_position(&self) -> f64 {
        *self.scroll.lock()
    }

    fn scroll_to(&self, x: f64, y: f64) {
        *self.scroll.lock() = y;
        self.record(SurfaceEvent::ScrollTo(x, y));
    }

    fn form_snapshots(&self) -> FormSnapshots {
        self.forms.lock().clone()
    }

    fn fill_form_field(&self, form: &str, field: &str, value: &str) -> bool {
        let filled = match self.forms.lock().get_mut(form).and_then(|f| f.get_mut(field)) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        };
        if filled {
            self.record(SurfaceEvent::FilledField {
                form: form.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        filled
    }

    fn show_quick_nav(&self, items: &[QuickNavItem]) {
        self.record(SurfaceEvent::ShowQuickNav(
            items.iter().map(|i| i.view.clone()).collect(),
        ));
    }

    fn hide_quick_nav(&self) {
        self.record(SurfaceEvent::HideQuickNav);
    }

    fn reload(&self) {
        self.record(SurfaceEvent::Reload);
    }
}

/// Navigator wired to recording fakes
#[derive(Debug)]
pub struct Harness {
    pub navigator: Navigator,
    pub fetcher: Arc<ScriptedFetcher>,
    pub store: Arc<MemorySessionStore>,
    pub renderer: Arc<RecordingRenderer>,
    pub surface: Arc<RecordingSurface>,
}

/// Harness with default configuration and no initializers
#[must_use]
pub fn harness() -> Harness {
    harness_with(NavigatorConfig::default(), InitializerRegistry::new())
}

/// Harness with custom configuration and initializers
#[must_use]
pub fn harness_with(config: NavigatorConfig, initializers: InitializerRegistry) -> Harness {
    harness_with_store(config, initializers, Arc::new(MemorySessionStore::new()))
}

/// Harness sharing an existing session store (simulates a page reload)
#[must_use]
pub fn harness_with_store(
    config: NavigatorConfig,
    initializers: InitializerRegistry,
    store: Arc<MemorySessionStore>,
) -> Harness {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let renderer = Arc::new(RecordingRenderer::new());
    let surface = Arc::new(RecordingSurface::new());
    let navigator = Navigator::new(
        config,
        Arc::clone(&fetcher) as Arc<dyn FragmentFetcher>,
        Arc::clone(&store) as Arc<dyn pmnav_core::SessionStore>,
        Arc::clone(&renderer) as Arc<dyn ViewRenderer>,
        Arc::clone(&surface) as Arc<dyn PageSurface>,
    )
    .with_initializers(initializers);

    Harness {
        navigator,
        fetcher,
        store,
        renderer,
        surface,
    }
}
