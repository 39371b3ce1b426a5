//! View navigator
//!
//! Owns the navigation state of one page: the current view, the breadcrumb
//! trail, the load phase and the last load failure. Every effect on the
//! page goes through the capability traits in [`crate::ports`].
//!
//! # Workflow
//! 1. Save scroll and form context of the view being left
//! 2. Record a breadcrumb entry and (optionally) a history entry
//! 3. Set the document title and redraw breadcrumbs
//! 4. Fetch the view's fragment with retry, render it, run its initializer
//!
//! Loads are tagged with a generation number. A response that arrives
//! after a newer load started is dropped without touching the page.

use crate::config::NavigatorConfig;
use crate::error::{FetchError, NavError};
use crate::initializers::InitializerRegistry;
use crate::overlay::{quick_nav_items, QuickNavItem};
use crate::panels::{loading_placeholder, ErrorPanel, RecoveryAction};
use crate::phase::{validate_transition, LoadPhase};
use crate::ports::{FragmentFetcher, PageSurface, SessionStore, ViewRenderer};
use crate::retry::with_retry;
use parking_lot::Mutex;
use pmnav_model::{
    BreadcrumbTrail, ErrorState, HistoryState, NavParams, NavigationContext, NavigationEntry,
    ViewId,
};
use pmnav_routing::{
    page_title, render_placeholders, view_label, AmbientValues, KeyEvent, RouteTable,
    ShortcutAction, ShortcutMap,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How a fragment load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fragment rendered and initialized
    Loaded(ViewId),
    /// Error panel shown
    Failed(ErrorState),
    /// A newer load started first; nothing was rendered
    Superseded,
}

impl LoadOutcome {
    /// Check if the view is on screen
    #[inline]
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No binding for the chord
    Ignored,
    /// A view chord started a navigation
    Navigated(LoadOutcome),
    /// Quick-navigation overlay shown
    OverlayOpened,
    /// Quick-navigation overlay hidden
    OverlayClosed,
}

#[derive(Debug, Default)]
struct NavState {
    current: Option<(ViewId, NavParams)>,
    trail: BreadcrumbTrail,
    phase: LoadPhase,
    error: Option<ErrorState>,
    overlay_open: bool,
    current_user: Option<String>,
}

impl NavState {
    fn transition(&mut self, to: LoadPhase) {
        if let Err(e) = validate_transition(self.phase, to) {
            tracing::warn!("{}", e);
        }
        self.phase = to;
    }
}

/// Client-side view navigator
pub struct Navigator {
    config: NavigatorConfig,
    routes: RouteTable,
    shortcuts: ShortcutMap,
    initializers: InitializerRegistry,
    fetcher: Arc<dyn FragmentFetcher>,
    store: Arc<dyn SessionStore>,
    renderer: Arc<dyn ViewRenderer>,
    surface: Arc<dyn PageSurface>,
    state: Mutex<NavState>,
    generation: AtomicU64,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Navigator")
            .field("config", &self.config)
            .field("current", &state.current)
            .field("phase", &state.phase)
            .field("breadcrumbs", &state.trail.len())
            .field("initializers", &self.initializers)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Create navigator with the default route and shortcut tables
    #[must_use]
    pub fn new(
        config: NavigatorConfig,
        fetcher: Arc<dyn FragmentFetcher>,
        store: Arc<dyn SessionStore>,
        renderer: Arc<dyn ViewRenderer>,
        surface: Arc<dyn PageSurface>,
    ) -> Self {
        let mut routes = RouteTable::default();
        routes.set_default_view(config.default_view.clone());
        let state = NavState {
            trail: BreadcrumbTrail::with_limit(config.breadcrumb_limit),
            ..NavState::default()
        };

        Self {
            config,
            routes,
            shortcuts: ShortcutMap::with_defaults(),
            initializers: InitializerRegistry::new(),
            fetcher,
            store,
            renderer,
            surface,
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
        }
    }

    /// With route table (its default view is replaced by the configured one)
    #[must_use]
    pub fn with_routes(mut self, mut routes: RouteTable) -> Self {
        routes.set_default_view(self.config.default_view.clone());
        self.routes = routes;
        self
    }

    /// With shortcut table
    #[inline]
    #[must_use]
    pub fn with_shortcuts(mut self, shortcuts: ShortcutMap) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    /// With per-view initializers
    #[inline]
    #[must_use]
    pub fn with_initializers(mut self, initializers: InitializerRegistry) -> Self {
        self.initializers = initializers;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[inline]
    #[must_use]
    pub fn shortcuts(&self) -> &ShortcutMap {
        &self.shortcuts
    }

    /// View currently shown (or being loaded)
    #[must_use]
    pub fn current_view(&self) -> Option<ViewId> {
        self.state.lock().current.as_ref().map(|(view, _)| view.clone())
    }

    /// Parameters of the current view
    #[must_use]
    pub fn current_params(&self) -> Option<NavParams> {
        self.state.lock().current.as_ref().map(|(_, params)| params.clone())
    }

    /// Breadcrumb entries, oldest first
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<NavigationEntry> {
        self.state.lock().trail.to_vec()
    }

    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.state.lock().phase
    }

    /// Most recent unrecovered load failure
    #[must_use]
    pub fn error_state(&self) -> Option<ErrorState> {
        self.state.lock().error.clone()
    }

    #[must_use]
    pub fn is_quick_nav_open(&self) -> bool {
        self.state.lock().overlay_open
    }

    /// Set the user name offered to fragments as `{{current_user}}`
    pub fn set_current_user(&self, user: Option<String>) {
        self.state.lock().current_user = user;
    }

    /// Navigate to a view
    ///
    /// # Errors
    /// `NavError::Route` if the URL cannot be built (a path parameter is
    /// missing). Fragment load failures are not errors: they end in
    /// [`LoadOutcome::Failed`] with the error panel on screen.
    pub async fn navigate_to(
        &self,
        view: ViewId,
        params: NavParams,
        update_history: bool,
    ) -> Result<LoadOutcome, NavError> {
        let url = self.routes.build_url(&view, &params)?;
        tracing::info!("Navigating to {} ({})", view, url);

        if self.current_view().is_some() {
            if let Err(e) = self.save_context() {
                tracing::warn!("Failed to save navigation context: {}", e);
            }
        }

        let title = page_title(&view, &params);
        let trail = {
            let mut state = self.state.lock();
            state
                .trail
                .push(NavigationEntry::new(view.clone(), params.clone(), title.clone()));
            state.current = Some((view.clone(), params.clone()));
            state.trail.to_vec()
        };

        if update_history {
            self.surface
                .push_history(&HistoryState::new(view.clone(), params.clone()), &url);
        }
        self.surface
            .set_title(&format!("{} - {}", title, self.config.app_title));
        self.surface.render_breadcrumbs(&trail);

        Ok(self.load_view_content(&view, &params, 0).await)
    }

    /// Fetch, render and initialize a view's fragment
    ///
    /// `retry_count` is the number of transient failures already charged
    /// against the retry budget, capped one below `max_attempts`.
    pub async fn load_view_content(
        &self,
        view: &ViewId,
        params: &NavParams,
        retry_count: u32,
    ) -> LoadOutcome {
        let policy = self.config.retry_policy();
        let retry_count = retry_count.min(policy.max_attempts.saturating_sub(1));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().transition(LoadPhase::Loading);
        self.renderer
            .render(&loading_placeholder(&view_label(view)), params);

        let route = match self.routes.fragment_route(view, params) {
            Ok(route) => route,
            Err(e) => {
                let message = NavError::from(e).to_string();
                return self.fail(generation, view, params, message, retry_count);
            }
        };

        let timeout = self.config.request_timeout();
        let fetcher = &self.fetcher;
        let route_ref: &str = &route;
        let fetched = with_retry(&policy, retry_count, move |attempt| async move {
            tracing::debug!("GET {} (attempt {})", route_ref, attempt);
            match tokio::time::timeout(timeout, fetcher.fetch(route_ref)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout {
                    after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            }
        })
        .await;

        if !self.is_current(generation) {
            tracing::debug!("Discarding stale response for {}", view);
            return LoadOutcome::Superseded;
        }

        let html = match fetched {
            Ok(html) => html,
            Err(failure) => {
                return self.fail(
                    generation,
                    view,
                    params,
                    failure.error.to_string(),
                    failure.failures,
                )
            }
        };

        let ambient = AmbientValues::new(view.clone(), self.state.lock().current_user.clone());
        self.renderer
            .render(&render_placeholders(&html, params, &ambient), params);

        if let Err(source) = self.initializers.run(view, params).await {
            let err = NavError::Initializer {
                view: view.clone(),
                source,
            };
            return self.fail(generation, view, params, err.to_string(), retry_count);
        }

        let mut state = self.state.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            return LoadOutcome::Superseded;
        }
        state.error = None;
        state.transition(LoadPhase::Idle);
        drop(state);

        tracing::info!("Loaded {}", view);
        LoadOutcome::Loaded(view.clone())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn fail(
        &self,
        generation: u64,
        view: &ViewId,
        params: &NavParams,
        message: String,
        retry_count: u32,
    ) -> LoadOutcome {
        let error = ErrorState::new(view.clone(), message, retry_count);
        {
            let mut state = self.state.lock();
            if self.generation.load(Ordering::SeqCst) != generation {
                return LoadOutcome::Superseded;
            }
            state.error = Some(error.clone());
            state.transition(LoadPhase::ErrorDisplayed);
        }

        tracing::error!(
            "Failed to load {} ({} transient failure(s)): {}",
            view,
            retry_count,
            error.error
        );
        let panel = ErrorPanel::new(
            &error,
            view_label(view),
            self.config.max_attempts,
            view_label(self.routes.default_view()),
        );
        self.renderer.render(&panel.to_html(), params);
        LoadOutcome::Failed(error)
    }

    /// Open the view named by the initial page location
    ///
    /// Unmapped paths open the default view. A saved context is restored
    /// when it belongs to the opened view.
    ///
    /// # Errors
    /// `NavError::Route` for locations that cannot be parsed.
    pub async fn start(&self, location: &str) -> Result<LoadOutcome, NavError> {
        let resolved = self.routes.resolve_location(location)?;
        if !resolved.matched {
            tracing::warn!(
                "No route for {}, opening {}",
                location,
                resolved.view
            );
        }

        let outcome = self.navigate_to(resolved.view, resolved.params, false).await?;
        if outcome.is_loaded() {
            match self.restore_context() {
                Ok(true) => tracing::debug!("Restored navigation context"),
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to restore navigation context: {}", e),
            }
        }
        Ok(outcome)
    }

    /// Replay a browser back/forward step
    ///
    /// Pops without a state object (entries this navigator did not push)
    /// are ignored.
    ///
    /// # Errors
    /// See [`Navigator::navigate_to`].
    pub async fn on_history_pop(
        &self,
        state: Option<HistoryState>,
    ) -> Result<Option<LoadOutcome>, NavError> {
        let Some(state) = state else {
            tracing::debug!("Ignoring history pop without state");
            return Ok(None);
        };
        self.navigate_to(state.view, state.params, false)
            .await
            .map(Some)
    }

    /// Dispatch a key press against the shortcut table
    ///
    /// # Errors
    /// See [`Navigator::navigate_to`].
    pub async fn handle_key(&self, event: &KeyEvent) -> Result<KeyOutcome, NavError> {
        let Some(action) = self.shortcuts.lookup(event).cloned() else {
            return Ok(KeyOutcome::Ignored);
        };

        match action {
            ShortcutAction::Navigate(view) => {
                self.close_quick_nav();
                let outcome = self.navigate_to(view, NavParams::new(), true).await?;
                Ok(KeyOutcome::Navigated(outcome))
            }
            ShortcutAction::ToggleQuickNav => Ok(if self.toggle_quick_nav() {
                KeyOutcome::OverlayOpened
            } else {
                KeyOutcome::OverlayClosed
            }),
            ShortcutAction::CloseOverlay => Ok(if self.close_quick_nav() {
                KeyOutcome::OverlayClosed
            } else {
                KeyOutcome::Ignored
            }),
        }
    }

    /// Persist scroll offset and form values of the current view
    ///
    /// # Errors
    /// `NavError::NoActiveView` before the first navigation, plus storage
    /// and serialization errors.
    pub fn save_context(&self) -> Result<(), NavError> {
        let (view, params) = self
            .state
            .lock()
            .current
            .clone()
            .ok_or(NavError::NoActiveView)?;

        let context = NavigationContext::capture(
            view,
            params,
            self.surface.scroll_position(),
            self.surface.form_snapshots(),
        );
        let raw = serde_json::to_string(&context)?;
        self.store.set(&self.config.context_key, &raw)?;

        tracing::debug!(
            "Saved context for {} (scroll {}, {} field(s))",
            context.current_view,
            context.scroll_position,
            context.field_count()
        );
        Ok(())
    }

    /// Reapply the saved context if it belongs to the current view
    ///
    /// Returns whether anything was restored. Corrupt stored JSON is
    /// logged and treated as absent.
    ///
    /// # Errors
    /// Storage errors only.
    pub fn restore_context(&self) -> Result<bool, NavError> {
        let Some(raw) = self.store.get(&self.config.context_key)? else {
            return Ok(false);
        };
        let context: NavigationContext = match serde_json::from_str(&raw) {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!("Ignoring corrupt navigation context: {}", e);
                return Ok(false);
            }
        };
        if self.current_view().as_ref() != Some(&context.current_view) {
            tracing::debug!(
                "Saved context belongs to {}, not restoring",
                context.current_view
            );
            return Ok(false);
        }

        self.surface.scroll_to(0.0, context.scroll_position);
        let mut missing = 0_usize;
        for (form, fields) in &context.form_snapshots {
            for (field, value) in fields {
                if !self.surface.fill_form_field(form, field, value) {
                    missing += 1;
                }
            }
        }
        if missing > 0 {
            tracing::debug!("{} saved field(s) no longer on the page", missing);
        }
        Ok(true)
    }

    /// Show the quick-navigation overlay
    pub fn open_quick_nav(&self) -> Vec<QuickNavItem> {
        let items = quick_nav_items(&self.routes, &self.shortcuts);
        self.state.lock().overlay_open = true;
        self.surface.show_quick_nav(&items);
        items
    }

    /// Hide the overlay; returns whether it was open
    pub fn close_quick_nav(&self) -> bool {
        let was_open = std::mem::replace(&mut self.state.lock().overlay_open, false);
        if was_open {
            self.surface.hide_quick_nav();
        }
        was_open
    }

    /// Flip the overlay; returns whether it is now open
    pub fn toggle_quick_nav(&self) -> bool {
        if self.close_quick_nav() {
            false
        } else {
            self.open_quick_nav();
            true
        }
    }

    /// Pick an overlay entry: dismiss the overlay and navigate
    ///
    /// # Errors
    /// See [`Navigator::navigate_to`].
    pub async fn select_quick_nav(&self, view: ViewId) -> Result<LoadOutcome, NavError> {
        self.close_quick_nav();
        self.navigate_to(view, NavParams::new(), true).await
    }

    /// Handle a button on the error panel
    ///
    /// Returns `None` for a page reload, which hands control to the host.
    ///
    /// # Errors
    /// `NavError::NoActiveView` when retrying before any navigation, plus
    /// the errors of [`Navigator::navigate_to`].
    pub async fn recover(&self, action: RecoveryAction) -> Result<Option<LoadOutcome>, NavError> {
        tracing::info!("Recovery action: {}", action.as_str());
        match action {
            RecoveryAction::Retry => {
                let (view, params) = self
                    .state
                    .lock()
                    .current
                    .clone()
                    .ok_or(NavError::NoActiveView)?;
                Ok(Some(self.load_view_content(&view, &params, 0).await))
            }
            RecoveryAction::ReloadPage => {
                self.surface.reload();
                Ok(None)
            }
            RecoveryAction::GoToDefault => {
                let view = self.routes.default_view().clone();
                self.navigate_to(view, NavParams::new(), true)
                    .await
                    .map(Some)
            }
        }
    }

    /// Navigate to the breadcrumb at `index` (0 = oldest)
    ///
    /// # Errors
    /// `NavError::UnknownBreadcrumb` for an out-of-range index, plus the
    /// errors of [`Navigator::navigate_to`].
    pub async fn navigate_to_breadcrumb(&self, index: usize) -> Result<LoadOutcome, NavError> {
        let entry = self
            .state
            .lock()
            .trail
            .get(index)
            .cloned()
            .ok_or(NavError::UnknownBreadcrumb(index))?;
        self.navigate_to(entry.view, entry.params, true).await
    }
}
