//! Per-view initializers
//!
//! After a fragment is injected, the view's collaborator code (charts,
//! tables, the timeline) wires itself up. Initializers are registered once
//! at startup; views without one are simply rendered.

use crate::error::InitError;
use async_trait::async_trait;
use pmnav_model::{NavParams, ViewId};
use std::collections::HashMap;
use std::sync::Arc;

/// Post-render hook for one view
#[async_trait]
pub trait ViewInitializer: Send + Sync {
    /// Populate the freshly rendered fragment
    async fn initialize(&self, view: &ViewId, params: &NavParams) -> Result<(), InitError>;
}

/// Adapter for synchronous closures
pub struct FnInitializer<F>(pub F);

#[async_trait]
impl<F> ViewInitializer for FnInitializer<F>
where
    F: Fn(&ViewId, &NavParams) -> Result<(), InitError> + Send + Sync,
{
    async fn initialize(&self, view: &ViewId, params: &NavParams) -> Result<(), InitError> {
        (self.0)(view, params)
    }
}

/// `ViewId → initializer` map
#[derive(Clone, Default)]
pub struct InitializerRegistry {
    initializers: HashMap<ViewId, Arc<dyn ViewInitializer>>,
}

impl std::fmt::Debug for InitializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut views: Vec<&str> = self.initializers.keys().map(ViewId::as_str).collect();
        views.sort_unstable();
        f.debug_struct("InitializerRegistry")
            .field("views", &views)
            .finish()
    }
}

impl InitializerRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an initializer, returning the one it replaced
    pub fn register(
        &mut self,
        view: ViewId,
        initializer: Arc<dyn ViewInitializer>,
    ) -> Option<Arc<dyn ViewInitializer>> {
        self.initializers.insert(view, initializer)
    }

    /// Register a synchronous closure
    pub fn register_fn<F>(&mut self, view: ViewId, f: F)
    where
        F: Fn(&ViewId, &NavParams) -> Result<(), InitError> + Send + Sync + 'static,
    {
        self.initializers.insert(view, Arc::new(FnInitializer(f)));
    }

    /// Check if view has an initializer
    #[inline]
    #[must_use]
    pub fn contains(&self, view: &ViewId) -> bool {
        self.initializers.contains_key(view)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.initializers.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.initializers.is_empty()
    }

    /// Run the initializer for `view`
    ///
    /// Returns `Ok(false)` when nothing is registered for the view.
    ///
    /// # Errors
    /// Propagates the initializer's own error.
    pub async fn run(&self, view: &ViewId, params: &NavParams) -> Result<bool, InitError> {
        let Some(initializer) = self.initializers.get(view).cloned() else {
            return Ok(false);
        };
        initializer.initialize(view, params).await?;
        Ok(true)
    }
}
