//! Name-based view resolution.

use pathgate_core::{View, ViewResolver};
use std::{collections::HashMap, fmt, sync::Arc};

/// A [`ViewResolver`] backed by a fixed map of names to views.
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn View>>,
}

impl ViewRegistry {
    /// Start building a registry.
    pub fn builder() -> ViewRegistryBuilder {
        ViewRegistryBuilder::new()
    }

    /// Whether a view is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether no views are registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewResolver for ViewRegistry {
    fn resolve_view_name(&self, view_name: &str) -> Option<Arc<dyn View>> {
        self.views.get(view_name).cloned()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.views.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ViewRegistry").field("views", &names).finish()
    }
}

/// Builder for constructing a [`ViewRegistry`].
#[derive(Default)]
pub struct ViewRegistryBuilder {
    views: HashMap<String, Arc<dyn View>>,
}

impl ViewRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view. A later registration under the same name wins.
    pub fn register<V: View + 'static>(self, name: impl Into<String>, view: V) -> Self {
        self.register_shared(name, Arc::new(view))
    }

    /// Register an already shared view.
    pub fn register_shared(mut self, name: impl Into<String>, view: Arc<dyn View>) -> Self {
        self.views.insert(name.into(), view);
        self
    }

    /// Build the registry.
    pub fn build(self) -> ViewRegistry {
        ViewRegistry { views: self.views }
    }
}
