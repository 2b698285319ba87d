//! Model data handed from handlers to views.

use crate::view::View;
use http::StatusCode;
use serde_json::{Map, Value};
use std::{collections::HashMap, fmt, sync::Arc};

/// Named values a handler produces for a view to render.
///
/// Keys are strings; values are arbitrary JSON values, with `null` standing in
/// for an absent value. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    entries: HashMap<String, Value>,
}

impl Model {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, returning the previous value under that name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Whether an attribute with this name exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Copy every attribute of `other` into this model, overwriting clashes.
    pub fn merge(&mut self, other: &Model) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model has no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every attribute.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over the attributes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert into a JSON object.
    pub fn into_json(self) -> Value {
        Value::Object(self.entries.into_iter().collect::<Map<String, Value>>())
    }
}

impl FromIterator<(String, Value)> for Model {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Model {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The view a handler selected: a name to resolve, or a ready instance.
#[derive(Clone)]
pub enum ViewRef {
    /// A logical view name, resolved through a `ViewResolver`.
    Name(String),
    /// An already resolved view.
    Resolved(Arc<dyn View>),
}

impl fmt::Debug for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRef::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ViewRef::Resolved(view) => f
                .debug_tuple("Resolved")
                .field(&view.content_type())
                .finish(),
        }
    }
}

/// Holder for both model and view returned by a handler.
#[derive(Debug, Clone, Default)]
pub struct ModelAndView {
    view: Option<ViewRef>,
    model: Model,
    status: Option<StatusCode>,
    cleared: bool,
}

impl ModelAndView {
    /// Create an empty instance with no view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance that renders the named view.
    pub fn with_view_name(name: impl Into<String>) -> Self {
        Self {
            view: Some(ViewRef::Name(name.into())),
            ..Self::default()
        }
    }

    /// Create an instance that renders the given view.
    pub fn with_view(view: Arc<dyn View>) -> Self {
        Self {
            view: Some(ViewRef::Resolved(view)),
            ..Self::default()
        }
    }

    /// Builder-style attribute insertion.
    pub fn with_object(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.model.insert(name, value);
        self
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// The selected view, if any.
    pub fn view(&self) -> Option<&ViewRef> {
        self.view.as_ref()
    }

    /// The view name, if the view is a reference by name.
    pub fn view_name(&self) -> Option<&str> {
        match &self.view {
            Some(ViewRef::Name(name)) => Some(name),
            _ => None,
        }
    }

    /// Replace the view.
    pub fn set_view(&mut self, view: ViewRef) {
        self.view = Some(view);
    }

    /// Whether a view is set.
    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    /// The model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Mutable access to the model.
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Add an attribute to the model.
    pub fn add_object(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.model.insert(name, value);
    }

    /// The status to set on the response before rendering.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Set the response status for rendering.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Drop the view and the model.
    ///
    /// Interceptors use this in `post_handle` to suppress rendering.
    pub fn clear(&mut self) {
        self.view = None;
        self.model.clear();
        self.cleared = true;
    }

    /// Whether neither a view nor model attributes are present.
    pub fn is_empty(&self) -> bool {
        self.view.is_none() && self.model.is_empty()
    }

    /// Whether [`clear`](Self::clear) was called and nothing was added since.
    pub fn was_cleared(&self) -> bool {
        self.cleared && self.is_empty()
    }
}
