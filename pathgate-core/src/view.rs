//! # Rendering
//!
//! A [`View`] turns a [`Model`] into response content. Rendering happens in
//! two conceptual phases: the model is first exposed to whatever the rendering
//! technology needs (a template context, a serializer input), then the
//! content is generated and written.
//!
//! Views are shared across all concurrent requests and must be stateless.

use crate::{
    error::RenderError,
    exchange::{Request, Response},
    model::Model,
};
use std::sync::Arc;

/// Request attribute holding a status code (as a JSON number) the view
/// should set on the response.
///
/// Not every view honours it.
pub const RESPONSE_STATUS_ATTRIBUTE: &str = "pathgate.view.responseStatus";

/// Request attribute holding a JSON object of URI template variables
/// extracted during routing, keyed by variable name.
///
/// Not every view honours it.
pub const PATH_VARIABLES: &str = "pathgate.view.pathVariables";

/// Request attribute holding the media type selected during content
/// negotiation, which may be more specific than the view's own.
pub const SELECTED_CONTENT_TYPE: &str = "pathgate.view.selectedContentType";

/// Renders a model into a response.
///
/// # Example
///
/// ```rust
/// use pathgate_core::{Model, RenderError, Request, Response, View};
///
/// struct CountView;
///
/// impl View for CountView {
///     fn content_type(&self) -> Option<&str> {
///         Some("text/plain")
///     }
///
///     fn render(
///         &self,
///         model: Option<&Model>,
///         _request: &dyn Request,
///         response: &mut dyn Response,
///     ) -> Result<(), RenderError> {
///         let count = model.map_or(0, Model::len);
///         response.write_body(count.to_string().as_bytes());
///         Ok(())
///     }
/// }
/// ```
pub trait View: Send + Sync {
    /// The content type of the view, if known before rendering.
    ///
    /// May include a charset. `None` means it is only decided at render time.
    fn content_type(&self) -> Option<&str> {
        None
    }

    /// Render the view.
    ///
    /// `model` is `None` for an empty model; that is never an error by itself.
    fn render(
        &self,
        model: Option<&Model>,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<(), RenderError>;
}

/// Maps logical view names to views.
pub trait ViewResolver: Send + Sync {
    /// Resolve a view by name, or `None` if this resolver does not know it.
    fn resolve_view_name(&self, view_name: &str) -> Option<Arc<dyn View>>;
}
