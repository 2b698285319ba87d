//! # Interception
//!
//! Interceptors are cross-cutting hooks invoked around handler execution:
//! authentication checks, locale switching, timing, auditing. Each request
//! drives up to three calls, always in this order:
//!
//! 1. [`pre_handle`] before the handler runs. Returning `false` short-circuits
//!    the request; the interceptor is then expected to have written the
//!    response itself.
//! 2. [`post_handle`] after the handler succeeded, before the view renders.
//! 3. [`after_completion`] after rendering, on success and failure alike, but
//!    only for interceptors whose `pre_handle` returned `true`.
//!
//! Upholding that order is the dispatch layer's job, not the interceptor's.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`HandlerInterceptor`] uses native `async fn` for zero-cost static
//! dispatch. Registries and chains hold heterogeneous interceptors through the
//! object-safe [`DynHandlerInterceptor`], which every `HandlerInterceptor`
//! implements automatically.
//!
//! [`pre_handle`]: HandlerInterceptor::pre_handle
//! [`post_handle`]: HandlerInterceptor::post_handle
//! [`after_completion`]: HandlerInterceptor::after_completion

use crate::{
    error::{BoxError, DynError},
    exchange::{Handler, Request, Response},
    model::{Model, ModelAndView},
};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};

/// A hook around handler execution.
///
/// Every method has a pass-through default, so implementations only override
/// the phases they care about.
///
/// # Example
///
/// ```rust
/// use pathgate_core::{BoxError, Handler, HandlerInterceptor, Request, Response};
/// use http::StatusCode;
///
/// struct RequireApiKey;
///
/// impl HandlerInterceptor for RequireApiKey {
///     async fn pre_handle(
///         &self,
///         request: &dyn Request,
///         response: &mut dyn Response,
///         _handler: &Handler,
///     ) -> Result<bool, BoxError> {
///         if request.attribute("api_key").is_some() {
///             return Ok(true);
///         }
///         response.set_status(StatusCode::UNAUTHORIZED);
///         Ok(false)
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `HandlerInterceptor`",
    label = "missing `HandlerInterceptor` implementation",
    note = "Implement `HandlerInterceptor`, or adapt a `WebRequestInterceptor` with `WebRequestHandlerInterceptorAdapter`."
)]
pub trait HandlerInterceptor: Send + Sync + 'static {
    /// Called before the handler. Return `false` to stop the request.
    fn pre_handle(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
        _handler: &Handler,
    ) -> impl Future<Output = Result<bool, BoxError>> + Send {
        async { Ok::<_, BoxError>(true) }
    }

    /// Called after the handler succeeded, before the view is rendered.
    ///
    /// `model_and_view` is `None` when the handler wrote the response itself.
    fn post_handle(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
        _handler: &Handler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok::<_, BoxError>(()) }
    }

    /// Called once the request is complete, with the failure if there was one.
    fn after_completion(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
        _handler: &Handler,
        _error: Option<&DynError>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok::<_, BoxError>(()) }
    }
}

/// Dynamic object-safe version of [`HandlerInterceptor`].
///
/// Use this trait when you need runtime polymorphism (e.g., in a registry).
pub trait DynHandlerInterceptor: Send + Sync + 'static {
    /// Dynamic dispatch version of [`HandlerInterceptor::pre_handle`].
    fn pre_handle_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
    ) -> BoxFuture<'a, Result<bool, BoxError>>;

    /// Dynamic dispatch version of [`HandlerInterceptor::post_handle`].
    fn post_handle_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
        model_and_view: Option<&'a mut ModelAndView>,
    ) -> BoxFuture<'a, Result<(), BoxError>>;

    /// Dynamic dispatch version of [`HandlerInterceptor::after_completion`].
    fn after_completion_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
        error: Option<&'a DynError>,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

// Blanket implementation: Any type implementing HandlerInterceptor implements DynHandlerInterceptor.
impl<T: HandlerInterceptor> DynHandlerInterceptor for T {
    fn pre_handle_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
    ) -> BoxFuture<'a, Result<bool, BoxError>> {
        Box::pin(self.pre_handle(request, response, handler))
    }

    fn post_handle_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
        model_and_view: Option<&'a mut ModelAndView>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.post_handle(request, response, handler, model_and_view))
    }

    fn after_completion_dyn<'a>(
        &'a self,
        request: &'a dyn Request,
        response: &'a mut dyn Response,
        handler: &'a Handler,
        error: Option<&'a DynError>,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.after_completion(request, response, handler, error))
    }
}

// Allow a shared trait object to be used where HandlerInterceptor is expected.
// Calls go through `**self` so they hit the vtable, not the blanket impl above.
impl HandlerInterceptor for Arc<dyn DynHandlerInterceptor> {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<bool, BoxError> {
        (**self).pre_handle_dyn(request, response, handler).await
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        (**self)
            .post_handle_dyn(request, response, handler, model_and_view)
            .await
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        (**self)
            .after_completion_dyn(request, response, handler, error)
            .await
    }
}

/// A narrower interceptor that only observes the request and response.
///
/// It has no access to the handler and cannot short-circuit the request. The
/// model is exposed in [`post_handle`](Self::post_handle) only.
/// `pathgate-std` widens it into a [`HandlerInterceptor`] with
/// `WebRequestHandlerInterceptorAdapter`.
pub trait WebRequestInterceptor: Send + Sync + 'static {
    /// Called before the handler.
    fn pre_handle(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok::<_, BoxError>(()) }
    }

    /// Called after the handler succeeded, with the model if there is one.
    fn post_handle(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
        _model: Option<&mut Model>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok::<_, BoxError>(()) }
    }

    /// Called once the request is complete, with the failure if there was one.
    fn after_completion(
        &self,
        _request: &dyn Request,
        _response: &mut dyn Response,
        _error: Option<&DynError>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        async { Ok::<_, BoxError>(()) }
    }
}
