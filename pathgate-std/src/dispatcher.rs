//! Request dispatch.
//!
//! [`Dispatcher`] runs one request through the full interception lifecycle:
//!
//! 1. compute the lookup path with a [`UrlPathHelper`],
//! 2. select the matching interceptors from the [`InterceptorRegistry`],
//! 3. run `pre_handle`, stopping if an interceptor vetoes,
//! 4. invoke the [`RequestHandler`],
//! 5. run `post_handle`,
//! 6. resolve and render the view, if the handler selected one,
//! 7. run `after_completion`, with the failure if any step after 2 failed.

use crate::{chain::HandlerExecutionChain, lookup::UrlPathHelper, registry::InterceptorRegistry};
use pathgate_core::{
    BoxError, DynError, Handler, ModelAndView, PathgateError, Request, Response, View, ViewRef,
    ViewResolver,
};
use std::{future::Future, sync::Arc};

/// The application code that serves a request.
///
/// Returning `Ok(None)` means the handler wrote the response itself and no
/// view should be rendered.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `RequestHandler`",
    label = "missing `RequestHandler` implementation",
    note = "Implement `RequestHandler` to serve requests through a `Dispatcher`."
)]
pub trait RequestHandler: Send + Sync + 'static {
    /// Serve the request.
    fn handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> impl Future<Output = Result<Option<ModelAndView>, BoxError>> + Send;
}

/// Dispatches requests to a handler, surrounded by the matching interceptors.
pub struct Dispatcher<H> {
    registry: Arc<InterceptorRegistry>,
    handler: H,
    view_resolver: Option<Arc<dyn ViewResolver>>,
    url_path_helper: UrlPathHelper,
}

impl<H: RequestHandler> Dispatcher<H> {
    /// Create a dispatcher with no view resolver and a default
    /// [`UrlPathHelper`].
    pub fn new(registry: impl Into<Arc<InterceptorRegistry>>, handler: H) -> Self {
        Self {
            registry: registry.into(),
            handler,
            view_resolver: None,
            url_path_helper: UrlPathHelper::new(),
        }
    }

    /// Resolve view names through `resolver`.
    pub fn with_view_resolver(mut self, resolver: Arc<dyn ViewResolver>) -> Self {
        self.view_resolver = Some(resolver);
        self
    }

    /// Compute lookup paths with `helper`.
    pub fn with_url_path_helper(mut self, helper: UrlPathHelper) -> Self {
        self.url_path_helper = helper;
        self
    }

    /// The interceptor registry.
    pub fn registry(&self) -> &Arc<InterceptorRegistry> {
        &self.registry
    }

    /// The request handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Dispatch one request.
    ///
    /// A veto from `pre_handle` is not an error: the vetoing interceptor is
    /// expected to have written the response.
    pub async fn dispatch(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<(), PathgateError> {
        let lookup_path = self.url_path_helper.lookup_path(request.path());
        let mut chain = self.registry.chain_for(&lookup_path)?;
        let handler: &Handler = &self.handler;

        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                method = request.method(),
                lookup_path = %lookup_path,
                interceptors = chain.len(),
                "dispatching request"
            );
        }

        let result = self.process(&mut chain, request, response, handler).await;

        let error = result.as_ref().err().map(|e| e as &DynError);
        chain
            .trigger_after_completion(request, response, handler, error)
            .await;

        #[cfg(feature = "tracing")]
        {
            if let Err(err) = &result {
                tracing::warn!(
                    method = request.method(),
                    lookup_path = %lookup_path,
                    error = %err,
                    "request failed"
                );
            }
        }

        result
    }

    async fn process(
        &self,
        chain: &mut HandlerExecutionChain,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<(), PathgateError> {
        let proceed = chain
            .apply_pre_handle(request, response, handler)
            .await
            .map_err(PathgateError::Interceptor)?;
        if !proceed {
            return Ok(());
        }

        let mut model_and_view = self
            .handler
            .handle(request, response)
            .await
            .map_err(PathgateError::Handler)?;

        chain
            .apply_post_handle(request, response, handler, model_and_view.as_mut())
            .await
            .map_err(PathgateError::Interceptor)?;

        match model_and_view {
            Some(mav) if !mav.was_cleared() => self.render(&mav, request, response),
            _ => Ok(()),
        }
    }

    fn render(
        &self,
        model_and_view: &ModelAndView,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<(), PathgateError> {
        let view = match model_and_view.view() {
            Some(view) => self.resolve(view)?,
            None => return Ok(()),
        };

        if let Some(status) = model_and_view.status() {
            response.set_status(status);
        }
        view.render(Some(model_and_view.model()), request, response)?;
        Ok(())
    }

    fn resolve(&self, view: &ViewRef) -> Result<Arc<dyn View>, PathgateError> {
        match view {
            ViewRef::Resolved(view) => Ok(view.clone()),
            ViewRef::Name(name) => self
                .view_resolver
                .as_ref()
                .and_then(|resolver| resolver.resolve_view_name(name))
                .ok_or_else(|| PathgateError::UnresolvedView(name.clone())),
        }
    }
}
