//! Widening a [`WebRequestInterceptor`] into a [`HandlerInterceptor`].

use pathgate_core::{
    BoxError, DynError, Handler, HandlerInterceptor, ModelAndView, Request, Response,
    WebRequestInterceptor,
};

/// Adapts a [`WebRequestInterceptor`] to the [`HandlerInterceptor`] contract.
///
/// - `pre_handle` runs the narrow hook and then always continues.
/// - `post_handle` hands over the model, unless there is none or an earlier
///   interceptor cleared it.
/// - `after_completion` forwards the failure.
///
/// Errors from the narrow hooks propagate unchanged.
pub struct WebRequestHandlerInterceptorAdapter<W> {
    inner: W,
}

impl<W: WebRequestInterceptor> WebRequestHandlerInterceptorAdapter<W> {
    /// Wrap a web-request interceptor.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// The adapted interceptor.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Unwrap the adapted interceptor.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WebRequestInterceptor> HandlerInterceptor for WebRequestHandlerInterceptorAdapter<W> {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        _handler: &Handler,
    ) -> Result<bool, BoxError> {
        self.inner.pre_handle(request, response).await?;
        Ok(true)
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        _handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        let model = model_and_view
            .filter(|mav| !mav.was_cleared())
            .map(ModelAndView::model_mut);
        self.inner.post_handle(request, response, model).await
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        _handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        self.inner.after_completion(request, response, error).await
    }
}
