//! Handler execution chain.
//!
//! The chain drives the interceptors that apply to one request:
//!
//! - `pre_handle` runs in registration order,
//! - `post_handle` and `after_completion` run in reverse order,
//! - `after_completion` only reaches interceptors whose `pre_handle` returned
//!   `true`, and runs at most once per chain.

use pathgate_core::{
    BoxError, DynError, DynHandlerInterceptor, Handler, ModelAndView, Request, Response,
};
use std::sync::Arc;

/// The interceptors selected for one request, plus their progress.
///
/// A chain is created per request and is not reused.
pub struct HandlerExecutionChain {
    interceptors: Vec<Arc<dyn DynHandlerInterceptor>>,
    interceptor_index: Option<usize>,
}

impl HandlerExecutionChain {
    /// Create a chain over `interceptors`, in application order.
    pub fn new(interceptors: Vec<Arc<dyn DynHandlerInterceptor>>) -> Self {
        Self {
            interceptors,
            interceptor_index: None,
        }
    }

    /// Append an interceptor.
    pub fn push(&mut self, interceptor: Arc<dyn DynHandlerInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// The interceptors in application order.
    pub fn interceptors(&self) -> &[Arc<dyn DynHandlerInterceptor>] {
        &self.interceptors
    }

    /// Number of interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain has no interceptors.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run `pre_handle` on every interceptor in order.
    ///
    /// Returns `false` as soon as one interceptor does, after running
    /// `after_completion` for the interceptors that already passed. An error
    /// stops the chain and propagates; completion is then the caller's job.
    pub async fn apply_pre_handle(
        &mut self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<bool, BoxError> {
        for index in 0..self.interceptors.len() {
            let proceed = (*self.interceptors[index])
                .pre_handle_dyn(request, response, handler)
                .await?;
            if !proceed {
                self.trigger_after_completion(request, response, handler, None)
                    .await;
                return Ok(false);
            }
            self.interceptor_index = Some(index);
        }
        Ok(true)
    }

    /// Run `post_handle` on every interceptor in reverse order.
    pub async fn apply_post_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        mut model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        for interceptor in self.interceptors.iter().rev() {
            (**interceptor)
                .post_handle_dyn(request, response, handler, model_and_view.as_deref_mut())
                .await?;
        }
        Ok(())
    }

    /// Run `after_completion` in reverse order on every interceptor whose
    /// `pre_handle` returned `true`.
    ///
    /// Only the first call has any effect. Failures are logged and swallowed
    /// so every interceptor gets its turn.
    pub async fn trigger_after_completion(
        &mut self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        error: Option<&DynError>,
    ) {
        let Some(last) = self.interceptor_index.take() else {
            return;
        };

        for interceptor in self.interceptors[..=last].iter().rev() {
            let result = (**interceptor)
                .after_completion_dyn(request, response, handler, error)
                .await;
            if let Err(err) = result {
                #[cfg(feature = "tracing")]
                {
                    tracing::error!(
                        error = %err,
                        method = request.method(),
                        path = request.path(),
                        "after-completion failed"
                    );
                }
                #[cfg(not(feature = "tracing"))]
                {
                    let _ = err;
                }
            }
        }
    }
}

impl Default for HandlerExecutionChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for HandlerExecutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerExecutionChain")
            .field("interceptors", &self.interceptors.len())
            .field("interceptor_index", &self.interceptor_index)
            .finish()
    }
}
