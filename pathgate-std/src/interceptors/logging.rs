//! Logging interceptor for request observation.

use pathgate_core::{
    BoxError, DynError, Handler, HandlerInterceptor, ModelAndView, Request, Response,
};

/// An interceptor that logs each lifecycle phase.
///
/// Phases are logged at debug level; after-completion with a failure at warn.
/// Without the `tracing` feature it is a pass-through.
#[derive(Debug, Clone)]
pub struct LoggingInterceptor {
    name: String,
}

impl LoggingInterceptor {
    /// Create a logging interceptor labelled `name` in every record.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The label.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new("pathgate")
    }
}

impl HandlerInterceptor for LoggingInterceptor {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        _handler: &Handler,
    ) -> Result<bool, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                interceptor = %self.name,
                method = request.method(),
                path = request.path(),
                "pre-handle"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = request;
        }
        Ok(true)
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        _handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(
                interceptor = %self.name,
                method = request.method(),
                path = request.path(),
                view = ?model_and_view.as_ref().and_then(|mav| mav.view_name()),
                "post-handle"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (request, model_and_view);
        }
        Ok(())
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        _handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            let status = response.status().as_u16();
            match error {
                Some(error) => tracing::warn!(
                    interceptor = %self.name,
                    method = request.method(),
                    path = request.path(),
                    status,
                    %error,
                    "request failed"
                ),
                None => tracing::debug!(
                    interceptor = %self.name,
                    method = request.method(),
                    path = request.path(),
                    status,
                    "request completed"
                ),
            }
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (request, response, error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{get, response};

    #[tokio::test]
    async fn passes_every_phase_through() {
        let logging = LoggingInterceptor::new("audit");
        let (request, mut response) = (get("/orders"), response());
        let mut mav = ModelAndView::with_view_name("orders");

        assert!(logging.pre_handle(&request, &mut response, &"h").await.unwrap());
        logging
            .post_handle(&request, &mut response, &"h", Some(&mut mav))
            .await
            .unwrap();
        logging
            .after_completion(&request, &mut response, &"h", None)
            .await
            .unwrap();

        assert_eq!(mav.view_name(), Some("orders"));
        assert_eq!(logging.name(), "audit");
    }
}
