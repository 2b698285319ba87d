//! Timeout interceptor for time-limited lifecycle calls.

use pathgate_core::{
    BoxError, DynError, Handler, HandlerInterceptor, ModelAndView, Request, Response,
};
use std::time::Duration;
use tokio::time::timeout;

/// Error returned when an interceptor call times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interceptor call timed out after {0:?}")]
pub struct TimeoutError(pub Duration);

/// An interceptor that bounds every lifecycle call of another interceptor.
pub struct TimeoutInterceptor<I> {
    inner: I,
    duration: Duration,
}

impl<I> TimeoutInterceptor<I> {
    /// Create a new timeout interceptor.
    pub fn new(inner: I, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// The per-call limit.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<I: HandlerInterceptor> HandlerInterceptor for TimeoutInterceptor<I> {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<bool, BoxError> {
        match timeout(self.duration, self.inner.pre_handle(request, response, handler)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        let call = self
            .inner
            .post_handle(request, response, handler, model_and_view);
        match timeout(self.duration, call).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        let call = self
            .inner
            .after_completion(request, response, handler, error);
        match timeout(self.duration, call).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(TimeoutError(self.duration))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingInterceptor, get, response};

    struct Stalling;

    impl HandlerInterceptor for Stalling {
        async fn pre_handle(
            &self,
            _request: &dyn Request,
            _response: &mut dyn Response,
            _handler: &Handler,
        ) -> Result<bool, BoxError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        }
    }

    #[tokio::test]
    async fn fast_calls_pass_through() {
        let inner = RecordingInterceptor::new("inner").returning(false);
        let bounded = TimeoutInterceptor::new(inner.clone(), Duration::from_secs(5));
        let (request, mut response) = (get("/"), response());

        let proceed = bounded.pre_handle(&request, &mut response, &"h").await.unwrap();

        assert!(!proceed);
        assert_eq!(inner.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_fail_with_timeout_error() {
        let bounded = TimeoutInterceptor::new(Stalling, Duration::from_millis(50));
        let (request, mut response) = (get("/"), response());

        let err = bounded
            .pre_handle(&request, &mut response, &"h")
            .await
            .unwrap_err();

        let timeout = err.downcast_ref::<TimeoutError>().unwrap();
        assert_eq!(timeout.0, Duration::from_millis(50));
    }
}
