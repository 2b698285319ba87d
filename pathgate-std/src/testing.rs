//! Testing utilities for pathgate.
//!
//! This module provides utilities to make testing interceptors, matchers and
//! views easier.
//!
//! # Features
//!
//! - [`RecordingInterceptor`]: A handler interceptor that records every call
//! - [`RecordingWebInterceptor`]: The same for the narrow web-request capability
//! - [`FixedMatcher`]: A path matcher with a canned answer
//! - [`RecordingView`]: A view that records the models it renders
//! - [`get`] / [`response`]: `http` request and response shorthands

use pathgate_core::{
    BoxError, DynError, Handler, HandlerInterceptor, Model, ModelAndView, PathMatcher,
    PatternError, RenderError, Request, Response, View, WebRequestInterceptor,
};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recorded calls
// ============================================================================

/// The lifecycle phase of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the handler.
    PreHandle,
    /// After the handler.
    PostHandle,
    /// After completion.
    AfterCompletion,
}

/// One observed interceptor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Name of the interceptor that recorded the call.
    pub interceptor: String,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Request method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// The handler, if it was a `&'static str` or `String`.
    pub handler: Option<String>,
    /// Sorted model keys seen in post-handle; `None` when there was no model.
    pub model_keys: Option<Vec<String>>,
    /// Error message seen in after-completion.
    pub error: Option<String>,
}

/// A log shared between recorders to observe cross-interceptor ordering.
pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

/// Create an empty shared call log.
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn handler_label(handler: &Handler) -> Option<String> {
    handler
        .downcast_ref::<&'static str>()
        .map(|s| s.to_string())
        .or_else(|| handler.downcast_ref::<String>().cloned())
}

fn sorted_keys(model: &Model) -> Vec<String> {
    let mut keys: Vec<String> = model.iter().map(|(k, _)| k.to_string()).collect();
    keys.sort();
    keys
}

// ============================================================================
// Recording Interceptor
// ============================================================================

/// A handler interceptor that records all calls it receives.
///
/// # Example
///
/// ```rust,ignore
/// let log = call_log();
/// let auth = RecordingInterceptor::with_log("auth", log.clone());
/// let audit = RecordingInterceptor::with_log("audit", log.clone()).returning(false);
///
/// // Register both, dispatch a request...
///
/// let calls = log.lock().unwrap();
/// assert_eq!(calls[0].interceptor, "auth");
/// ```
pub struct RecordingInterceptor {
    name: String,
    log: CallLog,
    pre_handle_result: bool,
    fail_on: Option<Phase>,
}

impl RecordingInterceptor {
    /// Create a recorder with its own log that lets requests through.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_log(name, call_log())
    }

    /// Create a recorder writing into a shared log.
    pub fn with_log(name: impl Into<String>, log: CallLog) -> Self {
        Self {
            name: name.into(),
            log,
            pre_handle_result: true,
            fail_on: None,
        }
    }

    /// Make `pre_handle` return the given value.
    pub fn returning(mut self, pre_handle_result: bool) -> Self {
        self.pre_handle_result = pre_handle_result;
        self
    }

    /// Make the given phase fail after recording the call.
    pub fn failing_on(mut self, phase: Phase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    /// The calls recorded by this interceptor, in order.
    ///
    /// Entries written to a shared log by other recorders are left out; read
    /// [`log`](Self::log) to see every call.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.interceptor == self.name)
            .cloned()
            .collect()
    }

    /// The phases recorded by this interceptor, in order.
    pub fn phases(&self) -> Vec<Phase> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.interceptor == self.name)
            .map(|call| call.phase)
            .collect()
    }

    /// The number of calls recorded by this interceptor.
    pub fn count(&self) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.interceptor == self.name)
            .count()
    }

    /// The underlying log.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn record(
        &self,
        phase: Phase,
        request: &dyn Request,
        handler: &Handler,
        model_keys: Option<Vec<String>>,
        error: Option<String>,
    ) -> Result<(), BoxError> {
        self.log.lock().unwrap().push(RecordedCall {
            interceptor: self.name.clone(),
            phase,
            method: request.method().to_string(),
            path: request.path().to_string(),
            handler: handler_label(handler),
            model_keys,
            error,
        });

        if self.fail_on == Some(phase) {
            return Err(format!("{} failed during {:?}", self.name, phase).into());
        }
        Ok(())
    }
}

impl Clone for RecordingInterceptor {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            log: self.log.clone(),
            pre_handle_result: self.pre_handle_result,
            fail_on: self.fail_on,
        }
    }
}

impl HandlerInterceptor for RecordingInterceptor {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<bool, BoxError> {
        self.record(Phase::PreHandle, request, handler, None, None)?;
        Ok(self.pre_handle_result)
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        let keys = model_and_view.map(|mav| sorted_keys(mav.model()));
        self.record(Phase::PostHandle, request, handler, keys, None)
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        let error = error.map(|e| e.to_string());
        self.record(Phase::AfterCompletion, request, handler, None, error)
    }
}

// ============================================================================
// Recording Web Interceptor
// ============================================================================

/// A web-request interceptor that records its calls and can add a model entry.
pub struct RecordingWebInterceptor {
    name: String,
    log: CallLog,
    model_entry: Option<(String, Value)>,
    fail_on: Option<Phase>,
}

impl RecordingWebInterceptor {
    /// Create a recorder with its own log.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: call_log(),
            model_entry: None,
            fail_on: None,
        }
    }

    /// Insert this entry into the model whenever `post_handle` sees one.
    pub fn with_model_entry(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.model_entry = Some((name.into(), value.into()));
        self
    }

    /// Make the given phase fail after recording the call.
    pub fn failing_on(mut self, phase: Phase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    /// The calls recorded by this interceptor, in order.
    ///
    /// Entries written to a shared log by other recorders are left out; read
    /// [`log`](Self::log) to see every call.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.interceptor == self.name)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        phase: Phase,
        request: &dyn Request,
        model_keys: Option<Vec<String>>,
        error: Option<String>,
    ) -> Result<(), BoxError> {
        self.log.lock().unwrap().push(RecordedCall {
            interceptor: self.name.clone(),
            phase,
            method: request.method().to_string(),
            path: request.path().to_string(),
            handler: None,
            model_keys,
            error,
        });

        if self.fail_on == Some(phase) {
            return Err(format!("{} failed during {:?}", self.name, phase).into());
        }
        Ok(())
    }
}

impl Clone for RecordingWebInterceptor {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            log: self.log.clone(),
            model_entry: self.model_entry.clone(),
            fail_on: self.fail_on,
        }
    }
}

impl WebRequestInterceptor for RecordingWebInterceptor {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
    ) -> Result<(), BoxError> {
        self.record(Phase::PreHandle, request, None, None)
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        model: Option<&mut Model>,
    ) -> Result<(), BoxError> {
        let keys = model.as_deref().map(sorted_keys);
        if let (Some(model), Some((name, value))) = (model, &self.model_entry) {
            model.insert(name.clone(), value.clone());
        }
        self.record(Phase::PostHandle, request, keys, None)
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        let error = error.map(|e| e.to_string());
        self.record(Phase::AfterCompletion, request, None, error)
    }
}

// ============================================================================
// Fixed Matcher
// ============================================================================

/// A path matcher that gives the same answer for every input.
///
/// Counts its invocations so tests can check which matcher was consulted.
pub struct FixedMatcher {
    outcome: Result<bool, PatternError>,
    calls: Arc<AtomicUsize>,
}

impl FixedMatcher {
    /// A matcher that matches everything.
    pub fn matching() -> Self {
        Self::with_outcome(Ok(true))
    }

    /// A matcher that matches nothing.
    pub fn never() -> Self {
        Self::with_outcome(Ok(false))
    }

    /// A matcher that rejects every pattern.
    pub fn failing() -> Self {
        Self::with_outcome(Err(PatternError::Rejected {
            pattern: "*".into(),
            reason: "fixed failure".into(),
        }))
    }

    fn with_outcome(outcome: Result<bool, PatternError>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of `matches` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Clone for FixedMatcher {
    fn clone(&self) -> Self {
        Self {
            outcome: self.outcome.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl PathMatcher for FixedMatcher {
    fn matches(&self, _pattern: &str, _path: &str) -> Result<bool, PatternError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================================
// Recording View
// ============================================================================

/// A view that records every model it renders and writes the entry count.
pub struct RecordingView {
    content_type: Option<String>,
    renders: Arc<Mutex<Vec<Model>>>,
    failure: Option<String>,
}

impl RecordingView {
    /// Create a view with no predetermined content type.
    pub fn new() -> Self {
        Self {
            content_type: None,
            renders: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// Report a predetermined content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Fail every render with the given message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// The models rendered so far; an absent model is recorded as empty.
    pub fn renders(&self) -> Vec<Model> {
        self.renders.lock().unwrap().clone()
    }

    /// Get the number of renders.
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingView {
    fn clone(&self) -> Self {
        Self {
            content_type: self.content_type.clone(),
            renders: self.renders.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl View for RecordingView {
    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn render(
        &self,
        model: Option<&Model>,
        _request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<(), RenderError> {
        let model = model.cloned().unwrap_or_default();
        let entries = model.len();
        self.renders.lock().unwrap().push(model);

        if let Some(message) = &self.failure {
            return Err(RenderError::new(message.clone()));
        }
        response.write_body(entries.to_string().as_bytes());
        Ok(())
    }
}

// ============================================================================
// Exchange shorthands
// ============================================================================

/// A bodiless `GET` request for `uri`.
pub fn get(uri: &str) -> http::Request<()> {
    request("GET", uri)
}

/// A bodiless request with the given method and `uri`.
pub fn request(method: &str, uri: &str) -> http::Request<()> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(())
        .unwrap()
}

/// An empty `200 OK` response with a buffered body.
pub fn response() -> http::Response<Vec<u8>> {
    http::Response::new(Vec::new())
}
