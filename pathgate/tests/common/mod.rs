#![allow(dead_code)]

use pathgate::{
    Attributes, BoxError, Dispatcher, InterceptorRegistry, ModelAndView, PATH_VARIABLES, Request,
    RequestHandler, Response,
};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Handlers
// ============================================================================

/// Selects the named view and puts the request path into the model.
pub struct PathEchoHandler {
    pub view_name: String,
    pub call_count: Arc<AtomicUsize>,
}

impl PathEchoHandler {
    pub fn new(view_name: &str) -> Self {
        Self {
            view_name: view_name.to_string(),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

impl RequestHandler for PathEchoHandler {
    async fn handle(
        &self,
        request: &dyn Request,
        _response: &mut dyn Response,
    ) -> Result<Option<ModelAndView>, BoxError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(Some(
            ModelAndView::with_view_name(self.view_name.clone())
                .with_object("path", request.path()),
        ))
    }
}

/// Writes the body itself and selects no view.
pub struct DirectWriteHandler;

impl RequestHandler for DirectWriteHandler {
    async fn handle(
        &self,
        _request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<Option<ModelAndView>, BoxError> {
        response.write_body(b"direct");
        Ok(None)
    }
}

// ============================================================================
// Exchange helpers
// ============================================================================

pub fn request(method: &str, uri: &str) -> http::Request<()> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(())
        .unwrap()
}

pub fn request_with_path_variables(uri: &str, variables: Value) -> http::Request<()> {
    let mut request = request("GET", uri);
    request
        .extensions_mut()
        .insert(Attributes::new().with(PATH_VARIABLES, variables));
    request
}

pub fn response() -> http::Response<Vec<u8>> {
    http::Response::new(Vec::new())
}

pub fn body_json(response: &http::Response<Vec<u8>>) -> Value {
    serde_json::from_slice(response.body()).unwrap_or_else(|_| json!(null))
}

pub async fn dispatch<H: RequestHandler>(
    dispatcher: &Dispatcher<H>,
    method: &str,
    uri: &str,
) -> (Result<(), pathgate::PathgateError>, http::Response<Vec<u8>>) {
    let request = request(method, uri);
    let mut response = response();
    let result = dispatcher.dispatch(&request, &mut response).await;
    (result, response)
}

pub fn empty_registry() -> InterceptorRegistry {
    InterceptorRegistry::builder().build()
}
