//! The narrow view of an HTTP exchange.
//!
//! The transport layer owns the actual request and response. Interceptors and
//! views only see these traits, so pathgate stays independent of any server.
//! Implementations are provided for the `http` crate's types: request
//! attributes live in an [`Attributes`] extension, and responses buffer their
//! body in a `Vec<u8>`.

use crate::error::BoxError;
use http::{HeaderValue, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use std::{any::Any, collections::HashMap};

/// The handler selected for a request, passed opaquely to interceptors.
///
/// Interceptors that care about the concrete handler type can
/// `downcast_ref` it; the framework itself never inspects it.
pub type Handler = dyn Any + Send + Sync;

/// Read access to the current request.
pub trait Request: Send + Sync {
    /// The request method, e.g. `"GET"`.
    fn method(&self) -> &str;

    /// The raw request path, without scheme or authority.
    fn path(&self) -> &str;

    /// A request-scoped attribute set by the dispatch layer.
    ///
    /// See [`RESPONSE_STATUS_ATTRIBUTE`], [`PATH_VARIABLES`] and
    /// [`SELECTED_CONTENT_TYPE`] for the reserved keys.
    ///
    /// [`RESPONSE_STATUS_ATTRIBUTE`]: crate::RESPONSE_STATUS_ATTRIBUTE
    /// [`PATH_VARIABLES`]: crate::PATH_VARIABLES
    /// [`SELECTED_CONTENT_TYPE`]: crate::SELECTED_CONTENT_TYPE
    fn attribute(&self, name: &str) -> Option<&Value>;
}

/// Write access to the response being built.
pub trait Response: Send {
    /// The current status.
    fn status(&self) -> StatusCode;

    /// Replace the status.
    fn set_status(&mut self, status: StatusCode);

    /// The current `Content-Type`, if set and valid UTF-8.
    fn content_type(&self) -> Option<&str>;

    /// Set the `Content-Type`.
    ///
    /// Fails if the value is not a legal header value.
    fn set_content_type(&mut self, content_type: &str) -> Result<(), BoxError>;

    /// Append bytes to the response body.
    fn write_body(&mut self, chunk: &[u8]);
}

/// Request-scoped attributes, stored as an `http` request extension.
///
/// # Example
///
/// ```rust
/// use pathgate_core::{Attributes, PATH_VARIABLES, Request};
/// use serde_json::json;
///
/// let mut request = http::Request::get("/hotels/7").body(()).unwrap();
/// request
///     .extensions_mut()
///     .insert(Attributes::new().with(PATH_VARIABLES, json!({ "hotel": "7" })));
///
/// assert_eq!(request.attribute(PATH_VARIABLES), Some(&json!({ "hotel": "7" })));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: HashMap<String, Value>,
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<B: Send + Sync + 'static> Request for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.extensions().get::<Attributes>()?.get(name)
    }
}

impl Response for http::Response<Vec<u8>> {
    fn status(&self) -> StatusCode {
        http::Response::status(self)
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn content_type(&self) -> Option<&str> {
        self.headers().get(CONTENT_TYPE)?.to_str().ok()
    }

    fn set_content_type(&mut self, content_type: &str) -> Result<(), BoxError> {
        let value = HeaderValue::from_str(content_type)?;
        self.headers_mut().insert(CONTENT_TYPE, value);
        Ok(())
    }

    fn write_body(&mut self, chunk: &[u8]) {
        self.body_mut().extend_from_slice(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_request_exposes_method_path_and_attributes() {
        let mut request = http::Request::post("/orders/9?expand=items").body(()).unwrap();
        request
            .extensions_mut()
            .insert(Attributes::new().with("tenant", "acme"));

        let request: &dyn Request = &request;
        assert_eq!(request.method(), "POST");
        assert_eq!(request.path(), "/orders/9");
        assert_eq!(request.attribute("tenant"), Some(&json!("acme")));
        assert_eq!(request.attribute("missing"), None);
    }

    #[test]
    fn http_request_without_attributes() {
        let request = http::Request::get("/").body(()).unwrap();
        assert_eq!(Request::attribute(&request, "anything"), None);
    }

    #[test]
    fn http_response_collects_status_type_and_body() {
        let mut response = http::Response::new(Vec::<u8>::new());
        {
            let response: &mut dyn Response = &mut response;
            response.set_status(StatusCode::CREATED);
            response.set_content_type("text/plain; charset=utf-8").unwrap();
            response.write_body(b"hello ");
            response.write_body(b"world");
            assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
        }

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body(), b"hello world");
    }

    #[test]
    fn http_response_rejects_illegal_content_type() {
        let mut response = http::Response::new(Vec::<u8>::new());
        assert!(Response::set_content_type(&mut response, "text/plain\n").is_err());
    }
}
