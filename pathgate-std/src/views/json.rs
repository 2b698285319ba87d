//! JSON view.

use super::merge_output_model;
use http::StatusCode;
use pathgate_core::{
    Model, RESPONSE_STATUS_ATTRIBUTE, RenderError, Request, Response, SELECTED_CONTENT_TYPE, View,
};
use serde_json::Value;

/// Renders the model as a JSON document.
///
/// Rendering first merges static attributes, path variables and the model
/// (see [`merge_output_model`]), then:
///
/// - keeps only the configured model keys, if any,
/// - writes a single remaining value bare when `extract_single_key` is set,
/// - sets the status from [`RESPONSE_STATUS_ATTRIBUTE`],
/// - prefers [`SELECTED_CONTENT_TYPE`] over its own content type.
///
/// # Example
///
/// ```rust
/// use pathgate_core::{Model, View};
/// use pathgate_std::JsonView;
///
/// let view = JsonView::new().with_model_keys(["user"]).with_extract_single_key(true);
/// let request = http::Request::get("/me").body(()).unwrap();
/// let mut response = http::Response::new(Vec::<u8>::new());
/// let model = Model::new().with("user", "ann").with("csrf", "t0k3n");
///
/// view.render(Some(&model), &request, &mut response).unwrap();
/// assert_eq!(response.body(), br#""ann""#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonView {
    content_type: String,
    static_attributes: Model,
    model_keys: Option<Vec<String>>,
    extract_single_key: bool,
    pretty: bool,
}

impl Default for JsonView {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonView {
    /// The default content type.
    pub const DEFAULT_CONTENT_TYPE: &'static str = "application/json";

    /// Create a view that writes the whole model as a compact JSON object.
    pub fn new() -> Self {
        Self {
            content_type: Self::DEFAULT_CONTENT_TYPE.to_string(),
            static_attributes: Model::new(),
            model_keys: None,
            extract_single_key: false,
            pretty: false,
        }
    }

    /// Override the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add an attribute rendered on every request.
    pub fn with_static_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.static_attributes.insert(name, value);
        self
    }

    /// Render only these model keys.
    pub fn with_model_keys<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.model_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Write a lone remaining value without its enclosing object.
    pub fn with_extract_single_key(mut self, extract: bool) -> Self {
        self.extract_single_key = extract;
        self
    }

    /// Pretty-print the output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn filter_model(&self, mut model: Model) -> Model {
        match &self.model_keys {
            Some(keys) => keys
                .iter()
                .filter_map(|key| model.remove(key).map(|value| (key.clone(), value)))
                .collect(),
            None => model,
        }
    }

    fn to_json(&self, model: Model) -> Value {
        if self.extract_single_key && model.len() == 1 {
            if let Some((_, value)) = model.into_iter().next() {
                return value;
            }
            return Value::Null;
        }
        model.into_json()
    }
}

impl View for JsonView {
    fn content_type(&self) -> Option<&str> {
        Some(&self.content_type)
    }

    fn render(
        &self,
        model: Option<&Model>,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<(), RenderError> {
        // Status and body are prepared before the response changes.
        let status = request
            .attribute(RESPONSE_STATUS_ATTRIBUTE)
            .map(|status| {
                status
                    .as_u64()
                    .and_then(|code| u16::try_from(code).ok())
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .ok_or_else(|| RenderError::new(format!("invalid response status {status}")))
            })
            .transpose()?;
        let content_type = request
            .attribute(SELECTED_CONTENT_TYPE)
            .and_then(Value::as_str)
            .unwrap_or(&self.content_type);

        let merged = merge_output_model(&self.static_attributes, request, model);
        let document = self.to_json(self.filter_model(merged));
        let body = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|e| RenderError::with_source("cannot serialize model", e))?;

        response
            .set_content_type(content_type)
            .map_err(|e| RenderError::with_source("cannot set content type", e))?;
        if let Some(status) = status {
            response.set_status(status);
        }
        response.write_body(&body);
        Ok(())
    }
}
