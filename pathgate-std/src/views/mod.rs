//! Standard views and view resolution.

pub mod json;
pub mod registry;

pub use json::JsonView;
pub use registry::{ViewRegistry, ViewRegistryBuilder};

use pathgate_core::{Model, PATH_VARIABLES, Request};

/// Build the model a view actually renders.
///
/// Sources are merged in order, later ones winning on clashes:
/// the view's static attributes, the request's path variables, then the
/// handler's model.
pub fn merge_output_model(
    static_attributes: &Model,
    request: &dyn Request,
    model: Option<&Model>,
) -> Model {
    let mut merged = static_attributes.clone();

    if let Some(variables) = request
        .attribute(PATH_VARIABLES)
        .and_then(|value| value.as_object())
    {
        for (name, value) in variables {
            merged.insert(name.clone(), value.clone());
        }
    }

    if let Some(model) = model {
        merged.merge(model);
    }
    merged
}
