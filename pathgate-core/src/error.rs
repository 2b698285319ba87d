//! Error types for pathgate.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`PathgateError`] - Top-level error type for a dispatched request
//! - [`PatternError`] - Errors raised by a [`PathMatcher`] at match time
//! - [`RenderError`] - Errors raised by a [`View`]
//!
//! [`PathMatcher`]: crate::PathMatcher
//! [`View`]: crate::View

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A borrowed, thread-safe error, as handed to after-completion hooks.
pub type DynError = dyn std::error::Error + Send + Sync + 'static;

/// Top-level error type for a dispatched request.
#[derive(Error, Debug)]
pub enum PathgateError {
    /// A mapping pattern could not be evaluated.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// An interceptor failed during pre-handle or post-handle.
    #[error("interceptor error")]
    Interceptor(#[source] BoxError),

    /// The request handler failed.
    #[error("handler error")]
    Handler(#[source] BoxError),

    /// The selected view failed to render.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The handler named a view that no resolver knows about.
    #[error("could not resolve view with name `{0}`")]
    UnresolvedView(String),
}

/// Errors raised while evaluating a pattern against a path.
///
/// Patterns are not validated when an interceptor is mapped; these surface on
/// the first request that reaches the offending pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{` was opened and never closed.
    #[error("unclosed URI template variable in pattern `{0}`")]
    UnclosedVariable(String),

    /// The regular expression of a `{name:regex}` variable did not compile.
    #[error("invalid regular expression in pattern `{pattern}`: {reason}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// The matcher refused the pattern.
    #[error("pattern `{pattern}` rejected: {reason}")]
    Rejected {
        /// The offending pattern.
        pattern: String,
        /// Matcher diagnostic.
        reason: String,
    },

    /// Variables were requested from a path the pattern does not match.
    #[error("path `{path}` does not match pattern `{pattern}`")]
    NoMatch {
        /// The pattern.
        pattern: String,
        /// The path.
        path: String,
    },
}

/// A view failed to render.
///
/// No sub-kinds are distinguished here; concrete views attach the cause.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RenderError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl RenderError {
    /// Create a render error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a render error caused by another error.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
