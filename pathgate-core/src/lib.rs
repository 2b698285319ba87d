//! # pathgate-core
//!
//! Core traits for the pathgate request interception framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! interceptor, matcher and view implementations that don't need the full
//! `pathgate-std` machinery.
//!
//! # Capabilities
//!
//! ## Exchange ([`Request`], [`Response`])
//!
//! The narrow view of an HTTP exchange that interceptors and views work
//! against. The transport owns the real request; pathgate only reads its
//! method, path and attributes, and writes status, content type and body.
//!
//! ## Interception ([`HandlerInterceptor`])
//!
//! Cross-cutting hooks around handler execution:
//!
//! - **pre-handle**: runs before the handler, may short-circuit the request
//! - **post-handle**: runs after the handler succeeded, before rendering
//! - **after-completion**: runs after rendering, also on failure paths
//!
//! [`WebRequestInterceptor`] is a narrower variant that only observes the
//! request, the response and the model.
//!
//! ## Matching ([`PathMatcher`])
//!
//! Decides whether a lookup path matches a pattern. The framework only needs
//! an existential yes/no answer and is agnostic to the pattern syntax.
//!
//! ## Rendering ([`View`], [`ViewResolver`])
//!
//! Stateless renderers that turn a [`Model`] into response content.
//!
//! # Error Types
//!
//! - [`PathgateError`] - Top-level error type for dispatch
//! - [`PatternError`] - Malformed or unmatched patterns
//! - [`RenderError`] - View rendering failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod exchange;
mod interceptor;
mod matcher;
mod model;
mod view;

// Re-exports
pub use error::{BoxError, DynError, PathgateError, PatternError, RenderError};
pub use exchange::{Attributes, Handler, Request, Response};
pub use interceptor::{DynHandlerInterceptor, HandlerInterceptor, WebRequestInterceptor};
pub use matcher::PathMatcher;
pub use model::{Model, ModelAndView, ViewRef};
pub use view::{
    PATH_VARIABLES, RESPONSE_STATUS_ATTRIBUTE, SELECTED_CONTENT_TYPE, View, ViewResolver,
};
