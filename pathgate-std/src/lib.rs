//! # pathgate-std
//!
//! Standard implementations for the pathgate interception framework.
//!
//! This crate provides:
//! - **Path scoping**: [`MappedInterceptor`], [`MappedInterceptorBuilder`]
//! - **Matchers**: [`AntPathMatcher`], `MatchitPathMatcher` (feature `matchit`)
//! - **Dispatch**: [`InterceptorRegistry`], [`HandlerExecutionChain`], [`Dispatcher`]
//! - **Lookup paths**: [`UrlPathHelper`]
//! - **Views**: [`ViewRegistry`], [`JsonView`]
//! - **Standard interceptors**: Logging, Timeout, the web-request adapter

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use pathgate_core;

// Modules
pub mod chain;
pub mod dispatcher;
pub mod interceptors;
pub mod lookup;
pub mod mapped;
pub mod matcher;
pub mod registry;
pub mod testing;
pub mod views;

pub use chain::HandlerExecutionChain;
pub use dispatcher::{Dispatcher, RequestHandler};
pub use interceptors::{LoggingInterceptor, WebRequestHandlerInterceptorAdapter};
pub use lookup::UrlPathHelper;
pub use mapped::{MappedInterceptor, MappedInterceptorBuilder};
pub use matcher::AntPathMatcher;
pub use registry::{InterceptorRegistry, InterceptorRegistryBuilder};
pub use views::{JsonView, ViewRegistry, ViewRegistryBuilder};

#[cfg(feature = "matchit")]
pub use matcher::MatchitPathMatcher;

#[cfg(feature = "timeout")]
pub use interceptors::{TimeoutError, TimeoutInterceptor};
