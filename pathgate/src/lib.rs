//! # pathgate - Path-Scoped Request Interception
//!
//! `pathgate` binds cross-cutting request interceptors to URL path patterns
//! and renders handler results through pluggable views.
//!
//! An interceptor is wrapped in a [`MappedInterceptor`] with optional include
//! and exclude patterns. For every request the [`Dispatcher`] computes a
//! lookup path, selects the interceptors whose patterns match, and drives
//! their lifecycle around the handler:
//!
//! ```text
//! pre_handle (in order) -> handler -> post_handle (reverse) -> render -> after_completion (reverse)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pathgate::prelude::*;
//!
//! struct Audit;
//!
//! impl HandlerInterceptor for Audit {
//!     async fn pre_handle(
//!         &self,
//!         request: &dyn Request,
//!         _response: &mut dyn Response,
//!         _handler: &Handler,
//!     ) -> Result<bool, BoxError> {
//!         Ok(request.method() != "DELETE")
//!     }
//! }
//!
//! let registry = InterceptorRegistry::builder()
//!     .register(
//!         MappedInterceptor::builder(Audit)
//!             .include(["/admin/**"])
//!             .exclude(["/admin/login"])
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(registry.matching("/admin/users").unwrap().len(), 1);
//! assert!(registry.matching("/admin/login").unwrap().is_empty());
//! ```
//!
//! ## Features
//!
//! - `tracing`: structured logging through the `tracing` crate
//! - `matchit`: `MatchitPathMatcher` for route-style patterns
//! - `timeout`: `TimeoutInterceptor`, bounding interceptor calls with tokio timers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use pathgate_core::{
    // Exchange
    Attributes,
    // Error types
    BoxError,
    // Interception
    DynError,
    DynHandlerInterceptor,
    Handler,
    HandlerInterceptor,
    // Model
    Model,
    ModelAndView,
    // Rendering
    PATH_VARIABLES,
    // Matching
    PathMatcher,
    PathgateError,
    PatternError,
    RESPONSE_STATUS_ATTRIBUTE,
    RenderError,
    Request,
    Response,
    SELECTED_CONTENT_TYPE,
    View,
    ViewRef,
    ViewResolver,
    WebRequestInterceptor,
};

pub use pathgate_std::{
    AntPathMatcher, Dispatcher, HandlerExecutionChain, InterceptorRegistry,
    InterceptorRegistryBuilder, JsonView, LoggingInterceptor, MappedInterceptor,
    MappedInterceptorBuilder, RequestHandler, UrlPathHelper, ViewRegistry, ViewRegistryBuilder,
    WebRequestHandlerInterceptorAdapter,
};

/// Path matchers.
pub mod matcher {
    #![allow(clippy::wildcard_imports)]
    pub use pathgate_std::matcher::*;
}

/// Standard interceptor implementations.
pub mod interceptors {
    #![allow(clippy::wildcard_imports)]
    pub use pathgate_std::interceptors::*;
}

/// Standard views.
pub mod views {
    #![allow(clippy::wildcard_imports)]
    pub use pathgate_std::views::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use pathgate_std::testing::*;
}

/// Prelude module - common imports for pathgate.
///
/// # Usage
///
/// ```rust
/// use pathgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Matching
        AntPathMatcher,
        // Errors
        BoxError,
        // Dispatch
        Dispatcher,
        // Core traits
        Handler,
        HandlerInterceptor,
        InterceptorRegistry,
        MappedInterceptor,
        Model,
        ModelAndView,
        PathMatcher,
        PathgateError,
        Request,
        RequestHandler,
        Response,
        View,
        ViewResolver,
        WebRequestInterceptor,
    };
}
