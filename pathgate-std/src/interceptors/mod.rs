//! Standard interceptors.

pub mod adapter;
pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;

pub use adapter::WebRequestHandlerInterceptorAdapter;
pub use logging::LoggingInterceptor;
#[cfg(feature = "timeout")]
pub use timeout::{TimeoutError, TimeoutInterceptor};
