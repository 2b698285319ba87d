//! Registry of path-scoped interceptors.

use crate::{chain::HandlerExecutionChain, mapped::MappedInterceptor, matcher::AntPathMatcher};
use pathgate_core::{DynHandlerInterceptor, HandlerInterceptor, PathMatcher, PatternError};
use std::{fmt, sync::Arc};

/// An immutable, ordered set of [`MappedInterceptor`]s sharing a default
/// path matcher.
///
/// Built once through [`InterceptorRegistryBuilder`] and then shared by every
/// request.
pub struct InterceptorRegistry {
    interceptors: Vec<Arc<MappedInterceptor>>,
    path_matcher: Arc<dyn PathMatcher>,
}

impl InterceptorRegistry {
    /// Start building a registry.
    pub fn builder() -> InterceptorRegistryBuilder {
        InterceptorRegistryBuilder::new()
    }

    /// Every registered interceptor, in registration order.
    pub fn interceptors(&self) -> &[Arc<MappedInterceptor>] {
        &self.interceptors
    }

    /// The default matcher passed to [`MappedInterceptor::matches`].
    pub fn path_matcher(&self) -> &Arc<dyn PathMatcher> {
        &self.path_matcher
    }

    /// The interceptors that apply to `lookup_path`, in registration order.
    pub fn matching(&self, lookup_path: &str) -> Result<Vec<Arc<MappedInterceptor>>, PatternError> {
        let mut matched = Vec::new();
        for interceptor in &self.interceptors {
            if interceptor.matches(lookup_path, self.path_matcher.as_ref())? {
                matched.push(interceptor.clone());
            }
        }

        #[cfg(feature = "tracing")]
        {
            tracing::trace!(
                lookup_path,
                matched = matched.len(),
                registered = self.interceptors.len(),
                "selected interceptors"
            );
        }

        Ok(matched)
    }

    /// A fresh execution chain over the interceptors that apply to
    /// `lookup_path`.
    pub fn chain_for(&self, lookup_path: &str) -> Result<HandlerExecutionChain, PatternError> {
        let interceptors = self
            .matching(lookup_path)?
            .into_iter()
            .map(|mapped| mapped as Arc<dyn DynHandlerInterceptor>)
            .collect();
        Ok(HandlerExecutionChain::new(interceptors))
    }

    /// Number of registered interceptors.
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        InterceptorRegistryBuilder::new().build()
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing an [`InterceptorRegistry`].
pub struct InterceptorRegistryBuilder {
    interceptors: Vec<Arc<MappedInterceptor>>,
    path_matcher: Option<Arc<dyn PathMatcher>>,
}

impl Default for InterceptorRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorRegistryBuilder {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
            path_matcher: None,
        }
    }

    /// Register a path-scoped interceptor.
    pub fn register(mut self, interceptor: MappedInterceptor) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Register an interceptor that applies to every path.
    pub fn register_global<I: HandlerInterceptor>(self, interceptor: I) -> Self {
        self.register(MappedInterceptor::new(None, interceptor))
    }

    /// Set the default path matcher. Defaults to [`AntPathMatcher`].
    pub fn path_matcher(mut self, path_matcher: Arc<dyn PathMatcher>) -> Self {
        self.path_matcher = Some(path_matcher);
        self
    }

    /// Build the registry.
    pub fn build(self) -> InterceptorRegistry {
        InterceptorRegistry {
            interceptors: self.interceptors,
            path_matcher: self
                .path_matcher
                .unwrap_or_else(|| Arc::new(AntPathMatcher::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedMatcher, RecordingInterceptor};

    fn names(registry: &InterceptorRegistry, path: &str) -> Vec<String> {
        registry
            .matching(path)
            .unwrap()
            .iter()
            .map(|m| m.include_patterns().map(|p| p.join(",")).unwrap_or_default())
            .collect()
    }

    #[test]
    fn matching_keeps_registration_order() {
        let registry = InterceptorRegistry::builder()
            .register(
                MappedInterceptor::builder(RecordingInterceptor::new("b"))
                    .include(["/b/**"])
                    .build(),
            )
            .register(
                MappedInterceptor::builder(RecordingInterceptor::new("a"))
                    .include(["/**"])
                    .build(),
            )
            .build();

        assert_eq!(names(&registry, "/b/c"), vec!["/b/**", "/**"]);
        assert_eq!(names(&registry, "/a"), vec!["/**"]);
    }

    #[test]
    fn global_interceptors_match_everything() {
        let registry = InterceptorRegistry::builder()
            .register_global(RecordingInterceptor::new("g"))
            .build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.matching("/anything/at/all").unwrap().len(), 1);
    }

    #[test]
    fn default_matcher_is_used() {
        let matcher = FixedMatcher::never();
        let registry = InterceptorRegistry::builder()
            .register(MappedInterceptor::new(
                Some(vec!["/**".into()]),
                RecordingInterceptor::new("x"),
            ))
            .path_matcher(Arc::new(matcher.clone()))
            .build();

        assert!(registry.matching("/x").unwrap().is_empty());
        assert_eq!(matcher.calls(), 1);
    }

    #[test]
    fn pattern_errors_propagate() {
        let registry = InterceptorRegistry::builder()
            .register(MappedInterceptor::new(
                Some(vec!["/{broken".into()]),
                RecordingInterceptor::new("x"),
            ))
            .build();

        assert!(registry.matching("/x").is_err());
        assert!(registry.chain_for("/x").is_err());
    }

    #[test]
    fn chain_for_wraps_matches() {
        let registry = InterceptorRegistry::builder()
            .register_global(RecordingInterceptor::new("a"))
            .register(
                MappedInterceptor::builder(RecordingInterceptor::new("b"))
                    .exclude(["/skip"])
                    .build(),
            )
            .build();

        assert_eq!(registry.chain_for("/go").unwrap().len(), 2);
        assert_eq!(registry.chain_for("/skip").unwrap().len(), 1);
        assert!(InterceptorRegistry::default().is_empty());
    }
}
