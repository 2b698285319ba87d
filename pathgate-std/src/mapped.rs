//! Path-scoped interceptors.
//!
//! A [`MappedInterceptor`] binds one interceptor to optional include and
//! exclude path patterns. The dispatch layer asks [`MappedInterceptor::matches`]
//! for each request and only drives the lifecycle of interceptors that apply.
//!
//! # Matching
//!
//! 1. If any exclude pattern matches, the interceptor does not apply.
//! 2. Otherwise, with no include patterns it applies to every path.
//! 3. Otherwise it applies if any include pattern matches.
//!
//! Pattern order never changes the outcome.
//!
//! # Example
//!
//! ```rust
//! use pathgate_std::{AntPathMatcher, LoggingInterceptor, MappedInterceptor};
//!
//! let mapped = MappedInterceptor::builder(LoggingInterceptor::default())
//!     .include(["/api/**"])
//!     .exclude(["/api/health"])
//!     .build();
//!
//! let matcher = AntPathMatcher::new();
//! assert!(mapped.matches("/api/users/7", &matcher).unwrap());
//! assert!(!mapped.matches("/api/health", &matcher).unwrap());
//! assert!(!mapped.matches("/static/app.js", &matcher).unwrap());
//! ```

use crate::interceptors::WebRequestHandlerInterceptorAdapter;
use pathgate_core::{
    BoxError, DynError, DynHandlerInterceptor, Handler, HandlerInterceptor, ModelAndView,
    PathMatcher, PatternError, Request, Response, WebRequestInterceptor,
};
use std::{fmt, sync::Arc};

/// An interceptor bound to include and exclude path patterns.
///
/// Absent include patterns match every path; absent exclude patterns exclude
/// nothing. Patterns are not validated until [`matches`](Self::matches) runs.
///
/// The lifecycle methods delegate to the wrapped interceptor unconditionally.
pub struct MappedInterceptor {
    include_patterns: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    interceptor: Arc<dyn DynHandlerInterceptor>,
    path_matcher: Option<Arc<dyn PathMatcher>>,
}

impl MappedInterceptor {
    /// Bind `interceptor` to the given include patterns.
    pub fn new<I: HandlerInterceptor>(include_patterns: Option<Vec<String>>, interceptor: I) -> Self {
        Self::with_excludes(include_patterns, None, interceptor)
    }

    /// Bind `interceptor` to the given include and exclude patterns.
    pub fn with_excludes<I: HandlerInterceptor>(
        include_patterns: Option<Vec<String>>,
        exclude_patterns: Option<Vec<String>>,
        interceptor: I,
    ) -> Self {
        Self::from_shared(include_patterns, exclude_patterns, Arc::new(interceptor))
    }

    /// Bind an already shared interceptor.
    pub fn from_shared(
        include_patterns: Option<Vec<String>>,
        exclude_patterns: Option<Vec<String>>,
        interceptor: Arc<dyn DynHandlerInterceptor>,
    ) -> Self {
        Self {
            include_patterns,
            exclude_patterns,
            interceptor,
            path_matcher: None,
        }
    }

    /// Bind a web-request interceptor, widened through
    /// [`WebRequestHandlerInterceptorAdapter`].
    pub fn for_web_request<W: WebRequestInterceptor>(
        include_patterns: Option<Vec<String>>,
        interceptor: W,
    ) -> Self {
        Self::for_web_request_with_excludes(include_patterns, None, interceptor)
    }

    /// Bind a web-request interceptor with include and exclude patterns.
    pub fn for_web_request_with_excludes<W: WebRequestInterceptor>(
        include_patterns: Option<Vec<String>>,
        exclude_patterns: Option<Vec<String>>,
        interceptor: W,
    ) -> Self {
        Self::with_excludes(
            include_patterns,
            exclude_patterns,
            WebRequestHandlerInterceptorAdapter::new(interceptor),
        )
    }

    /// Start building a mapped interceptor.
    pub fn builder<I: HandlerInterceptor>(interceptor: I) -> MappedInterceptorBuilder {
        MappedInterceptorBuilder::new(Arc::new(interceptor))
    }

    /// Use `path_matcher` instead of the caller's default in every later
    /// [`matches`](Self::matches) call.
    pub fn set_path_matcher(&mut self, path_matcher: Arc<dyn PathMatcher>) {
        self.path_matcher = Some(path_matcher);
    }

    /// Builder-style [`set_path_matcher`](Self::set_path_matcher).
    pub fn with_path_matcher(mut self, path_matcher: Arc<dyn PathMatcher>) -> Self {
        self.set_path_matcher(path_matcher);
        self
    }

    /// The override matcher, if one was set.
    pub fn path_matcher(&self) -> Option<&Arc<dyn PathMatcher>> {
        self.path_matcher.as_ref()
    }

    /// The include patterns as configured.
    pub fn include_patterns(&self) -> Option<&[String]> {
        self.include_patterns.as_deref()
    }

    /// The exclude patterns as configured.
    pub fn exclude_patterns(&self) -> Option<&[String]> {
        self.exclude_patterns.as_deref()
    }

    /// The wrapped interceptor.
    pub fn interceptor(&self) -> &Arc<dyn DynHandlerInterceptor> {
        &self.interceptor
    }

    /// Whether the interceptor applies to `lookup_path`.
    ///
    /// Uses the override matcher if set, otherwise `default_matcher`.
    /// Matcher errors propagate unchanged.
    pub fn matches(
        &self,
        lookup_path: &str,
        default_matcher: &dyn PathMatcher,
    ) -> Result<bool, PatternError> {
        let matcher = self.path_matcher.as_deref().unwrap_or(default_matcher);

        if let Some(excludes) = &self.exclude_patterns {
            for pattern in excludes {
                if matcher.matches(pattern, lookup_path)? {
                    return Ok(false);
                }
            }
        }

        let Some(includes) = &self.include_patterns else {
            return Ok(true);
        };
        for pattern in includes {
            if matcher.matches(pattern, lookup_path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl HandlerInterceptor for MappedInterceptor {
    async fn pre_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
    ) -> Result<bool, BoxError> {
        (*self.interceptor)
            .pre_handle_dyn(request, response, handler)
            .await
    }

    async fn post_handle(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        model_and_view: Option<&mut ModelAndView>,
    ) -> Result<(), BoxError> {
        (*self.interceptor)
            .post_handle_dyn(request, response, handler, model_and_view)
            .await
    }

    async fn after_completion(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
        handler: &Handler,
        error: Option<&DynError>,
    ) -> Result<(), BoxError> {
        (*self.interceptor)
            .after_completion_dyn(request, response, handler, error)
            .await
    }
}

impl fmt::Debug for MappedInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedInterceptor")
            .field("include_patterns", &self.include_patterns)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("path_matcher", &self.path_matcher.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`MappedInterceptor`].
///
/// Calling [`include`](Self::include) or [`exclude`](Self::exclude) more than
/// once appends to the list.
pub struct MappedInterceptorBuilder {
    interceptor: Arc<dyn DynHandlerInterceptor>,
    include_patterns: Option<Vec<String>>,
    exclude_patterns: Option<Vec<String>>,
    path_matcher: Option<Arc<dyn PathMatcher>>,
}

impl MappedInterceptorBuilder {
    /// Create a builder for a shared interceptor.
    pub fn new(interceptor: Arc<dyn DynHandlerInterceptor>) -> Self {
        Self {
            interceptor,
            include_patterns: None,
            exclude_patterns: None,
            path_matcher: None,
        }
    }

    /// Add include patterns.
    pub fn include<P: Into<String>>(mut self, patterns: impl IntoIterator<Item = P>) -> Self {
        self.include_patterns
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add exclude patterns.
    pub fn exclude<P: Into<String>>(mut self, patterns: impl IntoIterator<Item = P>) -> Self {
        self.exclude_patterns
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Set the override matcher.
    pub fn path_matcher(mut self, path_matcher: Arc<dyn PathMatcher>) -> Self {
        self.path_matcher = Some(path_matcher);
        self
    }

    /// Build the mapped interceptor.
    pub fn build(self) -> MappedInterceptor {
        MappedInterceptor {
            include_patterns: self.include_patterns,
            exclude_patterns: self.exclude_patterns,
            interceptor: self.interceptor,
            path_matcher: self.path_matcher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matcher::AntPathMatcher,
        testing::{FixedMatcher, Phase, RecordingInterceptor, RecordingWebInterceptor, get, response},
    };

    fn patterns(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn no_patterns_match_everything() {
        let mapped = MappedInterceptor::new(None, RecordingInterceptor::new("all"));
        let matcher = AntPathMatcher::new();

        for path in ["/", "/a", "/a/b/c", "/static/app.js", ""] {
            assert!(mapped.matches(path, &matcher).unwrap(), "{path}");
        }
    }

    #[test]
    fn include_only() {
        let mapped =
            MappedInterceptor::new(patterns(&["/api/**"]), RecordingInterceptor::new("api"));
        let matcher = AntPathMatcher::new();

        assert!(mapped.matches("/api/v1/users", &matcher).unwrap());
        assert!(mapped.matches("/api", &matcher).unwrap());
        assert!(!mapped.matches("/static/x", &matcher).unwrap());
    }

    #[test]
    fn exclude_dominates_include() {
        let mapped = MappedInterceptor::with_excludes(
            patterns(&["/**"]),
            patterns(&["/admin/**"]),
            RecordingInterceptor::new("site"),
        );
        let matcher = AntPathMatcher::new();

        assert!(!mapped.matches("/admin/x", &matcher).unwrap());
        assert!(mapped.matches("/public/x", &matcher).unwrap());
    }

    #[test]
    fn exclude_only_matches_the_rest() {
        let mapped = MappedInterceptor::with_excludes(
            None,
            patterns(&["/health", "/metrics"]),
            RecordingInterceptor::new("auth"),
        );
        let matcher = AntPathMatcher::new();

        assert!(!mapped.matches("/metrics", &matcher).unwrap());
        assert!(mapped.matches("/orders", &matcher).unwrap());
    }

    #[test]
    fn empty_include_list_matches_nothing() {
        let mapped = MappedInterceptor::new(Some(Vec::new()), RecordingInterceptor::new("none"));
        assert!(!mapped.matches("/any", &AntPathMatcher::new()).unwrap());
    }

    #[test]
    fn include_order_does_not_matter() {
        let matcher = AntPathMatcher::new();
        let forward = MappedInterceptor::new(
            patterns(&["/a/**", "/b/*"]),
            RecordingInterceptor::new("f"),
        );
        let backward = MappedInterceptor::new(
            patterns(&["/b/*", "/a/**"]),
            RecordingInterceptor::new("b"),
        );

        for path in ["/a/x/y", "/b/z", "/c", "/b/z/w"] {
            assert_eq!(
                forward.matches(path, &matcher).unwrap(),
                backward.matches(path, &matcher).unwrap(),
                "{path}"
            );
        }
    }

    #[test]
    fn override_matcher_ignores_default() {
        let never = FixedMatcher::never();
        let always = FixedMatcher::matching();
        let mut mapped =
            MappedInterceptor::new(patterns(&["/x"]), RecordingInterceptor::new("o"));
        mapped.set_path_matcher(Arc::new(always.clone()));

        assert!(mapped.matches("/anything", &never).unwrap());
        assert_eq!(never.calls(), 0);
        assert_eq!(always.calls(), 1);
        assert!(mapped.path_matcher().is_some());
    }

    #[test]
    fn default_matcher_used_without_override() {
        let default = FixedMatcher::matching();
        let mapped = MappedInterceptor::new(patterns(&["/x"]), RecordingInterceptor::new("d"));

        assert!(mapped.matches("/y", &default).unwrap());
        assert_eq!(default.calls(), 1);
        assert!(mapped.path_matcher().is_none());
    }

    #[test]
    fn exclude_short_circuits_include() {
        let matcher = FixedMatcher::matching();
        let mapped = MappedInterceptor::with_excludes(
            patterns(&["/a", "/b"]),
            patterns(&["/c"]),
            RecordingInterceptor::new("x"),
        );

        assert!(!mapped.matches("/a", &matcher).unwrap());
        assert_eq!(matcher.calls(), 1);
    }

    #[test]
    fn matcher_errors_propagate() {
        let mapped = MappedInterceptor::new(patterns(&["/a"]), RecordingInterceptor::new("e"));
        let err = mapped.matches("/a", &FixedMatcher::failing()).unwrap_err();
        assert!(matches!(err, PatternError::Rejected { .. }));

        let malformed = MappedInterceptor::new(
            patterns(&["/users/{id"]),
            RecordingInterceptor::new("m"),
        );
        assert!(malformed.matches("/users/1", &AntPathMatcher::new()).is_err());
    }

    #[test]
    fn builder_appends_patterns() {
        let mapped = MappedInterceptor::builder(RecordingInterceptor::new("b"))
            .include(["/a/**"])
            .include(vec![String::from("/b/**")])
            .exclude(["/a/secret"])
            .path_matcher(Arc::new(AntPathMatcher::new()))
            .build();

        assert_eq!(
            mapped.include_patterns(),
            Some(&["/a/**".to_string(), "/b/**".to_string()][..])
        );
        assert_eq!(mapped.exclude_patterns(), Some(&["/a/secret".to_string()][..]));
        assert!(mapped.path_matcher().is_some());
    }

    #[test]
    fn accessors_report_configuration() {
        let mapped = MappedInterceptor::new(None, RecordingInterceptor::new("a"));
        assert!(mapped.include_patterns().is_none());
        assert!(mapped.exclude_patterns().is_none());
    }

    #[tokio::test]
    async fn lifecycle_delegates_unchanged() {
        let recorder = RecordingInterceptor::new("inner").returning(false);
        let mapped = MappedInterceptor::new(patterns(&["/never"]), recorder.clone());
        let (request, mut response) = (get("/orders/1"), response());
        let mut mav = ModelAndView::with_view_name("order").with_object("id", 1);
        let failure: BoxError = "boom".into();

        // Delegation is not guarded by `matches`.
        let proceed = mapped.pre_handle(&request, &mut response, &"orders").await.unwrap();
        mapped
            .post_handle(&request, &mut response, &"orders", Some(&mut mav))
            .await
            .unwrap();
        mapped
            .after_completion(&request, &mut response, &"orders", Some(failure.as_ref()))
            .await
            .unwrap();

        assert!(!proceed);
        let calls = recorder.calls();
        assert_eq!(
            calls.iter().map(|c| c.phase).collect::<Vec<_>>(),
            vec![Phase::PreHandle, Phase::PostHandle, Phase::AfterCompletion]
        );
        assert!(calls.iter().all(|c| c.path == "/orders/1"));
        assert!(calls.iter().all(|c| c.handler.as_deref() == Some("orders")));
        assert_eq!(calls[1].model_keys, Some(vec!["id".to_string()]));
        assert_eq!(calls[2].error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn lifecycle_errors_propagate() {
        let recorder = RecordingInterceptor::new("inner").failing_on(Phase::PostHandle);
        let mapped = MappedInterceptor::new(None, recorder);
        let (request, mut response) = (get("/"), response());

        let err = mapped
            .post_handle(&request, &mut response, &"h", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "inner failed during PostHandle");
    }

    #[tokio::test]
    async fn shared_interceptor_serves_several_mappings() {
        let recorder = RecordingInterceptor::new("shared");
        let shared: Arc<dyn DynHandlerInterceptor> = Arc::new(recorder.clone());
        let api = MappedInterceptor::from_shared(patterns(&["/api/**"]), None, shared.clone());
        let admin = MappedInterceptor::from_shared(
            patterns(&["/admin/**"]),
            patterns(&["/admin/login"]),
            shared.clone(),
        );
        let matcher = AntPathMatcher::new();
        let (request, mut response) = (get("/api/orders"), response());

        assert!(Arc::ptr_eq(api.interceptor(), admin.interceptor()));
        assert!(api.matches("/api/orders", &matcher).unwrap());
        assert!(!admin.matches("/admin/login", &matcher).unwrap());
        assert!(api.pre_handle(&request, &mut response, &"h").await.unwrap());
        admin
            .after_completion(&request, &mut response, &"h", None)
            .await
            .unwrap();

        assert_eq!(recorder.phases(), vec![Phase::PreHandle, Phase::AfterCompletion]);
    }

    #[tokio::test]
    async fn web_request_constructor_adapts() {
        let web = RecordingWebInterceptor::new("web");
        let mapped = MappedInterceptor::for_web_request(patterns(&["/**"]), web.clone());
        let (request, mut response) = (get("/x"), response());

        assert!(mapped.pre_handle(&request, &mut response, &"h").await.unwrap());
        assert_eq!(web.calls().len(), 1);
    }

    #[test]
    fn concurrent_matches_agree_with_sequential() {
        let mapped = MappedInterceptor::with_excludes(
            patterns(&["/api/**", "/static/*.js"]),
            patterns(&["/api/internal/**"]),
            RecordingInterceptor::new("c"),
        );
        let matcher = AntPathMatcher::new();
        let paths: Vec<String> = (0..64)
            .map(|i| match i % 4 {
                0 => format!("/api/v{i}/users"),
                1 => format!("/api/internal/{i}"),
                2 => format!("/static/app{i}.js"),
                _ => format!("/other/{i}"),
            })
            .collect();
        let expected: Vec<bool> = paths
            .iter()
            .map(|p| mapped.matches(p, &matcher).unwrap())
            .collect();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        paths
                            .iter()
                            .map(|p| mapped.matches(p, &matcher).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
