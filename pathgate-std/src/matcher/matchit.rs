//! Matchit-based path matcher.
//!
//! Understands route syntax (e.g. `/users/{id}`, `/files/{*rest}`) instead of
//! Ant-style globs, for applications that map interceptors with the same
//! patterns they use for routing.

use matchit::Router as InnerRouter;
use pathgate_core::{PathMatcher, PatternError};

/// A [`PathMatcher`] based on `matchit`.
///
/// Each call builds a single-route router, so this trades speed for syntax
/// compatibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchitPathMatcher;

impl MatchitPathMatcher {
    /// Create a new matcher.
    pub fn new() -> Self {
        Self
    }
}

impl PathMatcher for MatchitPathMatcher {
    fn is_pattern(&self, path: &str) -> bool {
        path.contains('{')
    }

    fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        let mut router = InnerRouter::new();
        router
            .insert(pattern, ())
            .map_err(|e| PatternError::Rejected {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(router.at(path).is_ok())
    }
}
