//! Path pattern matching capability.

use crate::error::PatternError;

/// Decides whether a lookup path matches a pattern.
///
/// Only an existential answer is required: callers never ask *how* a path
/// matched, only *whether* it did. Implementations may support any syntax;
/// the stock `AntPathMatcher` in `pathgate-std` understands `?`, `*`, `**`
/// and `{name}` variables.
///
/// Syntax errors are reported at match time, not when the pattern is mapped.
///
/// # Example
///
/// ```rust
/// use pathgate_core::{PathMatcher, PatternError};
///
/// // Closures with the right signature are matchers.
/// let prefix = |pattern: &str, path: &str| -> Result<bool, PatternError> {
///     Ok(path.starts_with(pattern))
/// };
///
/// assert!(prefix.matches("/api", "/api/users").unwrap());
/// ```
pub trait PathMatcher: Send + Sync {
    /// Whether `path` is a pattern rather than a literal path.
    fn is_pattern(&self, path: &str) -> bool {
        path.contains(['*', '?', '{'])
    }

    /// Match `path` against `pattern`.
    fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError>;
}

// Blanket implementation for closures
impl<F> PathMatcher for F
where
    F: Fn(&str, &str) -> Result<bool, PatternError> + Send + Sync,
{
    fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        (self)(pattern, path)
    }
}
