//! Ant-style path patterns.
//!
//! The mapping matches paths using the following rules:
//!
//! - `?` matches one character
//! - `*` matches zero or more characters within a segment
//! - `**` matches zero or more segments
//! - `{name}` matches a segment part and captures it as `name`
//! - `{name:[a-z]+}` matches the regex `[a-z]+` and captures it as `name`
//!
//! Examples:
//!
//! - `/com/t?st.jsp` matches `/com/test.jsp` but also `/com/tast.jsp`
//! - `/com/*.jsp` matches all `.jsp` files in the `/com` directory
//! - `/com/**/test.jsp` matches all `test.jsp` files underneath `/com`
//! - `/org/**/servlet/bla.jsp` matches `/org/servlet/bla.jsp` and
//!   `/org/a/b/servlet/bla.jsp`

use dashmap::DashMap;
use pathgate_core::{PathMatcher, PatternError};
use regex::{Regex, RegexBuilder};
use std::{collections::HashMap, sync::Arc};

/// Default path separator.
pub const DEFAULT_PATH_SEPARATOR: char = '/';

// Past this many distinct segments the pattern set is assumed unbounded
// (e.g. patterns built from request data) and caching stops.
const CACHE_TURNOFF_THRESHOLD: usize = 65_536;

const DOUBLE_WILDCARD: &str = "**";

/// A compiled pattern segment.
#[derive(Debug)]
enum Segment {
    /// A lone `*`.
    Any,
    /// No wildcards or variables.
    Literal(String),
    /// Anything else, compiled to an anchored regex.
    Pattern {
        regex: Regex,
        variables: Vec<String>,
    },
}

/// Per-call facts the segment walk needs at its leaves.
struct MatchScope<'a> {
    pattern: &'a str,
    has_double_wildcard: bool,
    pattern_ends_with_separator: bool,
    path_ends_with_separator: bool,
}

/// [`PathMatcher`] implementation for Ant-style path patterns.
///
/// Compiled segments are cached, so one instance should be shared rather than
/// created per request.
///
/// # Example
///
/// ```rust
/// use pathgate_core::PathMatcher;
/// use pathgate_std::matcher::AntPathMatcher;
///
/// let matcher = AntPathMatcher::new();
/// assert!(matcher.matches("/api/**", "/api/v1/users").unwrap());
/// assert!(!matcher.matches("/api/**", "/static/app.js").unwrap());
/// ```
#[derive(Debug)]
pub struct AntPathMatcher {
    path_separator: char,
    case_sensitive: bool,
    trim_tokens: bool,
    cache: DashMap<String, Arc<Segment>>,
}

impl Default for AntPathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AntPathMatcher {
    /// Create a matcher with `/` as separator, case-sensitive, untrimmed.
    pub fn new() -> Self {
        Self {
            path_separator: DEFAULT_PATH_SEPARATOR,
            case_sensitive: true,
            trim_tokens: false,
            cache: DashMap::new(),
        }
    }

    /// Use a different path separator, e.g. `.` for package-like names.
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self.cache.clear();
        self
    }

    /// Configure case sensitivity. Default is `true`.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self.cache.clear();
        self
    }

    /// Trim whitespace around segments of both pattern and path. Default is `false`.
    pub fn with_trim_tokens(mut self, trim_tokens: bool) -> Self {
        self.trim_tokens = trim_tokens;
        self
    }

    /// The configured path separator.
    pub fn path_separator(&self) -> char {
        self.path_separator
    }

    /// Extract the URI template variables of `path` against `pattern`.
    ///
    /// `/hotels/{hotel}` against `/hotels/1` yields `hotel -> 1`.
    pub fn extract_uri_template_variables(
        &self,
        pattern: &str,
        path: &str,
    ) -> Result<HashMap<String, String>, PatternError> {
        let mut variables = Vec::new();
        if self.match_capturing(pattern, path, &mut variables)? {
            Ok(variables.into_iter().collect())
        } else {
            Err(PatternError::NoMatch {
                pattern: pattern.to_string(),
                path: path.to_string(),
            })
        }
    }

    fn match_capturing(
        &self,
        pattern: &str,
        path: &str,
        variables: &mut Vec<(String, String)>,
    ) -> Result<bool, PatternError> {
        let separator = self.path_separator;
        if path.starts_with(separator) != pattern.starts_with(separator) {
            return Ok(false);
        }

        let pattern_tokens = self.tokenize(pattern);
        let path_tokens = self.tokenize(path);
        let scope = MatchScope {
            pattern,
            has_double_wildcard: pattern_tokens.contains(&DOUBLE_WILDCARD),
            pattern_ends_with_separator: pattern.ends_with(separator),
            path_ends_with_separator: path.ends_with(separator),
        };

        self.match_tokens(&scope, &pattern_tokens, &path_tokens, variables)
    }

    fn tokenize<'a>(&self, value: &'a str) -> Vec<&'a str> {
        value
            .split(self.path_separator)
            .map(|token| if self.trim_tokens { token.trim() } else { token })
            .filter(|token| !token.is_empty())
            .collect()
    }

    fn match_tokens(
        &self,
        scope: &MatchScope<'_>,
        pattern: &[&str],
        path: &[&str],
        variables: &mut Vec<(String, String)>,
    ) -> Result<bool, PatternError> {
        match pattern.split_first() {
            None => Ok(path.is_empty()
                && (scope.has_double_wildcard
                    || scope.pattern_ends_with_separator == scope.path_ends_with_separator)),
            Some((&DOUBLE_WILDCARD, rest)) => {
                for skip in 0..=path.len() {
                    let mark = variables.len();
                    if self.match_tokens(scope, rest, &path[skip..], variables)? {
                        return Ok(true);
                    }
                    variables.truncate(mark);
                }
                Ok(false)
            }
            Some((token, rest)) => match path.split_first() {
                // `/foo/*` still matches `/foo/`
                None => Ok(rest.is_empty() && *token == "*" && scope.path_ends_with_separator),
                Some((segment, path_rest)) => {
                    let mark = variables.len();
                    if self.match_segment(scope.pattern, token, segment, variables)?
                        && self.match_tokens(scope, rest, path_rest, variables)?
                    {
                        return Ok(true);
                    }
                    variables.truncate(mark);
                    Ok(false)
                }
            },
        }
    }

    fn match_segment(
        &self,
        pattern: &str,
        token: &str,
        segment: &str,
        variables: &mut Vec<(String, String)>,
    ) -> Result<bool, PatternError> {
        let compiled = self.compile(pattern, token)?;
        let matched = match compiled.as_ref() {
            Segment::Any => true,
            Segment::Literal(literal) if self.case_sensitive => literal == segment,
            Segment::Literal(literal) => literal.to_lowercase() == segment.to_lowercase(),
            Segment::Pattern {
                regex,
                variables: names,
            } => match regex.captures(segment) {
                Some(captures) => {
                    for (index, name) in names.iter().enumerate() {
                        if let Some(value) = captures.name(&group_name(index)) {
                            variables.push((name.clone(), value.as_str().to_string()));
                        }
                    }
                    true
                }
                None => false,
            },
        };
        Ok(matched)
    }

    fn compile(&self, pattern: &str, token: &str) -> Result<Arc<Segment>, PatternError> {
        if let Some(cached) = self.cache.get(token) {
            return Ok(Arc::clone(cached.value()));
        }

        let segment = Arc::new(self.parse_segment(pattern, token)?);
        if self.cache.len() < CACHE_TURNOFF_THRESHOLD {
            self.cache.insert(token.to_string(), Arc::clone(&segment));
        }
        Ok(segment)
    }

    fn parse_segment(&self, pattern: &str, token: &str) -> Result<Segment, PatternError> {
        if token == "*" {
            return Ok(Segment::Any);
        }
        if !token.contains(['*', '?', '{']) {
            return Ok(Segment::Literal(token.to_string()));
        }

        let mut source = String::with_capacity(token.len() + 16);
        let mut literal = String::new();
        let mut variables = Vec::new();
        source.push('^');

        let mut chars = token.chars();
        while let Some(c) = chars.next() {
            match c {
                '?' => {
                    flush_literal(&mut source, &mut literal);
                    source.push('.');
                }
                '*' => {
                    flush_literal(&mut source, &mut literal);
                    source.push_str(".*");
                }
                '{' => {
                    flush_literal(&mut source, &mut literal);
                    let mut depth = 1usize;
                    let mut body = String::new();
                    for inner in chars.by_ref() {
                        match inner {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                        body.push(inner);
                    }
                    if depth != 0 {
                        return Err(PatternError::UnclosedVariable(pattern.to_string()));
                    }

                    let (name, constraint) = body.split_once(':').unwrap_or((body.as_str(), ".*"));
                    source.push_str(&format!(
                        "(?P<{}>{})",
                        group_name(variables.len()),
                        constraint
                    ));
                    variables.push(name.to_string());
                }
                other => literal.push(other),
            }
        }
        flush_literal(&mut source, &mut literal);
        source.push('$');

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map_err(|e| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Segment::Pattern { regex, variables })
    }
}

impl PathMatcher for AntPathMatcher {
    fn matches(&self, pattern: &str, path: &str) -> Result<bool, PatternError> {
        let mut variables = Vec::new();
        self.match_capturing(pattern, path, &mut variables)
    }
}

fn flush_literal(source: &mut String, literal: &mut String) {
    if !literal.is_empty() {
        source.push_str(&regex::escape(literal));
        literal.clear();
    }
}

// Variable names are user text; capture groups get generated names instead.
fn group_name(index: usize) -> String {
    format!("pgv{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        AntPathMatcher::new().matches(pattern, path).unwrap()
    }

    #[test]
    fn test_literal_paths() {
        assert!(matches("/test", "/test"));
        assert!(matches("test", "test"));
        assert!(!matches("/test.jpg", "test.jpg"));
        assert!(!matches("test", "/test"));
        assert!(!matches("/test", "test"));
        assert!(matches("", ""));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("t?st", "test"));
        assert!(matches("??st", "test"));
        assert!(matches("tes?", "test"));
        assert!(!matches("tes?", "tes"));
        assert!(!matches("tes?", "testt"));
        assert!(!matches("tes?", "tsst"));
    }

    #[test]
    fn test_single_wildcard() {
        assert!(matches("*", "test"));
        assert!(matches("test*", "test"));
        assert!(matches("test*", "testTest"));
        assert!(matches("test/*", "test/Test"));
        assert!(matches("test/*", "test/t"));
        assert!(matches("test/*", "test/"));
        assert!(matches("*test*", "AnothertestTest"));
        assert!(matches("*.*", "test."));
        assert!(matches("*.*", "test.test.test"));
        assert!(!matches("test*", "tst"));
        assert!(!matches("test/*", "test"));
        assert!(!matches("test*aaa", "testblaaab"));
        assert!(!matches("*.*", "tsttst"));
    }

    #[test]
    fn test_double_wildcard() {
        assert!(matches("/**", "/testing/testing"));
        assert!(matches("/*/**", "/testing/testing"));
        assert!(matches("/**/*", "/testing/testing"));
        assert!(matches("/bla/**/bla", "/bla/testing/testing/bla"));
        assert!(matches("/bla/**/bla", "/bla/testing/testing/bla/bla"));
        assert!(matches("/**/test", "/bla/bla/test"));
        assert!(matches("/bla/**/**/bla", "/bla/bla/bla/bla/bla/bla"));
        assert!(matches("/foo/bar/**", "/foo/bar"));
        assert!(matches(
            "/*bla*/**/bla/**",
            "/XXXblaXXXX/testing/testing/bla/testing/testing/"
        ));
        assert!(!matches("/????", "/bala/bla"));
        assert!(!matches("/**/*bla", "/bla/bla/bla/bbb"));
        assert!(!matches("/x/x/**/bla", "/x/x/x/"));
    }

    #[test]
    fn test_wildcard_within_segments() {
        assert!(matches("/bla*bla/test", "/blaXXXbla/test"));
        assert!(matches("/*bla/test", "/XXXbla/test"));
        assert!(!matches("/bla*bla/test", "/blaXXXbl/test"));
        assert!(!matches("/*bla/test", "XXXblab/test"));
        assert!(!matches("/*bla/test", "XXXbl/test"));
    }

    #[test]
    fn test_trailing_separator_must_agree_without_double_wildcard() {
        assert!(!matches("/foo/", "/foo"));
        assert!(!matches("/foo", "/foo/"));
        assert!(matches("/foo/", "/foo/"));
    }

    #[test]
    fn test_variables_match_within_segment() {
        assert!(matches("/{bla}.*", "/testing.html"));
        assert!(matches("/users/{id}", "/users/42"));
        assert!(!matches("/users/{id}", "/users/42/posts"));
        assert!(matches("/users/{id:[0-9]+}", "/users/42"));
        assert!(!matches("/users/{id:[0-9]+}", "/users/bob"));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = AntPathMatcher::new().with_case_sensitive(false);
        assert!(matcher.matches("/Group/*/Members", "/group/sales/members").unwrap());
        assert!(matcher.matches("/group/{name}", "/GROUP/Sales").unwrap());
        assert!(!AntPathMatcher::new().matches("/Group/x", "/group/x").unwrap());
    }

    #[test]
    fn test_trim_tokens() {
        let matcher = AntPathMatcher::new().with_trim_tokens(true);
        assert!(matcher.matches("/group/ sales /members", "/group/sales/members").unwrap());
    }

    #[test]
    fn test_custom_separator() {
        let matcher = AntPathMatcher::new().with_path_separator('.');
        assert!(matcher.matches("com.*.service", "com.example.service").unwrap());
        assert!(matcher.matches("com.**", "com.example.deep.service").unwrap());
        assert!(!matcher.matches("com.*", "org.example").unwrap());
    }

    #[test]
    fn test_extract_variables() {
        let matcher = AntPathMatcher::new();

        let vars = matcher
            .extract_uri_template_variables("/hotels/{hotel}", "/hotels/1")
            .unwrap();
        assert_eq!(vars.get("hotel").map(String::as_str), Some("1"));

        let vars = matcher
            .extract_uri_template_variables("/hotels/{hotel}/bookings/{booking}", "/hotels/1/bookings/2")
            .unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["booking"], "2");

        let vars = matcher
            .extract_uri_template_variables("/{name}.{extension}", "/test.html")
            .unwrap();
        assert_eq!(vars["name"], "test");
        assert_eq!(vars["extension"], "html");

        let vars = matcher
            .extract_uri_template_variables(
                "{symbolicName:[\\w\\.]+}-{version:[\\w\\.]+}.jar",
                "com.example-1.0.0.jar",
            )
            .unwrap();
        assert_eq!(vars["symbolicName"], "com.example");
        assert_eq!(vars["version"], "1.0.0");
    }

    #[test]
    fn test_extract_variables_across_double_wildcard() {
        let matcher = AntPathMatcher::new();
        let vars = matcher
            .extract_uri_template_variables("/**/{file}.pdf", "/docs/2024/report.pdf")
            .unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars["file"], "report");
    }

    #[test]
    fn test_extract_variables_no_match() {
        let err = AntPathMatcher::new()
            .extract_uri_template_variables("/hotels/{hotel}", "/flights/1")
            .unwrap_err();
        assert!(matches!(err, PatternError::NoMatch { .. }));
    }

    #[test]
    fn test_malformed_patterns_fail_at_match_time() {
        let matcher = AntPathMatcher::new();

        let err = matcher.matches("/users/{id", "/users/1").unwrap_err();
        assert_eq!(err, PatternError::UnclosedVariable("/users/{id".into()));

        let err = matcher.matches("/users/{id:[a-z}", "/users/1").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn test_malformed_pattern_not_reached_is_harmless() {
        // The first segment already fails, so the broken one is never compiled.
        let matcher = AntPathMatcher::new();
        assert!(!matcher.matches("/admin/{id", "/users/1").unwrap());
    }

    #[test]
    fn test_cache_is_reused() {
        let matcher = AntPathMatcher::new();
        assert!(matcher.matches("/a/*.html", "/a/index.html").unwrap());
        assert!(matcher.matches("/b/*.html", "/b/about.html").unwrap());
        assert_eq!(matcher.cache.len(), 3);
    }
}
