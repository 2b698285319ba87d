//! Lookup path computation.

use std::borrow::Cow;

/// Computes the path that interceptor patterns are matched against.
///
/// Starting from the raw request path (possibly with a query string):
///
/// 1. the query string is dropped,
/// 2. `;` parameters are removed from every segment (optional, on by default),
/// 3. the path is percent-decoded (optional, on by default),
/// 4. the context path is stripped if the path starts with it on a segment
///    boundary,
/// 5. `.` and `..` segments are resolved, repeated separators collapse and a
///    leading `/` is guaranteed.
///
/// # Example
///
/// ```rust
/// use pathgate_std::UrlPathHelper;
///
/// let helper = UrlPathHelper::new().with_context_path("/shop");
/// assert_eq!(helper.lookup_path("/shop/cart;jsessionid=42?x=1"), "/cart");
/// assert_eq!(helper.lookup_path("/shopping/cart"), "/shopping/cart");
/// ```
#[derive(Debug, Clone)]
pub struct UrlPathHelper {
    context_path: Option<String>,
    remove_semicolon_content: bool,
    url_decode: bool,
}

impl Default for UrlPathHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlPathHelper {
    /// Create a helper with no context path that decodes and strips `;`
    /// parameters.
    pub fn new() -> Self {
        Self {
            context_path: None,
            remove_semicolon_content: true,
            url_decode: true,
        }
    }

    /// Strip `context_path` from the front of matching request paths.
    ///
    /// An empty or `/` context path disables stripping.
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        let context_path = context_path.into();
        let trimmed = context_path.trim_end_matches('/');
        self.context_path = if trimmed.is_empty() {
            None
        } else if trimmed.starts_with('/') {
            Some(trimmed.to_string())
        } else {
            Some(format!("/{trimmed}"))
        };
        self
    }

    /// Keep or remove `;` parameters in path segments.
    pub fn with_remove_semicolon_content(mut self, remove: bool) -> Self {
        self.remove_semicolon_content = remove;
        self
    }

    /// Percent-decode the path or leave it as received.
    pub fn with_url_decode(mut self, decode: bool) -> Self {
        self.url_decode = decode;
        self
    }

    /// The configured context path.
    pub fn context_path(&self) -> Option<&str> {
        self.context_path.as_deref()
    }

    /// Compute the lookup path for a raw request path.
    pub fn lookup_path(&self, raw_path: &str) -> String {
        let path = raw_path.split(['?', '#']).next().unwrap_or_default();

        let path: Cow<'_, str> = if self.remove_semicolon_content {
            Cow::Owned(remove_semicolon_content(path))
        } else {
            Cow::Borrowed(path)
        };

        // Undecodable input, such as invalid UTF-8 escapes, is matched raw.
        let path = if self.url_decode {
            match urlencoding::decode(&path) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => path.into_owned(),
            }
        } else {
            path.into_owned()
        };

        let path = normalize(&path);
        match &self.context_path {
            Some(context) => strip_context(&path, context)
                .map(normalize)
                .unwrap_or(path),
            None => path,
        }
    }
}

fn remove_semicolon_content(path: &str) -> String {
    path.split('/')
        .map(|segment| segment.split(';').next().unwrap_or_default())
        .collect::<Vec<_>>()
        .join("/")
}

// `..` never climbs above the root.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    out.push_str(&segments.join("/"));
    if !segments.is_empty() && path.ends_with('/') {
        out.push('/');
    }
    out
}

fn strip_context<'a>(path: &'a str, context: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(context)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}
