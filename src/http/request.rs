//! Request descriptors
//!
//! A [`RequestDescriptor`] is the immutable description of one API call:
//! target URL, ordered query parameters, optional JSON body and headers.

use crate::config::API_KEY_HEADER;
use crate::types::{JsonValue, Method, StringMap};
use std::fmt::Write as _;
use std::time::Duration;

// ============================================================================
// Query Parameters
// ============================================================================

/// Ordered query string segments.
///
/// Segments keep insertion order. Values are form-urlencoded, except that
/// commas are left as-is so field projections stay readable on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    segments: Vec<String>,
}

impl QueryParams {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`
    pub fn push(&mut self, key: &str, value: impl AsRef<str>) {
        self.segments
            .push(format!("{}={}", encode(key), encode(value.as_ref())));
    }

    /// Append a value-less flag such as `openAccessPdf`
    pub fn push_flag(&mut self, key: &str) {
        self.segments.push(encode(key));
    }

    /// Append `key=value` (builder form)
    #[must_use]
    pub fn with(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.push(key, value);
        self
    }

    /// Append every segment of another list
    pub fn extend(&mut self, other: &QueryParams) {
        self.segments.extend(other.segments.iter().cloned());
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the query string.
    ///
    /// Segments are concatenated as `&segment` and the stray leading `&` is
    /// trimmed, so optional segments can be appended in any combination.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('&');
            out.push_str(segment);
        }
        out.trim_start_matches('&').to_string()
    }
}

impl std::fmt::Display for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace("%2C", ",")
}

// ============================================================================
// Request Descriptor
// ============================================================================

/// One logical API request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    /// Absolute endpoint URL, without query string
    pub url: String,
    /// Query parameters
    pub params: QueryParams,
    /// JSON body; its presence turns the request into a POST
    pub body: Option<JsonValue>,
    /// Request headers (auth included)
    pub headers: StringMap,
    /// Override the executor's timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Create a descriptor for an endpoint URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.params.push(key, value);
        self
    }

    /// Replace all query parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add several headers
    #[must_use]
    pub fn headers(mut self, headers: &StringMap) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// HTTP method implied by the body
    pub fn method(&self) -> Method {
        if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }

    /// URL including the rendered query string
    pub fn full_url(&self) -> String {
        let query = self.params.render();
        if query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, query)
        }
    }

    /// Headers sorted by name with the API key masked, for traces
    pub fn redacted_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case(API_KEY_HEADER) {
                    (k.clone(), "***".to_string())
                } else {
                    (k.clone(), v.clone())
                }
            })
            .collect();
        headers.sort();
        headers
    }

    /// Equivalent `curl` command (API key masked)
    pub fn to_curl(&self) -> String {
        let mut cmd = format!("curl -X {} '{}'", self.method(), self.full_url());
        for (key, value) in self.redacted_headers() {
            let _ = write!(cmd, " -H '{key}: {value}'");
        }
        if let Some(body) = &self.body {
            let _ = write!(cmd, " -H 'Content-Type: application/json' -d '{body}'");
        }
        cmd
    }
}
