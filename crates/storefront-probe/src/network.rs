//! Network Request Interception
//!
//! Register an expectation for outgoing calls matching a method and URL
//! pattern, then inspect the responses they received. Observation only:
//! nothing here mocks or blocks traffic.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::result::{ProbeError, ProbeResult};

/// HTTP methods for request matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// PATCH request
    Patch,
    /// Any method
    Any,
}

impl HttpMethod {
    /// Parse from string
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            _ => Self::Any,
        }
    }

    /// Convert to string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Any => "*",
        }
    }

    /// Check if this method matches another
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        *self == Self::Any || *other == Self::Any || *self == *other
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern for matching request URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Glob pattern (e.g., "**/favorites"); `*` runs match any characters
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Glob pattern
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Glob(pattern) => Self::glob_matches(pattern, url),
            Self::Any => true,
        }
    }

    fn glob_matches(pattern: &str, url: &str) -> bool {
        // Query strings never take part in route matching
        let url = url.split(['?', '#']).next().unwrap_or(url);
        let parts: Vec<&str> = pattern.split('*').collect();
        let anchored_start = !pattern.starts_with('*');
        let anchored_end = !pattern.ends_with('*');

        if parts.len() == 1 {
            return url == pattern;
        }

        let mut rest = url;
        let last = parts.len() - 1;
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if i == 0 && anchored_start {
                match rest.strip_prefix(part) {
                    Some(tail) => rest = tail,
                    None => return false,
                }
            } else if i == last && anchored_end {
                return rest.ends_with(part);
            } else if let Some(found) = rest.find(part) {
                rest = &rest[found + part.len()..];
            } else {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) | Self::Contains(p) | Self::Regex(p) | Self::Glob(p) => f.write_str(p),
            Self::Any => f.write_str("*"),
        }
    }
}

/// What to capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptSpec {
    /// HTTP method to match
    pub method: HttpMethod,
    /// URL pattern to match
    pub pattern: UrlPattern,
}

impl InterceptSpec {
    /// Create a new spec
    #[must_use]
    pub const fn new(method: HttpMethod, pattern: UrlPattern) -> Self {
        Self { method, pattern }
    }

    /// Whether a request matches
    #[must_use]
    pub fn matches(&self, method: HttpMethod, url: &str) -> bool {
        self.method.matches(&method) && self.pattern.matches(url)
    }
}

/// Driver-assigned intercept identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptId(pub u64);

/// A captured response to an intercepted call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptedResponse {
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Response status code
    pub status: u16,
    /// Parsed response body (`Null` when the body was not JSON)
    pub body: serde_json::Value,
}

impl InterceptedResponse {
    /// Whether the status is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// The `message` field of a JSON body
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(serde_json::Value::as_str)
    }

    /// Deserialize the body
    pub fn body_json<T: for<'de> Deserialize<'de>>(&self) -> ProbeResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Require an exact status
    pub fn expect_status(&self, expected: u16) -> ProbeResult<&Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(ProbeError::NetworkUnexpectedStatus {
                expected: expected.to_string(),
                actual: self.status,
                url: self.url.clone(),
            })
        }
    }

    /// Require a 2xx status
    pub fn expect_success(&self) -> ProbeResult<&Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProbeError::NetworkUnexpectedStatus {
                expected: "2xx".to_string(),
                actual: self.status,
                url: self.url.clone(),
            })
        }
    }
}

/// Handle returned by registering an intercept.
///
/// Responses are handed out in the order the calls completed; each one is
/// yielded once.
#[derive(Debug)]
pub struct InterceptHandle {
    id: InterceptId,
    spec: InterceptSpec,
    pending: VecDeque<InterceptedResponse>,
    yielded: usize,
}

impl InterceptHandle {
    /// Create a handle for a registered intercept
    #[must_use]
    pub const fn new(id: InterceptId, spec: InterceptSpec) -> Self {
        Self {
            id,
            spec,
            pending: VecDeque::new(),
            yielded: 0,
        }
    }

    /// Driver identifier
    #[must_use]
    pub const fn id(&self) -> InterceptId {
        self.id
    }

    /// What this handle captures
    #[must_use]
    pub const fn spec(&self) -> &InterceptSpec {
        &self.spec
    }

    /// Number of responses already handed out
    #[must_use]
    pub const fn yielded(&self) -> usize {
        self.yielded
    }

    /// Buffer freshly drained responses
    pub fn absorb(&mut self, responses: Vec<InterceptedResponse>) {
        self.pending.extend(responses);
    }

    /// Next unseen response, if one is buffered
    pub fn pop(&mut self) -> Option<InterceptedResponse> {
        let next = self.pending.pop_front();
        if next.is_some() {
            self.yielded += 1;
        }
        next
    }

    /// Timeout error for this handle
    #[must_use]
    pub fn timeout_error(&self, timeout_ms: u64) -> ProbeError {
        ProbeError::InterceptTimeout {
            method: self.spec.method.to_string(),
            pattern: self.spec.pattern.to_string(),
            timeout_ms,
        }
    }
}
