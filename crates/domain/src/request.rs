//! Resolved request type

use serde_json::Value;

use crate::fixture::{FixtureRequest, Headers};

/// A fixture request with all tokens substituted, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path including any query string.
    pub path: String,
    /// Request headers.
    pub headers: Headers,
    /// Body as literal text.
    pub body: Option<String>,
}

impl ResolvedRequest {
    /// Converts a token-free fixture request into its wire form.
    ///
    /// Requests with a JSON content type always send their body as
    /// serialized JSON text, however the fixture encoded it. Other requests
    /// send string bodies verbatim and structured bodies as compact JSON.
    #[must_use]
    pub fn from_fixture_request(request: FixtureRequest) -> Self {
        let is_json = request
            .headers
            .get("content-type")
            .is_some_and(|ct| ct.contains("json"));

        let body = request.body.map(|body| match body {
            Value::String(text) if !is_json => text,
            other => other.to_string(),
        });

        Self {
            method: request.method,
            path: request.path,
            headers: request.headers,
            body,
        }
    }

    /// Returns a header value by exact (lowercase) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Sets `user-agent` if the fixture did not record one.
    pub fn ensure_user_agent(&mut self, default: &str) {
        self.headers
            .entry("user-agent".to_string())
            .or_insert_with(|| default.to_string());
    }
}
