//! Fixture file model
//!
//! A fixture is a UTF-8 JSON document holding one recorded request and the
//! response it is expected to produce. Unknown fields are carried through
//! untouched so a rewritten fixture never loses hand-authored data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};

/// Header mapping as stored in fixtures (name to value).
pub type Headers = BTreeMap<String, String>;

/// A recorded request/expected-response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// The request to replay. May contain `{handler_argument}` tokens.
    pub request: FixtureRequest,
    /// The response the service is expected to produce.
    pub response: FixtureResponse,
    /// Any other top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fixture {
    /// Parses a fixture document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFixture` if the text is not JSON or lacks
    /// the request/response shape.
    pub fn from_json(text: &str) -> DomainResult<Self> {
        serde_json::from_str(text).map_err(|e| DomainError::InvalidFixture(e.to_string()))
    }
}

/// The request half of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRequest {
    /// HTTP method as written in the fixture.
    pub method: String,
    /// Request path including any query string.
    pub path: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Request body, either structured JSON or a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Any other request fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FixtureRequest {
    /// Creates a body-less request with no headers.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: None,
            extra: Map::new(),
        }
    }
}

/// The expected-response half of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResponse {
    /// Expected HTTP status code.
    pub status_code: u16,
    /// Expected response headers.
    #[serde(default)]
    pub headers: Headers,
    /// Inline expected body. Large or binary bodies live in a sidecar file instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Any other response fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FixtureResponse {
    /// Creates an expectation with the given status, no headers and no body.
    #[must_use]
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: Headers::new(),
            body: None,
            extra: Map::new(),
        }
    }

    /// Returns the inline body if it holds something worth comparing.
    ///
    /// `null` and the empty string count as absent, which makes the
    /// comparison fall back to the sidecar file.
    #[must_use]
    pub fn inline_body(&self) -> Option<&Value> {
        match &self.body {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(body) => Some(body),
        }
    }
}
