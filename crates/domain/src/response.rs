//! Observed response type

use std::borrow::Cow;

use crate::fixture::Headers;

/// A response produced by the service under test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActualResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: Headers,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ActualResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Returns the content-type header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// Returns true if the response carried a non-empty body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Sorted header names.
    #[must_use]
    pub fn header_names(&self) -> Vec<String> {
        // BTreeMap keys are already ordered
        self.headers.keys().cloned().collect()
    }
}
