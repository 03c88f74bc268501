//! Request/response exchange port
//!
//! The exchange sends a resolved request to the service under test and
//! checks the status code and expected header values before handing the
//! response back. Body comparison happens later, in the comparison engine.

use std::future::Future;

use replay_domain::{ActualResponse, FixtureResponse, Headers, ResolvedRequest};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::clean::CleanRegistry;

/// Status and headers the response must carry. Never includes a body.
#[derive(Debug, Clone, Default)]
pub struct ExpectedResponse {
    /// Expected status code.
    pub status: u16,
    /// Expected header values.
    pub headers: Headers,
    /// Cleaners applied to actual header values before comparison.
    pub clean: CleanRegistry,
}

impl ExpectedResponse {
    /// Builds the expectation for a fixture response, dropping its body.
    #[must_use]
    pub fn from_fixture(response: &FixtureResponse, clean: CleanRegistry) -> Self {
        Self {
            status: response.status_code,
            headers: response.headers.clone(),
            clean,
        }
    }

    /// Checks an actual response against this expectation.
    ///
    /// The status is checked first. Each expected header must be present and
    /// its cleaned actual value must equal the recorded one.
    ///
    /// # Errors
    ///
    /// Returns `StatusMismatch` or `HeaderMismatch`.
    pub fn verify(&self, actual: ActualResponse) -> Result<ActualResponse, ExchangeError> {
        if actual.status != self.status {
            return Err(ExchangeError::StatusMismatch {
                expected: self.status,
                actual: actual.status,
            });
        }

        let context = Value::Object(
            actual
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<_, _>>(),
        );

        for (name, expected) in &self.headers {
            let cleaned = actual.headers.get(name).map(|value| {
                match self
                    .clean
                    .clean_field(name, Value::String(value.clone()), &context)
                {
                    Value::String(s) => s,
                    other => other.to_string(),
                }
            });

            if cleaned.as_deref() != Some(expected.as_str()) {
                return Err(ExchangeError::HeaderMismatch {
                    name: name.clone(),
                    expected: expected.clone(),
                    actual: cleaned,
                    response: Box::new(actual),
                });
            }
        }

        Ok(actual)
    }
}

/// Errors raised by the exchange.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The status code differs. Never healed by update mode.
    #[error("Invalid response status code: expected {expected}, got {actual}")]
    StatusMismatch {
        /// Recorded status.
        expected: u16,
        /// Observed status.
        actual: u16,
    },

    /// An expected header is missing or has a different value.
    #[error("Invalid response header '{name}': expected {expected:?}, got {actual:?}")]
    HeaderMismatch {
        /// Header name.
        name: String,
        /// Recorded value.
        expected: String,
        /// Observed (cleaned) value, if present.
        actual: Option<String>,
        /// The full observed response, kept for fixture rewrites.
        response: Box<ActualResponse>,
    },

    /// The request could not be performed.
    #[error("exchange failed: {0}")]
    Transport(String),
}

/// Port for performing one request/response exchange against the service under test.
pub trait Exchange: Send + Sync {
    /// Sends the request and verifies status and headers against `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or status/header mismatch.
    fn exchange(
        &self,
        request: &ResolvedRequest,
        expected: &ExpectedResponse,
    ) -> impl Future<Output = Result<ActualResponse, ExchangeError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: &[(&str, &str)]) -> ActualResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ActualResponse::new(status, headers, Vec::new())
    }

    fn expected(status: u16, headers: &[(&str, &str)]) -> ExpectedResponse {
        ExpectedResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            clean: CleanRegistry::new(),
        }
    }

    #[test]
    fn test_status_mismatch() {
        let err = expected(200, &[])
            .verify(response(404, &[]))
            .expect_err("status must differ");
        assert!(matches!(
            err,
            ExchangeError::StatusMismatch {
                expected: 200,
                actual: 404
            }
        ));
    }

    #[test]
    fn test_header_value_mismatch_keeps_response() {
        let err = expected(200, &[("etag", "\"a\"")])
            .verify(response(200, &[("etag", "\"b\"")]))
            .expect_err("header must differ");
        match err {
            ExchangeError::HeaderMismatch {
                name,
                actual,
                response,
                ..
            } => {
                assert_eq!(name, "etag");
                assert_eq!(actual.as_deref(), Some("\"b\""));
                assert_eq!(response.status, 200);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_expected_header() {
        let err = expected(200, &[("x-cache", "HIT")])
            .verify(response(200, &[]))
            .expect_err("header is missing");
        assert!(matches!(err, ExchangeError::HeaderMismatch { actual: None, .. }));
    }

    #[test]
    fn test_cleaned_header_value_matches() {
        let mut exp = expected(200, &[("date", "<date>")]);
        exp.clean = CleanRegistry::new().with("date", |_, _, _| Value::String("<date>".into()));

        let actual = exp
            .verify(response(200, &[("date", "Mon, 19 Oct 2026 10:00:00 GMT")]))
            .expect("cleaned date should match");
        assert_eq!(actual.status, 200);
    }

    #[test]
    fn test_extra_actual_headers_are_not_checked_here() {
        let actual = expected(200, &[])
            .verify(response(200, &[("x-extra", "1")]))
            .expect("extra headers are compared by name later");
        assert!(actual.headers.contains_key("x-extra"));
    }
}
