//! Body comparison strategies
//!
//! A comparison never fails by itself: it reports `Match` or
//! `Mismatch(reason)` and the caller decides between failing the test and
//! rewriting the fixture.

use std::borrow::Cow;
use std::path::PathBuf;

use replay_domain::{ActualResponse, BodyKind, JsonpPayload};
use serde_json::Value;
use thiserror::Error;

use crate::clean::CleanRegistry;

/// Why an observed response does not match its fixture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    /// The header name sets differ.
    #[error("Missing headers: actual [{}] != expected [{}]", .actual.join(","), .expected.join(","))]
    HeaderSet {
        /// Sorted actual header names.
        actual: Vec<String>,
        /// Sorted expected header names.
        expected: Vec<String>,
    },

    /// A recorded header value differs from the observed one.
    #[error("Invalid response header '{name}': expected {expected:?}, got {actual:?}")]
    HeaderValue {
        /// Header name.
        name: String,
        /// Recorded value.
        expected: String,
        /// Observed value, if present.
        actual: Option<String>,
    },

    /// The response has a body but the fixture records none.
    #[error("Unexpected response body")]
    UnexpectedBody,

    /// The bodies differ.
    #[error("{kind:?} body mismatch: {detail}")]
    Body {
        /// Kind the response was classified as.
        kind: BodyKind,
        /// Description of the difference.
        detail: String,
    },

    /// The image is too different from the reference.
    #[error("{0}")]
    Image(String),
}

/// Result of comparing one response to its fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// The response matches.
    Match,
    /// The response differs.
    Mismatch(MismatchReason),
}

impl ComparisonOutcome {
    /// Returns true for `Match`.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Expected body, either inline in the fixture or read from a sidecar file.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedBody {
    /// Body recorded in the fixture's `response.body` field.
    Inline(Value),
    /// Body read from a sidecar file.
    Sidecar {
        /// Sidecar path.
        path: PathBuf,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl ExpectedBody {
    /// The expected body as text.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Inline(Value::String(s)) => Cow::Borrowed(s),
            Self::Inline(other) => Cow::Owned(other.to_string()),
            Self::Sidecar { bytes, .. } => String::from_utf8_lossy(bytes),
        }
    }

    /// The expected body as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Sidecar { bytes, .. } => Cow::Borrowed(bytes),
            Self::Inline(_) => match self.as_text() {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        }
    }

    /// The expected body as JSON. Inline bodies are already structured; sidecars are parsed.
    fn as_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Inline(value) => Ok(value.clone()),
            Self::Sidecar { bytes, .. } => serde_json::from_slice(bytes),
        }
    }
}

/// Applies the comparison strategy for a body kind.
pub struct BodyComparator<'a> {
    clean: &'a CleanRegistry,
}

impl<'a> BodyComparator<'a> {
    /// Creates a comparator using the given cleaners.
    #[must_use]
    pub const fn new(clean: &'a CleanRegistry) -> Self {
        Self { clean }
    }

    /// Compares the actual body to the expected one.
    ///
    /// Images reaching this point are compared byte for byte; the tolerance
    /// check lives in `ImageComparator`. Unclassified bodies always match.
    #[must_use]
    pub fn compare(
        &self,
        kind: BodyKind,
        actual: &ActualResponse,
        expected: &ExpectedBody,
    ) -> ComparisonOutcome {
        match kind {
            BodyKind::Text | BodyKind::Html | BodyKind::Kml => {
                let cleaned = self.clean.clean_text(&actual.body_text());
                compare_strings(kind, &cleaned, &expected.as_text())
            }
            BodyKind::Js | BodyKind::Css => {
                compare_strings(kind, &actual.body_text(), &expected.as_text())
            }
            BodyKind::Json => self.compare_json(&actual.body_text(), expected),
            BodyKind::Jsonp => self.compare_jsonp(&actual.body_text(), &expected.as_text()),
            BodyKind::Pbf | BodyKind::Png | BodyKind::Jpg => {
                if actual.body.as_slice() == expected.as_bytes().as_ref() {
                    ComparisonOutcome::Match
                } else {
                    mismatch(
                        kind,
                        format!(
                            "{} bytes differ from {} expected bytes",
                            actual.body.len(),
                            expected.as_bytes().len()
                        ),
                    )
                }
            }
            BodyKind::Unclassified => ComparisonOutcome::Match,
        }
    }

    fn compare_json(&self, actual: &str, expected: &ExpectedBody) -> ComparisonOutcome {
        let actual: Value = match serde_json::from_str(actual) {
            Ok(value) => value,
            Err(e) => return mismatch(BodyKind::Json, format!("response is not JSON: {e}")),
        };
        let expected = match expected.as_json() {
            Ok(value) => value,
            Err(e) => return mismatch(BodyKind::Json, format!("fixture body is not JSON: {e}")),
        };
        compare_values(BodyKind::Json, &self.clean.clean_tree(actual), &expected)
    }

    fn compare_jsonp(&self, actual: &str, expected: &str) -> ComparisonOutcome {
        let actual = match JsonpPayload::parse(actual) {
            Ok(body) => body,
            Err(e) => return mismatch(BodyKind::Jsonp, format!("response: {e}")),
        };
        let expected = match JsonpPayload::parse(expected) {
            Ok(body) => body,
            Err(e) => return mismatch(BodyKind::Jsonp, format!("fixture: {e}")),
        };
        // Callback names are allowed to differ; only payloads are compared.
        compare_values(
            BodyKind::Jsonp,
            &self.clean.clean_tree(actual.payload),
            &expected.payload,
        )
    }
}

fn compare_strings(kind: BodyKind, actual: &str, expected: &str) -> ComparisonOutcome {
    if actual == expected {
        ComparisonOutcome::Match
    } else {
        mismatch(kind, format!("{} != {}", preview(actual), preview(expected)))
    }
}

fn compare_values(kind: BodyKind, actual: &Value, expected: &Value) -> ComparisonOutcome {
    if actual == expected {
        ComparisonOutcome::Match
    } else {
        mismatch(
            kind,
            format!("{} != {}", preview(&actual.to_string()), preview(&expected.to_string())),
        )
    }
}

fn mismatch(kind: BodyKind, detail: String) -> ComparisonOutcome {
    ComparisonOutcome::Mismatch(MismatchReason::Body { kind, detail })
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((end, _)) => format!("{:?}...", &text[..end]),
        None => format!("{text:?}"),
    }
}
