//! JSONP body parsing
//!
//! A JSONP body has the shape `identifier(payload);` where the payload is a
//! JSON document. The body is split textually and the payload parsed as
//! JSON; nothing is ever evaluated.

use serde_json::Value;

use crate::error::{DomainError, DomainResult};

/// A parsed `callback(payload);` body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonpPayload {
    /// Callback identifier.
    pub callback: String,
    /// Parsed JSON payload.
    pub payload: Value,
}

impl JsonpPayload {
    /// Parses a JSONP body. The trailing semicolon is optional.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidJsonp` if the callback is not an
    /// identifier, the parentheses are unbalanced or the payload is not JSON.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let text = text.trim();
        let open = text
            .find('(')
            .ok_or_else(|| DomainError::InvalidJsonp("missing '('".to_string()))?;
        let callback = &text[..open];
        if !is_identifier(callback) {
            return Err(DomainError::InvalidJsonp(format!(
                "invalid callback name '{callback}'"
            )));
        }

        let rest = text[open + 1..].trim_end();
        let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| DomainError::InvalidJsonp("missing ')'".to_string()))?;

        let payload = serde_json::from_str(inner)
            .map_err(|e| DomainError::InvalidJsonp(format!("payload is not JSON: {e}")))?;

        Ok(Self {
            callback: callback.to_string(),
            payload,
        })
    }

    /// Renders the body as `callback(<pretty JSON>);` with 2-space indentation.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let json = serde_json::to_string_pretty(&self.payload).unwrap_or_else(|_| "null".into());
        format!("{}({});", self.callback, json)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
