//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while interpreting fixtures and bodies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The fixture document does not have the `{request, response}` shape.
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    /// A JSONP body does not follow `callback(payload);`.
    #[error("invalid JSONP body: {0}")]
    InvalidJsonp(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
