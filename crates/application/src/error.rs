//! Harness error types

use replay_domain::SerializationError;
use thiserror::Error;

use crate::comparison::MismatchReason;
use crate::image::ImageCompareError;
use crate::ports::{ExchangeError, FileSystemError};

/// Errors that fail a fixture run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The exchange failed or the status/header check did not pass.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// A token handler failed.
    #[error("token handler '{name}' failed: {message}")]
    TokenHandler {
        /// Handler name.
        name: String,
        /// Handler error message.
        message: String,
    },

    /// The token pattern could not be compiled.
    #[error("invalid token pattern: {0}")]
    TokenPattern(#[from] regex::Error),

    /// The request text is not valid JSON after token substitution.
    #[error("resolved request is not a valid request document: {0}")]
    TokenOutput(serde_json::Error),

    /// The response did not match the fixture.
    #[error(transparent)]
    Mismatch(#[from] MismatchReason),

    /// The image comparison could not be carried out.
    #[error("image comparison failed: {0}")]
    Image(#[from] ImageCompareError),

    /// A fixture or sidecar file could not be read or written.
    #[error("file system error: {0}")]
    FileSystem(#[from] FileSystemError),

    /// A fixture could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

impl HarnessError {
    /// Returns true for status-code mismatches, which update mode never heals.
    #[must_use]
    pub const fn is_status_mismatch(&self) -> bool {
        matches!(self, Self::Exchange(ExchangeError::StatusMismatch { .. }))
    }
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
