//! Built-in token handlers
//!
//! Ready-made handlers callers can register under any name:
//! `{env_HOME}`, `{uuid}`, `{timestamp}` / `{timestamp_iso}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::handler::{TokenError, TokenHandler};
use crate::ports::Clock;

/// Resolves `{name_VAR}` to the value of environment variable `VAR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvHandler;

#[async_trait]
impl TokenHandler for EnvHandler {
    async fn resolve(
        &self,
        _request: &Value,
        argument: Option<&str>,
    ) -> Result<Option<String>, TokenError> {
        let name = argument.ok_or_else(|| TokenError::new("env token needs a variable name"))?;
        std::env::var(name)
            .map(Some)
            .map_err(|_| TokenError::new(format!("environment variable '{name}' is not set")))
    }
}

/// Resolves to a fresh random UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidHandler;

#[async_trait]
impl TokenHandler for UuidHandler {
    async fn resolve(
        &self,
        _request: &Value,
        _argument: Option<&str>,
    ) -> Result<Option<String>, TokenError> {
        Ok(Some(Uuid::new_v4().to_string()))
    }
}

/// Resolves to the current time: Unix seconds, or RFC 3339 with argument `iso`.
pub struct TimestampHandler {
    clock: Arc<dyn Clock>,
}

impl TimestampHandler {
    /// Creates a handler reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl TokenHandler for TimestampHandler {
    async fn resolve(
        &self,
        _request: &Value,
        argument: Option<&str>,
    ) -> Result<Option<String>, TokenError> {
        let now = self.clock.now();
        match argument {
            None => Ok(Some(now.timestamp().to_string())),
            Some("iso") => Ok(Some(now.to_rfc3339())),
            Some(other) => Err(TokenError::new(format!("unknown timestamp format '{other}'"))),
        }
    }
}
