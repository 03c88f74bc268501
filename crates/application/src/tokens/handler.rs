//! Token handler trait and registry

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

/// Error returned by a token handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TokenError(pub String);

impl TokenError {
    /// Creates an error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Resolves one kind of request token.
#[async_trait]
pub trait TokenHandler: Send + Sync {
    /// Produces the replacement for a token.
    ///
    /// `request` is the original (unresolved) fixture request and `argument`
    /// the text after `name_` inside the braces, if any. `None` substitutes
    /// the empty string.
    ///
    /// # Errors
    ///
    /// Any error aborts resolution of the whole request.
    async fn resolve(
        &self,
        request: &Value,
        argument: Option<&str>,
    ) -> Result<Option<String>, TokenError>;
}

/// Adapter turning a synchronous closure into a `TokenHandler`.
pub struct FnHandler<F>(F);

/// Wraps a closure as a token handler.
pub const fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Value, Option<&str>) -> Result<Option<String>, TokenError> + Send + Sync,
{
    FnHandler(f)
}

#[async_trait]
impl<F> TokenHandler for FnHandler<F>
where
    F: Fn(&Value, Option<&str>) -> Result<Option<String>, TokenError> + Send + Sync,
{
    async fn resolve(
        &self,
        request: &Value,
        argument: Option<&str>,
    ) -> Result<Option<String>, TokenError> {
        (self.0)(request, argument)
    }
}

/// Named token handlers.
#[derive(Clone, Default)]
pub struct TokenHandlers {
    handlers: BTreeMap<String, Arc<dyn TokenHandler>>,
}

impl TokenHandlers {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, handler: impl TokenHandler + 'static) -> Self {
        self.register(name, handler);
        self
    }

    /// Adds or replaces the handler for `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: impl TokenHandler + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TokenHandler>> {
        self.handlers.get(name)
    }

    /// Returns true if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Builds `{(name1|name2|...)_?([^}]+)?}`, or `None` when nothing is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern cannot be compiled.
    pub fn pattern(&self) -> Result<Option<Regex>, regex::Error> {
        if self.handlers.is_empty() {
            return Ok(None);
        }
        let names: Vec<String> = self.names().map(regex::escape).collect();
        let pattern = format!(r"\{{({})_?([^}}]+)?\}}", names.join("|"));
        Regex::new(&pattern).map(Some)
    }
}

impl fmt::Debug for TokenHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenHandlers")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo() -> FnHandler<impl Fn(&Value, Option<&str>) -> Result<Option<String>, TokenError>> {
        from_fn(|_, arg| Ok(arg.map(str::to_string)))
    }

    #[test]
    fn test_no_handlers_no_pattern() {
        let pattern = TokenHandlers::new().pattern().expect("pattern compiles");
        assert!(pattern.is_none());
    }

    #[test]
    fn test_pattern_captures_name_and_argument() {
        let handlers = TokenHandlers::new().with("id", echo()).with("date", echo());
        let pattern = handlers
            .pattern()
            .expect("pattern compiles")
            .expect("handlers are registered");

        let caps = pattern.captures("/user/{id_42}").expect("token matches");
        assert_eq!(&caps[0], "{id_42}");
        assert_eq!(&caps[1], "id");
        assert_eq!(caps.get(2).map(|m| m.as_str()), Some("42"));

        let caps = pattern.captures("?t={date}").expect("token matches");
        assert_eq!(&caps[1], "date");
        assert!(caps.get(2).is_none());

        assert!(pattern.captures("{other_1}").is_none());
    }

    #[test]
    fn test_pattern_escapes_names() {
        let handlers = TokenHandlers::new().with("a.b", echo());
        let pattern = handlers
            .pattern()
            .expect("pattern compiles")
            .expect("handlers are registered");
        assert!(pattern.is_match("{a.b_1}"));
        assert!(!pattern.is_match("{axb_1}"));
    }

    #[tokio::test]
    async fn test_fn_handler_resolves() {
        let handler = echo();
        let value = handler
            .resolve(&Value::Null, Some("x"))
            .await
            .expect("handler succeeds");
        assert_eq!(value.as_deref(), Some("x"));
    }
}
