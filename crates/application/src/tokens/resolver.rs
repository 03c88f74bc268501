//! Token resolution engine
//!
//! Resolution works on the serialized request text, not on the parsed
//! structure, so a token may sit anywhere (inside a path, a header value or
//! a body field). Once no tokens remain the text is parsed back into a
//! request and converted to its wire form.

use replay_domain::{FixtureRequest, ResolvedRequest, SerializationError};

use super::handler::TokenHandlers;
use crate::error::{HarnessError, HarnessResult};

/// Substitutes handler tokens in fixture requests.
pub struct TokenResolver<'a> {
    handlers: &'a TokenHandlers,
}

impl<'a> TokenResolver<'a> {
    /// Creates a resolver over the given handlers.
    #[must_use]
    pub const fn new(handlers: &'a TokenHandlers) -> Self {
        Self { handlers }
    }

    /// Resolves every token in the request, in order of appearance.
    ///
    /// Each step re-matches the pattern from the end of the last substituted
    /// value, so text produced by a handler is never scanned for tokens.
    ///
    /// # Errors
    ///
    /// Fails on the first handler error, or if the substituted text is no
    /// longer a valid request document.
    pub async fn resolve(&self, request: &FixtureRequest) -> HarnessResult<ResolvedRequest> {
        let original = serde_json::to_value(request).map_err(SerializationError::from)?;
        let mut text = original.to_string();

        if let Some(pattern) = self.handlers.pattern()? {
            let mut cursor = 0;
            loop {
                let (range, name, argument) = {
                    let Some(caps) = pattern.captures_at(&text, cursor) else {
                        break;
                    };
                    let Some(whole) = caps.get(0) else {
                        break;
                    };
                    (
                        whole.range(),
                        caps.get(1).map_or("", |m| m.as_str()).to_string(),
                        caps.get(2).map(|m| m.as_str().to_string()),
                    )
                };

                let Some(handler) = self.handlers.get(&name) else {
                    break;
                };
                let value = handler
                    .resolve(&original, argument.as_deref())
                    .await
                    .map_err(|e| HarnessError::TokenHandler {
                        name: name.clone(),
                        message: e.to_string(),
                    })?
                    .unwrap_or_default();

                tracing::debug!(token = %&text[range.clone()], %value, "resolved request token");
                cursor = range.start + value.len();
                text.replace_range(range, &value);
            }
        }

        let resolved: FixtureRequest =
            serde_json::from_str(&text).map_err(HarnessError::TokenOutput)?;
        Ok(ResolvedRequest::from_fixture_request(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use crate::tokens::handler::{TokenError, from_fn};

    #[tokio::test]
    async fn test_no_tokens_no_handlers() {
        let mut request = FixtureRequest::new("GET", "/plain");
        request.headers.insert("accept".into(), "*/*".into());

        let resolved = TokenResolver::new(&TokenHandlers::new())
            .resolve(&request)
            .await
            .expect("resolution succeeds");

        assert_eq!(resolved, ResolvedRequest::from_fixture_request(request));
    }

    #[tokio::test]
    async fn test_token_in_path() {
        let handlers =
            TokenHandlers::new().with("id", from_fn(|_, arg| Ok(arg.map(str::to_string))));
        let request = FixtureRequest::new("GET", "/user/{id_42}");

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution succeeds");
        assert_eq!(resolved.path, "/user/42");
    }

    #[tokio::test]
    async fn test_repeated_tokens_resolve_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handlers = TokenHandlers::new().with(
            "seq",
            from_fn(move |_, _| Ok(Some(counter.fetch_add(1, Ordering::SeqCst).to_string()))),
        );
        let request = FixtureRequest::new("GET", "/{seq}/{seq}/{seq}");

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution succeeds");
        assert_eq!(resolved.path, "/0/1/2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_resolved_value_is_not_rescanned() {
        let handlers = TokenHandlers::new().with(
            "wrap",
            from_fn(|_, arg| Ok(Some(format!("{{wrap_{}}}", arg.unwrap_or_default())))),
        );
        let request = FixtureRequest::new("GET", "/{wrap_a}");

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution terminates");
        assert_eq!(resolved.path, "/{wrap_a}");
    }

    #[tokio::test]
    async fn test_none_value_substitutes_empty_string() {
        let handlers = TokenHandlers::new().with("drop", from_fn(|_, _| Ok(None)));
        let request = FixtureRequest::new("GET", "/a{drop}/b");

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution succeeds");
        assert_eq!(resolved.path, "/a/b");
    }

    #[tokio::test]
    async fn test_handler_sees_original_request() {
        let handlers = TokenHandlers::new().with(
            "method",
            from_fn(|request: &Value, _| {
                Ok(request["method"].as_str().map(str::to_lowercase))
            }),
        );
        let request = FixtureRequest::new("PUT", "/{method}");

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution succeeds");
        assert_eq!(resolved.path, "/put");
    }

    #[tokio::test]
    async fn test_handler_failure_aborts() {
        let handlers = TokenHandlers::new()
            .with("boom", from_fn(|_, _| Err(TokenError::new("no session"))));
        let request = FixtureRequest::new("GET", "/{boom}");

        let err = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect_err("handler error must propagate");
        assert!(matches!(err, HarnessError::TokenHandler { ref name, .. } if name == "boom"));
    }

    #[tokio::test]
    async fn test_tokens_in_json_body_are_stringified() {
        let handlers =
            TokenHandlers::new().with("name", from_fn(|_, _| Ok(Some("ada".to_string()))));
        let mut request = FixtureRequest::new("POST", "/users");
        request
            .headers
            .insert("content-type".into(), "application/json".into());
        request.body = Some(json!({"name": "{name}", "tags": ["x"]}));

        let resolved = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect("resolution succeeds");
        assert_eq!(resolved.body.as_deref(), Some(r#"{"name":"ada","tags":["x"]}"#));
    }

    #[tokio::test]
    async fn test_value_breaking_json_is_reported() {
        let handlers =
            TokenHandlers::new().with("quote", from_fn(|_, _| Ok(Some("\"".to_string()))));
        let request = FixtureRequest::new("GET", "/{quote}");

        let err = TokenResolver::new(&handlers)
            .resolve(&request)
            .await
            .expect_err("invalid text must fail to parse");
        assert!(matches!(err, HarnessError::TokenOutput(_)));
    }
}
