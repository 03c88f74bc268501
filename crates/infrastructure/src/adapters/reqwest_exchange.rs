//! HTTP exchange implementation using reqwest.
//!
//! Sends a resolved fixture request to the service under test and hands the
//! response to `ExpectedResponse::verify` before returning it.

use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use replay_application::ports::{Exchange, ExchangeError, ExpectedResponse};
use replay_domain::{ActualResponse, Headers, ResolvedRequest};
use url::Url;

/// Exchange adapter backed by `reqwest::Client`.
///
/// Redirects are not followed so fixtures can record 3xx responses.
#[derive(Debug, Clone)]
pub struct ReqwestExchange {
    client: Client,
    base_url: Url,
}

impl ReqwestExchange {
    /// Creates an exchange sending requests to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(base_url: Url) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates an exchange with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends a fixture path (with query) to the base URL.
    ///
    /// Any path prefix on the base URL is kept.
    fn url_for(&self, path: &str) -> Result<Url, ExchangeError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };
        let joined = format!("{base}{separator}{path}");
        Url::parse(&joined).map_err(|e| ExchangeError::Transport(format!("{e}: {joined}")))
    }
}

/// Collects response headers with lowercase names; repeated headers are joined with ", ".
fn collect_headers(headers: &reqwest::header::HeaderMap) -> Headers {
    let mut collected = Headers::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

impl Exchange for ReqwestExchange {
    async fn exchange(
        &self,
        request: &ResolvedRequest,
        expected: &ExpectedResponse,
    ) -> Result<ActualResponse, ExchangeError> {
        let url = self.url_for(&request.path)?;
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| ExchangeError::Transport(format!("invalid method {}: {e}", request.method)))?;

        tracing::debug!(method = %method, %url, "sending fixture request");

        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| ExchangeError::Transport(format!("Failed to read body: {e}")))?
            .to_vec();

        expected.verify(ActualResponse::new(status, headers, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn exchange(base: &str) -> ReqwestExchange {
        ReqwestExchange::with_client(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn test_url_for_keeps_query() {
        let url = exchange("http://localhost:8080").url_for("/user/42?x=1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/user/42?x=1");
    }

    #[test]
    fn test_url_for_keeps_base_prefix() {
        let url = exchange("http://localhost:8080/api/").url_for("/items").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/items");

        let url = exchange("http://localhost:8080/api").url_for("items").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/items");
    }

    #[test]
    fn test_collect_headers_joins_duplicates() {
        let mut map = HeaderMap::new();
        map.append("Set-Cookie", HeaderValue::from_static("a=1"));
        map.append("set-cookie", HeaderValue::from_static("b=2"));
        map.insert("Content-Type", HeaderValue::from_static("text/plain"));

        let headers = collect_headers(&map);
        assert_eq!(headers.get("set-cookie").map(String::as_str), Some("a=1, b=2"));
        assert_eq!(
            headers.get("content-type").map(String::as_str),
            Some("text/plain")
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestExchange::new(Url::parse("http://localhost").unwrap()).is_ok());
    }
}
