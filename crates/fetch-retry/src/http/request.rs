//! HTTP request description

use crate::error::{FetchError, Result};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// A request a fetch function can send.
///
/// Cloned once per attempt, so the body is held as [`Bytes`].
///
/// # Example
///
/// ```rust
/// use fetch_retry::FetchRequest;
/// use std::time::Duration;
///
/// let request = FetchRequest::get("https://example.com/items")?
///     .try_header("accept", "application/json")?
///     .timeout(Duration::from_secs(5));
///
/// assert_eq!(request.url().path(), "/items");
/// # Ok::<(), fetch_retry::FetchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl FetchRequest {
    /// Create a new request.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Parse `url` and create a request with `method`.
    ///
    /// # Errors
    /// Returns [`FetchError::InvalidUrl`] if `url` does not parse.
    pub fn parse(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| FetchError::InvalidUrl(format!("'{}': {}", url, e)))?;
        Ok(Self::new(method, url))
    }

    /// A `GET` request.
    pub fn get(url: &str) -> Result<Self> {
        Self::parse(Method::GET, url)
    }

    /// A `POST` request.
    pub fn post(url: &str) -> Result<Self> {
        Self::parse(Method::POST, url)
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn try_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let key_str = key.as_ref();
        let value_str = value.as_ref();

        let key = key_str.parse::<HeaderName>().map_err(|e| {
            FetchError::InvalidHeader(format!("Invalid header name '{}': {}", key_str, e))
        })?;
        let value = value_str.parse::<HeaderValue>().map_err(|e| {
            FetchError::InvalidHeader(format!("Invalid header value '{}': {}", value_str, e))
        })?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Set a header from already-validated parts.
    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set `content-type`.
    ///
    /// # Errors
    /// Returns [`FetchError::Serialization`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body))
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the body.
    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Get the per-request timeout.
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_get_parses_url() {
        let request = FetchRequest::get("https://example.com/a?b=c").unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().host_str(), Some("example.com"));
        assert_eq!(request.url().query(), Some("b=c"));
        assert!(request.body_bytes().is_none());
        assert!(request.timeout_duration().is_none());
    }

    #[test]
    fn test_invalid_url() {
        assert_matches!(FetchRequest::get("not a url"), Err(FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_try_header_rejects_invalid_name() {
        let request = FetchRequest::get("https://example.com").unwrap();
        assert_matches!(
            request.try_header("bad header", "x"),
            Err(FetchError::InvalidHeader(_))
        );
    }

    #[test]
    fn test_json_body() {
        let request = FetchRequest::post("https://example.com/items")
            .unwrap()
            .json(&json!({ "name": "widget" }))
            .unwrap();

        assert_eq!(
            request.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(
            request.body_bytes().unwrap().as_ref(),
            br#"{"name":"widget"}"#
        );
    }

    #[test]
    fn test_clone_shares_body() {
        let request = FetchRequest::post("https://example.com")
            .unwrap()
            .body("payload")
            .timeout(Duration::from_secs(3));
        let clone = request.clone();

        assert_eq!(clone.body_bytes(), request.body_bytes());
        assert_eq!(clone.timeout_duration(), Some(Duration::from_secs(3)));
    }
}
