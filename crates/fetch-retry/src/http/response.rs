//! HTTP response handling

use crate::error::{FetchError, Result};
use bytes::Bytes;
use fetch_retry_core::retry::{Inspect, Shape};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// A fully buffered HTTP response.
///
/// Non-2xx statuses are responses, not errors: whether a `503` is worth
/// another attempt is the retry predicate's call.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Option<Url>,
}

impl HttpResponse {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url: None,
        }
    }

    /// Record the URL the response was served from.
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response is successful (2xx status).
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Final URL, after redirects, if the transport reported one.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Get the body as a string.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| FetchError::Body(e.to_string()))
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(FetchError::Serialization)
    }
}

impl Inspect for HttpResponse {
    fn shape(&self) -> Shape {
        Shape::response(self.ok(), self.status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetch_retry_core::retry::default_retry_on;
    use rstest::rstest;
    use serde_json::Value;

    fn response(status: u16, body: &'static str) -> HttpResponse {
        HttpResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            body,
        )
    }

    #[test]
    fn test_ok_is_2xx() {
        assert!(response(200, "").ok());
        assert!(response(204, "").ok());
        assert!(!response(301, "").ok());
        assert!(!response(404, "").ok());
        assert!(!response(503, "").ok());
    }

    #[test]
    fn test_text_and_json() {
        let response = response(200, r#"{"id": 7}"#);

        assert_eq!(response.text().unwrap(), r#"{"id": 7}"#);
        let value: Value = response.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_invalid_json_body() {
        let result = response(200, "not json").json::<Value>();
        assert!(matches!(result, Err(FetchError::Serialization(_))));
    }

    // An HTTP response always carries an `ok` flag, so any non-2xx is retried
    #[rstest]
    #[case(200, false)]
    #[case(204, false)]
    #[case(404, true)]
    #[case(408, true)]
    #[case(429, true)]
    #[case(503, true)]
    fn test_default_predicate_uses_ok_flag(#[case] status: u16, #[case] retry: bool) {
        let outcome: std::result::Result<HttpResponse, FetchError> = Ok(response(status, ""));
        assert_eq!(default_retry_on(&outcome, 3), Ok(retry));
    }
}
