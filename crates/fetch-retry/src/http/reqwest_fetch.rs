//! Default request function backed by `reqwest`

use super::{FetchRequest, HttpFetch, HttpResponse};
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Request function backed by a shared `reqwest::Client`.
///
/// Performs exactly one HTTP exchange per call. Non-2xx responses are returned
/// as responses, not errors, so the retry predicate decides what to do with
/// them. Clones share the connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use fetch_retry::http::ReqwestFetch;
/// use std::time::Duration;
///
/// let fetch = ReqwestFetch::builder()
///     .timeout(Duration::from_secs(30))
///     .user_agent("my-service/1.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestFetch {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestFetch {
    /// Create a fetch function with a default client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpClient`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new builder for configuring the client.
    pub fn builder() -> ReqwestFetchBuilder {
        ReqwestFetchBuilder::default()
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Build a fetch function from the client settings of a [`FetchConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpClient`] if the proxy URL is invalid or the
    /// client cannot be built.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build()
    }

    /// Default per-attempt timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<HttpResponse> {
        let timeout = request.timeout_duration().or(self.timeout);

        let mut req = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());

        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        if let Some(body) = request.body_bytes() {
            req = req.body(body.clone());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        tracing::trace!(
            status = status.as_u16(),
            body_size = body.len(),
            "reqwest exchange complete"
        );

        Ok(HttpResponse::new(status, headers, body).with_url(url))
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// Builder for [`ReqwestFetch`].
#[derive(Debug, Default)]
pub struct ReqwestFetchBuilder {
    timeout: Option<Duration>,
    proxy: Option<String>,
    user_agent: Option<String>,
    client: Option<reqwest::Client>,
}

impl ReqwestFetchBuilder {
    /// Set the default per-attempt timeout.
    ///
    /// A timeout on the [`FetchRequest`] itself takes precedence.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Route every request through a proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the User-Agent header.
    ///
    /// Defaults to `fetch-retry/<version>`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a pre-built client. Proxy and User-Agent settings are then ignored.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the fetch function.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpClient`] if the proxy URL is invalid or the
    /// client cannot be built.
    pub fn build(self) -> Result<ReqwestFetch> {
        let client = match self.client {
            Some(client) => client,
            None => {
                let user_agent = self
                    .user_agent
                    .unwrap_or_else(|| format!("fetch-retry/{}", crate::VERSION));
                let mut builder = reqwest::Client::builder().user_agent(user_agent);

                if let Some(proxy) = self.proxy {
                    let proxy = reqwest::Proxy::all(&proxy).map_err(|e| {
                        FetchError::HttpClient(format!("Invalid proxy '{}': {}", proxy, e))
                    })?;
                    builder = builder.proxy(proxy);
                }

                builder
                    .build()
                    .map_err(|e| FetchError::HttpClient(e.to_string()))?
            }
        };

        Ok(ReqwestFetch {
            client,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let fetch = ReqwestFetch::new().unwrap();
        assert_eq!(fetch.timeout(), None);
        assert_eq!(fetch.name(), "reqwest");
    }

    #[test]
    fn test_from_config() {
        let config = FetchConfig {
            request_timeout: Some(Duration::from_secs(7)),
            user_agent: Some("svc/1.0".to_string()),
            ..Default::default()
        };

        let fetch = ReqwestFetch::from_config(&config).unwrap();
        assert_eq!(fetch.timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_invalid_proxy_is_rejected() {
        let result = ReqwestFetch::builder().proxy("not a url").build();
        assert!(matches!(result, Err(FetchError::HttpClient(_))));
    }

    #[test]
    fn test_existing_client_is_kept() {
        let fetch = ReqwestFetch::builder()
            .client(reqwest::Client::new())
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        assert_eq!(fetch.timeout(), Some(Duration::from_millis(500)));
    }
}
