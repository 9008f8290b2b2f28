//! Request-function trait for abstracting HTTP transports
//!
//! This module defines the `HttpFetch` trait: the thing a retry sequence
//! calls once per attempt. The crate ships a `reqwest` implementation; tests
//! and callers with their own transport implement it directly.

use super::{FetchRequest, HttpResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A fetch function shared between resolver, options and attempts.
pub type SharedFetch = Arc<dyn HttpFetch>;

/// Request function for one HTTP attempt.
///
/// Implementations send the request exactly once. They must not retry on
/// their own, and should return non-2xx responses as `Ok` so the retry
/// predicate can see them.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use fetch_retry::http::{FetchRequest, HeaderMap, HttpFetch, HttpResponse, StatusCode};
///
/// #[derive(Debug)]
/// struct AlwaysOk;
///
/// #[async_trait]
/// impl HttpFetch for AlwaysOk {
///     async fn fetch(&self, _request: FetchRequest) -> fetch_retry::Result<HttpResponse> {
///         Ok(HttpResponse::new(StatusCode::OK, HeaderMap::new(), "ok"))
///     }
///
///     fn name(&self) -> &'static str {
///         "always-ok"
///     }
/// }
/// ```
#[async_trait]
pub trait HttpFetch: Send + Sync + fmt::Debug {
    /// Send `request` once and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the response cannot
    /// be read. HTTP error statuses are not errors.
    async fn fetch(&self, request: FetchRequest) -> Result<HttpResponse>;

    /// Get the fetch function name for debugging/logging.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<F: HttpFetch + ?Sized> HttpFetch for Arc<F> {
    async fn fetch(&self, request: FetchRequest) -> Result<HttpResponse> {
        (**self).fetch(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
