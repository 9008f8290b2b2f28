//! HTTP request and response types and the request-function seam
//!
//! Any [`HttpFetch`] implementation can be retried. With the `reqwest` feature
//! enabled, [`ReqwestFetch`] is the default one.

pub use provider::{HttpFetch, SharedFetch};
#[cfg(feature = "reqwest")]
pub use reqwest_fetch::{ReqwestFetch, ReqwestFetchBuilder};
pub use request::FetchRequest;
pub use response::HttpResponse;

pub mod provider;
#[cfg(feature = "reqwest")]
mod reqwest_fetch;
mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
