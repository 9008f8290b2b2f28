//! # fetch-retry
//!
//! HTTP fetch with automatic retries:
//! - Exponential backoff bounded by a minimum and maximum delay, with optional jitter
//! - A default retry predicate that retries failures and non-2xx responses
//! - Custom predicates and an `on_retry` observer
//! - Pluggable request functions, with a `reqwest` default resolved at call time
//! - Configuration from code, serde or `FETCH_RETRY_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fetch_retry::{FetchRequest, FetchRetryOptions, fetch_with_retry};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = FetchRetryOptions::builder()
//!         .retries(3)
//!         .min_timeout(Duration::from_millis(500))
//!         .on_retry(|outcome, remaining| {
//!             eprintln!("retrying ({} left): {:?}", remaining, outcome.as_ref().map(|r| r.status()));
//!         })
//!         .build();
//!
//!     let response = fetch_with_retry(options, FetchRequest::get("https://example.com/")?).await?;
//!     println!("{}", response.text()?);
//!     Ok(())
//! }
//! ```
//!
//! Any async function can be retried with [`run`], which is re-exported from
//! `fetch-retry-core`.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use config::FetchConfig;
pub use error::{FetchError, FetchRetryError, Result};
pub use fetch::{FetchRetryOptions, fetch_with_retry, fetch_with_retry_resolved, fetch_with_retry_using};
pub use crate::http::{FetchRequest, HttpFetch, HttpResponse, SharedFetch};
#[cfg(feature = "reqwest")]
pub use crate::http::ReqwestFetch;
pub use resolver::{FetchResolver, FetchSource, clear_global_fetch, install_global_fetch, with_fetch};

pub use fetch_retry_core::retry::{
    Backoff, Inspect, Outcome, RetryDriver, RetryOptions, RetryOptionsBuilder, Shape,
    default_retry_on, run,
};
pub use fetch_retry_core::{ClassificationError, ConfigError, RetryError};

// Module declarations
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod observability;
pub mod resolver;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use fetch_retry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ConfigError, FetchConfig, FetchError, FetchRequest, FetchRetryError, FetchRetryOptions,
        HttpFetch, HttpResponse, RetryError, RetryOptions, fetch_with_retry,
        fetch_with_retry_using, run,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_core_defaults_are_shared() {
        let options = FetchRetryOptions::default();
        let config = FetchConfig::default();

        assert_eq!(options.retries(), config.retries);
        assert_eq!(options.backoff().min_timeout(), config.min_timeout);
        assert_eq!(options.backoff().max_timeout(), config.max_timeout);
    }
}
