#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry machinery for the fetch-retry workspace.
//!
//! This crate is transport-agnostic. It provides:
//!
//! - **A retry driver** that runs any async request function, one attempt at a
//!   time, until a predicate is satisfied or the retry budget is spent
//! - **Exponential backoff** bounded by a minimum and maximum timeout, with
//!   optional full jitter
//! - **A default retry predicate** that classifies response-like values by
//!   their shape (an `ok` flag or a status code)
//!
//! HTTP transport, default request functions and configuration loading live in
//! the `fetch-retry` crate.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use fetch_retry_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = RetryDriver::new(
//!     RetryOptions::<u16, std::io::Error>::builder()
//!         .retries(3)
//!         .min_timeout(Duration::from_millis(100))
//!         .retry_on(|outcome, _| matches!(outcome, Ok(503) | Err(_)))
//!         .build(),
//! );
//!
//! let status = driver.execute(|| async { Ok::<_, std::io::Error>(200u16) }).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `tracing`: emit `tracing` events for every attempt, retry and settlement.

pub mod error;
pub mod retry;

pub use error::{ClassificationError, ConfigError, RetryError};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use fetch_retry_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ClassificationError, ConfigError, RetryError};
    pub use crate::retry::{
        Backoff, Inspect, Outcome, RetryDriver, RetryOptions, RetryOptionsBuilder, Shape,
        default_retry_on, run,
    };
}
