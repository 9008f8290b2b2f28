//! Retry driver, backoff and retry predicates.
//!
//! # Key Types
//!
//! - [`RetryDriver`] - runs a request function until it settles
//! - [`RetryOptions`] - retry budget, backoff bounds, predicate and observer
//! - [`Backoff`] - bounded exponential delays with optional jitter
//! - [`Inspect`] - lets [`default_retry_on`] classify a response type
//!
//! # Examples
//!
//! ```rust
//! use fetch_retry_core::retry::{RetryOptions, run};
//! use serde_json::{Value, json};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = RetryOptions::<Value, std::io::Error>::builder()
//!     .retries(3)
//!     .min_timeout(Duration::from_millis(100))
//!     .retry_on_default()
//!     .build();
//!
//! let _body = run(
//!     options,
//!     |url: &'static str| async move {
//!         // Your request here
//!         Ok::<_, std::io::Error>(json!({ "url": url, "status": 200, "ok": true }))
//!     },
//!     "https://example.com",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod driver;
mod options;
mod predicate;

use std::time::Duration;

pub use backoff::Backoff;
pub use driver::{RetryDriver, run};
pub use options::{OnRetry, RetryOn, RetryOptions, RetryOptionsBuilder};
pub use predicate::{Inspect, RETRYABLE_STATUS_CODES, Shape, default_retry_on};

/// What one attempt produced: the request function's value or its error.
pub type Outcome<T, E> = Result<T, E>;

/// Default retry budget.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default backoff multiplier.
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Default base delay.
pub const DEFAULT_MIN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Default delay cap.
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_millis(10_000);
