//! Error types for the retry driver.
//!
//! Errors fall into three groups:
//!
//! - [`ConfigError`]: the driver was asked to run with options it cannot use.
//!   Reported before the first attempt and never retried.
//! - [`ClassificationError`]: the default predicate could not decide whether an
//!   outcome is retryable.
//! - [`RetryError`]: everything a finished attempt sequence can end with other
//!   than success, carrying the last observed outcome where one exists.

use crate::retry::Outcome;
use thiserror::Error;

/// The options handed to the driver are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A custom request function was supplied without a retry predicate.
    #[error(
        "a custom request function requires an explicit retry predicate; \
         supply `retry_on`, or omit the request function to use the default one"
    )]
    MissingRetryPredicate,

    /// No request function was supplied and none could be resolved.
    #[error(
        "unable to find a request function; either pass a fetch function together \
         with `retry_on`, or enable the `{feature}` feature of `fetch-retry`"
    )]
    NoRequestFunction {
        /// Cargo feature that provides a default request function.
        feature: &'static str,
    },

    /// An option value cannot produce a usable backoff.
    #[error("invalid retry option: {0}")]
    InvalidOption(String),
}

/// The default retry predicate cannot classify an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The outcome is a primitive value rather than a record.
    #[error("unexpected result type: expected object, got {0}")]
    UnexpectedType(&'static str),

    /// The outcome has neither an `ok` flag nor a status-like numeric field.
    #[error(
        "unable to determine if request can be retried; if you are manually \
         providing a fetch function, you must also provide a retry predicate"
    )]
    Unclassifiable,
}

/// Terminal failure of an attempt sequence.
///
/// `T` and `E` are the success and failure payloads of the request function.
#[derive(Debug, Error)]
pub enum RetryError<T, E> {
    /// The options were rejected before any attempt was made.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The predicate failed while evaluating `outcome`.
    #[error("{source}")]
    Classification {
        /// Why classification failed.
        #[source]
        source: ClassificationError,
        /// The outcome being evaluated.
        outcome: Outcome<T, E>,
    },

    /// The request function failed and the predicate declined to retry.
    #[error("request failed: {0}")]
    Rejected(E),

    /// The predicate still recommended a retry when the budget ran out.
    #[error("retry budget exhausted after {retries} retries")]
    Exhausted {
        /// Last observed outcome.
        outcome: Outcome<T, E>,
        /// Retry budget the sequence started with.
        retries: u32,
    },
}

impl<T, E> RetryError<T, E> {
    /// Whether the sequence ran out of retries.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    /// Whether the options were rejected before any attempt.
    pub fn is_config(&self) -> bool {
        matches!(self, RetryError::Config(_))
    }

    /// The last observed outcome, if the sequence got far enough to have one.
    pub fn outcome(&self) -> Option<&Outcome<T, E>> {
        match self {
            RetryError::Classification { outcome, .. } | RetryError::Exhausted { outcome, .. } => {
                Some(outcome)
            }
            RetryError::Config(_) | RetryError::Rejected(_) => None,
        }
    }

    /// Consume the error and return the last observed outcome.
    ///
    /// A [`RetryError::Rejected`] error is returned as `Err(error)`.
    pub fn into_outcome(self) -> Option<Outcome<T, E>> {
        match self {
            RetryError::Classification { outcome, .. } | RetryError::Exhausted { outcome, .. } => {
                Some(outcome)
            }
            RetryError::Rejected(error) => Some(Err(error)),
            RetryError::Config(_) => None,
        }
    }
}
