//! Retry options and their builder.

use super::predicate::{Inspect, default_retry_on};
use super::{Backoff, DEFAULT_FACTOR, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT, DEFAULT_RETRIES};
use super::Outcome;
use crate::error::{ClassificationError, ConfigError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether an outcome warrants another attempt.
///
/// Receives the outcome and the number of retries still available.
pub type RetryOn<T, E> =
    Arc<dyn Fn(&Outcome<T, E>, u32) -> Result<bool, ClassificationError> + Send + Sync>;

/// Observes every outcome that is about to be retried.
///
/// Receives the outcome and the number of retries available before this one.
/// Not called when the predicate asks for a retry but the budget is spent.
/// The budget check runs before the observer, so `retries = N` means at most
/// N calls; callers expecting a final call on the exhausted attempt will not get one.
pub type OnRetry<T, E> = Arc<dyn Fn(&Outcome<T, E>, u32) + Send + Sync>;

/// Configuration for one attempt sequence.
///
/// Build with [`RetryOptions::builder`]. Options are immutable once built and
/// cheap to clone; predicates and observers are shared.
///
/// # Examples
///
/// ```rust
/// use fetch_retry_core::retry::RetryOptions;
/// use std::time::Duration;
///
/// let options = RetryOptions::<u16, std::io::Error>::builder()
///     .retries(5)
///     .factor(1.5)
///     .min_timeout(Duration::from_millis(200))
///     .max_timeout(Duration::from_secs(5))
///     .retry_on(|outcome, _remaining| matches!(outcome, Ok(503) | Err(_)))
///     .build();
///
/// assert_eq!(options.retries(), 5);
/// ```
pub struct RetryOptions<T, E> {
    retries: u32,
    backoff: Backoff,
    retry_on: Option<RetryOn<T, E>>,
    on_retry: Option<OnRetry<T, E>>,
}

impl<T, E> RetryOptions<T, E> {
    /// Create a new builder.
    pub fn builder() -> RetryOptionsBuilder<T, E> {
        RetryOptionsBuilder::default()
    }

    /// Maximum number of retries after the first attempt.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Backoff applied between attempts.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Whether a retry predicate was supplied.
    pub fn has_retry_on(&self) -> bool {
        self.retry_on.is_some()
    }

    /// The retry predicate, if any.
    pub fn retry_on(&self) -> Option<&RetryOn<T, E>> {
        self.retry_on.as_ref()
    }

    /// Report an outcome to the `on_retry` observer, if any.
    pub(crate) fn notify_retry(&self, outcome: &Outcome<T, E>, remaining: u32) {
        if let Some(on_retry) = &self.on_retry {
            on_retry(outcome, remaining);
        }
    }

    /// Check that the options can drive an attempt sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `factor` is negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.backoff.factor();
        if !factor.is_finite() || factor < 0.0 {
            return Err(ConfigError::InvalidOption(format!(
                "factor must be a finite, non-negative number, got {}",
                factor
            )));
        }
        Ok(())
    }
}

impl<T: Inspect + 'static, E: 'static> RetryOptions<T, E> {
    /// Fill in [`default_retry_on`] if no predicate was supplied.
    pub fn or_default_retry_on(mut self) -> Self {
        if self.retry_on.is_none() {
            self.retry_on = Some(Arc::new(default_retry_on::<T, E>));
        }
        self
    }
}

impl<T, E> Default for RetryOptions<T, E> {
    /// Defaults: 3 retries, factor 2, 1s to 10s, no jitter, no predicate, no observer.
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: Backoff::default(),
            retry_on: None,
            on_retry: None,
        }
    }
}

impl<T, E> Clone for RetryOptions<T, E> {
    fn clone(&self) -> Self {
        Self {
            retries: self.retries,
            backoff: self.backoff,
            retry_on: self.retry_on.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<T, E> fmt::Debug for RetryOptions<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("retries", &self.retries)
            .field("backoff", &self.backoff)
            .field("retry_on", &self.retry_on.as_ref().map(|_| "<fn>"))
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Builder for [`RetryOptions`].
///
/// Unset values fall back to the defaults documented on each setter.
pub struct RetryOptionsBuilder<T, E> {
    retries: Option<u32>,
    factor: Option<f64>,
    min_timeout: Option<Duration>,
    max_timeout: Option<Duration>,
    randomize: Option<bool>,
    retry_on: Option<RetryOn<T, E>>,
    on_retry: Option<OnRetry<T, E>>,
}

impl<T, E> Default for RetryOptionsBuilder<T, E> {
    fn default() -> Self {
        Self {
            retries: None,
            factor: None,
            min_timeout: None,
            max_timeout: None,
            randomize: None,
            retry_on: None,
            on_retry: None,
        }
    }
}

impl<T, E> RetryOptionsBuilder<T, E> {
    /// Set the maximum number of retries.
    ///
    /// Default: 3
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the backoff multiplier.
    ///
    /// Default: 2.0
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Set the base delay.
    ///
    /// Default: 1s
    pub fn min_timeout(mut self, timeout: Duration) -> Self {
        self.min_timeout = Some(timeout);
        self
    }

    /// Set the delay cap.
    ///
    /// Default: 10s
    pub fn max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = Some(timeout);
        self
    }

    /// Scale each delay by a random value in `[0, 1)`.
    ///
    /// Default: false
    pub fn randomize(mut self, randomize: bool) -> Self {
        self.randomize = Some(randomize);
        self
    }

    /// Set an infallible retry predicate.
    pub fn retry_on<F>(mut self, retry_on: F) -> Self
    where
        F: Fn(&Outcome<T, E>, u32) -> bool + Send + Sync + 'static,
        T: 'static,
        E: 'static,
    {
        self.retry_on = Some(Arc::new(move |outcome: &Outcome<T, E>, remaining: u32| {
            Ok(retry_on(outcome, remaining))
        }));
        self
    }

    /// Set a retry predicate that may refuse to classify an outcome.
    pub fn try_retry_on<F>(mut self, retry_on: F) -> Self
    where
        F: Fn(&Outcome<T, E>, u32) -> Result<bool, ClassificationError> + Send + Sync + 'static,
    {
        self.retry_on = Some(Arc::new(retry_on));
        self
    }

    /// Set the observer called before every retry.
    pub fn on_retry<F>(mut self, on_retry: F) -> Self
    where
        F: Fn(&Outcome<T, E>, u32) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(on_retry));
        self
    }

    /// Build the options, using defaults for anything unset.
    pub fn build(self) -> RetryOptions<T, E> {
        RetryOptions {
            retries: self.retries.unwrap_or(DEFAULT_RETRIES),
            backoff: Backoff::new(
                self.factor.unwrap_or(DEFAULT_FACTOR),
                self.min_timeout.unwrap_or(DEFAULT_MIN_TIMEOUT),
                self.max_timeout.unwrap_or(DEFAULT_MAX_TIMEOUT),
                self.randomize.unwrap_or(false),
            ),
            retry_on: self.retry_on,
            on_retry: self.on_retry,
        }
    }
}

impl<T: Inspect + 'static, E: 'static> RetryOptionsBuilder<T, E> {
    /// Explicitly select [`default_retry_on`] as the predicate.
    pub fn retry_on_default(mut self) -> Self {
        self.retry_on = Some(Arc::new(default_retry_on::<T, E>));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::{Value, json};

    #[test]
    fn test_builder_defaults() {
        let options = RetryOptions::<Value, String>::builder().build();

        assert_eq!(options.retries(), 3);
        assert_eq!(options.backoff().factor(), 2.0);
        assert_eq!(options.backoff().min_timeout(), Duration::from_millis(1000));
        assert_eq!(options.backoff().max_timeout(), Duration::from_millis(10_000));
        assert!(!options.backoff().randomize());
        assert!(!options.has_retry_on());
    }

    #[test]
    fn test_builder_custom_values() {
        let options = RetryOptions::<Value, String>::builder()
            .retries(5)
            .factor(1.5)
            .min_timeout(Duration::from_millis(200))
            .max_timeout(Duration::from_secs(30))
            .randomize(true)
            .retry_on(|_, _| false)
            .build();

        assert_eq!(options.retries(), 5);
        assert_eq!(options.backoff().factor(), 1.5);
        assert_eq!(options.backoff().min_timeout(), Duration::from_millis(200));
        assert_eq!(options.backoff().max_timeout(), Duration::from_secs(30));
        assert!(options.backoff().randomize());
        assert!(options.has_retry_on());
    }

    #[test]
    fn test_retry_on_is_wrapped() {
        let options = RetryOptions::<u16, String>::builder()
            .retry_on(|outcome, remaining| remaining > 0 && *outcome == Ok(503))
            .build();
        let retry_on = options.retry_on().unwrap();

        assert_eq!(retry_on(&Ok(503), 1), Ok(true));
        assert_eq!(retry_on(&Ok(503), 0), Ok(false));
        assert_eq!(retry_on(&Ok(200), 1), Ok(false));
    }

    #[test]
    fn test_default_predicate_selection() {
        let explicit = RetryOptions::<Value, String>::builder()
            .retry_on_default()
            .build();
        let filled = RetryOptions::<Value, String>::default().or_default_retry_on();

        for options in [explicit, filled] {
            let retry_on = options.retry_on().unwrap();
            assert_eq!(retry_on(&Ok(json!({ "status": 429 })), 2), Ok(true));
            assert_eq!(
                retry_on(&Ok(json!(42)), 2),
                Err(ClassificationError::UnexpectedType("number"))
            );
        }
    }

    #[test]
    fn test_or_default_keeps_custom_predicate() {
        let options = RetryOptions::<Value, String>::builder()
            .retry_on(|_, _| true)
            .build()
            .or_default_retry_on();

        let retry_on = options.retry_on().unwrap();
        assert_eq!(retry_on(&Ok(json!({ "ok": true })), 2), Ok(true));
    }

    #[test]
    fn test_validate_rejects_bad_factor() {
        for factor in [f64::NAN, f64::INFINITY, -1.0] {
            let options = RetryOptions::<Value, String>::builder()
                .factor(factor)
                .build();
            assert_matches!(options.validate(), Err(ConfigError::InvalidOption(_)));
        }

        let options = RetryOptions::<Value, String>::builder().factor(0.0).build();
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = RetryOptions::<Value, String>::builder()
            .on_retry(|_, _| {})
            .build();
        let debug = format!("{:?}", options);

        assert!(debug.contains("retries: 3"));
        assert!(debug.contains("<fn>"));
    }
}
