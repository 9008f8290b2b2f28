//! The attempt loop.

use super::{Outcome, RetryOptions};
use crate::error::{ConfigError, RetryError};
use std::future::Future;

/// Runs a request function until the predicate is satisfied or the retry
/// budget is spent.
///
/// One driver can serve any number of calls; each call keeps its own retry
/// counter and shares nothing with concurrent calls.
///
/// # Lifecycle
///
/// ```text
/// Idle -> Attempting -> Settled-Success
///                    -> Settled-Failure
///                    -> Retrying -> Attempting
/// ```
///
/// # Examples
///
/// ```rust
/// use fetch_retry_core::retry::{RetryDriver, RetryOptions};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = RetryDriver::new(
///     RetryOptions::<u16, std::io::Error>::builder()
///         .retries(2)
///         .min_timeout(Duration::from_millis(10))
///         .retry_on(|outcome, _| matches!(outcome, Ok(503) | Err(_)))
///         .build(),
/// );
///
/// let status = driver
///     .run(|path: &'static str| async move {
///         let _ = path;
///         Ok::<_, std::io::Error>(200u16)
///     }, "/health")
///     .await?;
/// assert_eq!(status, 200);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryDriver<T, E> {
    options: RetryOptions<T, E>,
}

impl<T, E> RetryDriver<T, E> {
    /// Create a driver from its options.
    pub fn new(options: RetryOptions<T, E>) -> Self {
        Self { options }
    }

    /// The options this driver runs with.
    pub fn options(&self) -> &RetryOptions<T, E> {
        &self.options
    }

    /// Run `request_fn` with a fresh clone of `args` for every attempt.
    ///
    /// # Errors
    ///
    /// - [`RetryError::Config`] if no predicate was supplied or the options are
    ///   invalid; `request_fn` is not called.
    /// - [`RetryError::Classification`] if the predicate cannot classify an outcome.
    /// - [`RetryError::Rejected`] if a failure was not worth retrying.
    /// - [`RetryError::Exhausted`] if the predicate still wanted a retry when
    ///   the budget ran out.
    pub async fn run<A, F, Fut>(&self, request_fn: F, args: A) -> Result<T, RetryError<T, E>>
    where
        A: Clone,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        self.execute(|| request_fn(args.clone())).await
    }

    /// Run a zero-argument operation.
    ///
    /// Same contract as [`run`](Self::run).
    pub async fn execute<F, Fut>(&self, mut operation: F) -> Result<T, RetryError<T, E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        let retry_on = self
            .options
            .retry_on()
            .ok_or(ConfigError::MissingRetryPredicate)?;
        self.options.validate()?;

        let total = self.options.retries();
        let backoff = self.options.backoff();
        let mut remaining = total;

        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(attempt = total - remaining + 1, remaining, "starting attempt");

            let outcome = operation().await;

            let should_retry = match retry_on(&outcome, remaining) {
                Ok(should_retry) => should_retry,
                Err(source) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %source, "retry predicate could not classify outcome");
                    return Err(RetryError::Classification { source, outcome });
                }
            };

            if !should_retry {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    retries = total - remaining,
                    success = outcome.is_ok(),
                    "attempt sequence settled"
                );
                return outcome.map_err(RetryError::Rejected);
            }

            if remaining == 0 {
                #[cfg(feature = "tracing")]
                tracing::warn!(retries = total, "retry budget exhausted");
                return Err(RetryError::Exhausted {
                    outcome,
                    retries: total,
                });
            }

            // Only retries that actually happen are observed
            self.options.notify_retry(&outcome, remaining);

            remaining -= 1;
            let delay = backoff.delay(total - remaining);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                remaining,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "retrying after backoff"
            );

            tokio::time::sleep(delay).await;
        }
    }
}

/// Run `request_fn` once plus up to `options.retries()` retries.
///
/// Shorthand for `RetryDriver::new(options).run(request_fn, args)`.
pub async fn run<T, E, A, F, Fut>(
    options: RetryOptions<T, E>,
    request_fn: F,
    args: A,
) -> Result<T, RetryError<T, E>>
where
    A: Clone,
    F: Fn(A) -> Fut,
    Fut: Future<Output = Outcome<T, E>>,
{
    RetryDriver::new(options).run(request_fn, args).await
}
