//! Retried HTTP entry points

use crate::error::{FetchError, FetchRetryError};
use crate::http::{FetchRequest, HttpFetch, HttpResponse};
use crate::observability::{RequestMetadata, RequestTimer, SequenceMetadata};
use crate::resolver::FetchResolver;
use fetch_retry_core::retry::{RetryDriver, RetryOptions};
use std::sync::atomic::{AtomicU32, Ordering};

/// Options for retried fetches over the default HTTP types.
pub type FetchRetryOptions = RetryOptions<HttpResponse, FetchError>;

/// Send `request` with the default fetch function, retrying per `options`.
///
/// The fetch function is resolved once with [`FetchResolver::default`]. When
/// `options` has no predicate, the default one is used: any error and any
/// non-2xx response is retried.
///
/// The request is cloned for every attempt.
///
/// # Errors
///
/// - [`FetchRetryError::Config`] if no fetch function can be resolved or the
///   options are invalid; nothing is sent
/// - [`FetchRetryError::Rejected`] if an attempt failed and the predicate declined to retry
/// - [`FetchRetryError::Exhausted`] if the predicate still wanted a retry when
///   the budget ran out
/// - [`FetchRetryError::Classification`] if a custom fallible predicate gave up
///
/// # Example
///
/// ```rust,no_run
/// use fetch_retry::{FetchRequest, FetchRetryOptions, fetch_with_retry};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = FetchRetryOptions::builder()
///     .retries(5)
///     .min_timeout(Duration::from_millis(250))
///     .build();
///
/// let response = fetch_with_retry(options, FetchRequest::get("https://example.com/")?).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_with_retry(
    options: FetchRetryOptions,
    request: FetchRequest,
) -> Result<HttpResponse, FetchRetryError> {
    fetch_with_retry_resolved(&FetchResolver::default(), options, request).await
}

/// Like [`fetch_with_retry`], resolving the fetch function with `resolver`.
pub async fn fetch_with_retry_resolved(
    resolver: &FetchResolver,
    options: FetchRetryOptions,
    request: FetchRequest,
) -> Result<HttpResponse, FetchRetryError> {
    let (_source, fetch) = resolver.resolve()?;
    drive(&*fetch, options.or_default_retry_on(), request).await
}

/// Send `request` with a caller-supplied fetch function, retrying per `options`.
///
/// Without a predicate the default one cannot know what `fetch_fn` returns, so
/// `options` must carry one.
///
/// # Errors
///
/// Same as [`fetch_with_retry`]. A missing predicate is
/// [`ConfigError::MissingRetryPredicate`](fetch_retry_core::ConfigError::MissingRetryPredicate),
/// reported before `fetch_fn` is called.
pub async fn fetch_with_retry_using<F>(
    fetch_fn: F,
    options: FetchRetryOptions,
    request: FetchRequest,
) -> Result<HttpResponse, FetchRetryError>
where
    F: HttpFetch,
{
    drive(&fetch_fn, options, request).await
}

async fn drive(
    fetch: &dyn HttpFetch,
    options: FetchRetryOptions,
    request: FetchRequest,
) -> Result<HttpResponse, FetchRetryError> {
    let metadata = RequestMetadata::from_request(&request);
    let timer = RequestTimer::start();
    let attempts = AtomicU32::new(0);

    let metadata_ref = &metadata;
    let attempts_ref = &attempts;

    let result = RetryDriver::new(options)
        .run(
            |request: FetchRequest| async move {
                attempts_ref.fetch_add(1, Ordering::Relaxed);
                metadata_ref.log_attempt(fetch.name());

                let attempt = RequestTimer::start();
                let outcome = fetch.fetch(request).await;
                match &outcome {
                    Ok(response) => metadata_ref.log_response(response, attempt.elapsed()),
                    Err(e) => metadata_ref.log_failure(&e.to_string(), attempt.elapsed()),
                }
                outcome
            },
            request,
        )
        .await;

    let sequence = SequenceMetadata::new(
        attempts.load(Ordering::Relaxed).saturating_sub(1),
        timer.elapsed(),
    );
    match &result {
        Ok(response) => sequence.log_success(&metadata, response.status().as_u16()),
        Err(e) => sequence.log_error(&metadata, &e.to_string()),
    }

    result
}
