//! Default request-function resolution
//!
//! When `fetch_with_retry` is called without a fetch function, one is looked up
//! in a fixed order:
//!
//! 1. [`FetchSource::Global`]: installed with [`install_global_fetch`]
//! 2. [`FetchSource::Platform`]: scoped to the current task with [`with_fetch`]
//! 3. [`FetchSource::Environment`]: a `reqwest` client configured from
//!    `FETCH_RETRY_*` variables, when any client setting is present
//! 4. [`FetchSource::Fallback`]: a plain `reqwest` client
//!
//! Sources 3 and 4 need the `reqwest` feature (3 also needs `env`).

#[cfg(all(feature = "env", feature = "reqwest"))]
use crate::config::FetchConfig;
use crate::http::{HttpFetch, SharedFetch};
use fetch_retry_core::ConfigError;
use std::fmt;
use std::future::Future;
#[cfg(all(feature = "env", feature = "reqwest"))]
use std::sync::Mutex;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static GLOBAL_FETCH: OnceLock<RwLock<Option<SharedFetch>>> = OnceLock::new();

tokio::task_local! {
    static SCOPED_FETCH: SharedFetch;
}

fn global_slot() -> &'static RwLock<Option<SharedFetch>> {
    GLOBAL_FETCH.get_or_init(|| RwLock::new(None))
}

/// Install a process-wide default fetch function.
///
/// Returns the previously installed one, if any.
pub fn install_global_fetch(fetch: impl HttpFetch + 'static) -> Option<SharedFetch> {
    let fetch: SharedFetch = Arc::new(fetch);
    tracing::debug!(fetch = fetch.name(), "installing global fetch function");
    global_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .replace(fetch)
}

/// Remove the process-wide default fetch function.
///
/// Returns the removed one, if any.
pub fn clear_global_fetch() -> Option<SharedFetch> {
    global_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Run `future` with `fetch` as the task-scoped default fetch function.
///
/// Scopes nest; the innermost one wins. A globally installed fetch function
/// still takes precedence under the default resolver.
pub async fn with_fetch<F>(fetch: impl HttpFetch + 'static, future: F) -> F::Output
where
    F: Future,
{
    SCOPED_FETCH.scope(Arc::new(fetch), future).await
}

/// Where a default fetch function can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSource {
    /// Installed with [`install_global_fetch`].
    Global,
    /// Scoped to the current task with [`with_fetch`].
    Platform,
    /// A `reqwest` client configured from `FETCH_RETRY_*` variables.
    Environment,
    /// A plain `reqwest` client.
    Fallback,
}

impl FetchSource {
    /// All sources in default resolution order.
    pub const ALL: [FetchSource; 4] = [
        FetchSource::Global,
        FetchSource::Platform,
        FetchSource::Environment,
        FetchSource::Fallback,
    ];

    fn lookup(self) -> Result<Option<SharedFetch>, ConfigError> {
        match self {
            FetchSource::Global => Ok(global_slot()
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()),
            FetchSource::Platform => Ok(SCOPED_FETCH.try_with(Arc::clone).ok()),
            FetchSource::Environment => environment_fetch(),
            FetchSource::Fallback => fallback_fetch(),
        }
    }
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchSource::Global => "global",
            FetchSource::Platform => "platform",
            FetchSource::Environment => "environment",
            FetchSource::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

#[cfg(all(feature = "env", feature = "reqwest"))]
fn environment_fetch() -> Result<Option<SharedFetch>, ConfigError> {
    let config = FetchConfig::from_env();
    if !config.has_client_overrides() {
        return Ok(None);
    }

    // Reuse the client while the client settings are unchanged
    static ENVIRONMENT: OnceLock<Mutex<Option<(FetchConfig, SharedFetch)>>> = OnceLock::new();
    let mut cached = ENVIRONMENT
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some((cached_config, fetch)) = cached.as_ref()
        && same_client_settings(cached_config, &config)
    {
        return Ok(Some(Arc::clone(fetch)));
    }

    let fetch: SharedFetch = Arc::new(
        crate::http::ReqwestFetch::from_config(&config)
            .map_err(|e| ConfigError::InvalidOption(e.to_string()))?,
    );
    *cached = Some((config, Arc::clone(&fetch)));
    Ok(Some(fetch))
}

#[cfg(all(feature = "env", feature = "reqwest"))]
fn same_client_settings(a: &FetchConfig, b: &FetchConfig) -> bool {
    a.request_timeout == b.request_timeout && a.proxy == b.proxy && a.user_agent == b.user_agent
}

#[cfg(not(all(feature = "env", feature = "reqwest")))]
fn environment_fetch() -> Result<Option<SharedFetch>, ConfigError> {
    Ok(None)
}

#[cfg(feature = "reqwest")]
fn fallback_fetch() -> Result<Option<SharedFetch>, ConfigError> {
    static FALLBACK: OnceLock<SharedFetch> = OnceLock::new();

    if let Some(fetch) = FALLBACK.get() {
        return Ok(Some(Arc::clone(fetch)));
    }

    let fetch: SharedFetch = Arc::new(
        crate::http::ReqwestFetch::new().map_err(|e| ConfigError::InvalidOption(e.to_string()))?,
    );
    Ok(Some(Arc::clone(FALLBACK.get_or_init(|| fetch))))
}

#[cfg(not(feature = "reqwest"))]
fn fallback_fetch() -> Result<Option<SharedFetch>, ConfigError> {
    Ok(None)
}

/// Looks up a default fetch function from an ordered list of sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResolver {
    sources: Vec<FetchSource>,
}

impl Default for FetchResolver {
    /// All four sources in their fixed order.
    fn default() -> Self {
        Self::new(FetchSource::ALL)
    }
}

impl FetchResolver {
    /// Create a resolver that checks `sources` in the given order.
    pub fn new(sources: impl IntoIterator<Item = FetchSource>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    /// The sources checked, in order.
    pub fn sources(&self) -> &[FetchSource] {
        &self.sources
    }

    /// Return the first fetch function found, with the source it came from.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoRequestFunction`] if no source provides one
    /// - [`ConfigError::InvalidOption`] if environment settings cannot build a client
    pub fn resolve(&self) -> Result<(FetchSource, SharedFetch), ConfigError> {
        for &source in &self.sources {
            if let Some(fetch) = source.lookup()? {
                tracing::debug!(%source, fetch = fetch.name(), "resolved fetch function");
                return Ok((source, fetch));
            }
        }

        Err(ConfigError::NoRequestFunction { feature: "reqwest" })
    }
}
