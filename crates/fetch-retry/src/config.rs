//! Configuration for retried fetches

use fetch_retry_core::retry::{
    DEFAULT_FACTOR, DEFAULT_MAX_TIMEOUT, DEFAULT_MIN_TIMEOUT, DEFAULT_RETRIES, RetryOptions,
    RetryOptionsBuilder,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for retried fetches.
///
/// Holds the retry knobs plus the settings used to build the default
/// request function. Durations are (de)serialized as milliseconds.
///
/// ```rust
/// use fetch_retry::config::FetchConfig;
/// use std::time::Duration;
///
/// let config: FetchConfig = serde_json::from_str(r#"{ "retries": 5, "min_timeout": 250 }"#).unwrap();
/// assert_eq!(config.retries, 5);
/// assert_eq!(config.min_timeout, Duration::from_millis(250));
/// assert_eq!(config.max_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of retries after the first attempt
    pub retries: u32,

    /// Backoff multiplier
    pub factor: f64,

    /// Base delay between attempts
    #[serde(with = "duration_ms")]
    pub min_timeout: Duration,

    /// Delay cap
    #[serde(with = "duration_ms")]
    pub max_timeout: Duration,

    /// Scale each delay by a random value in `[0, 1)`
    pub randomize: bool,

    /// Timeout for a single attempt of the default request function
    #[serde(with = "option_duration_ms", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,

    /// HTTP proxy URL for the default request function
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// User-Agent header for the default request function
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            factor: DEFAULT_FACTOR,
            min_timeout: DEFAULT_MIN_TIMEOUT,
            max_timeout: DEFAULT_MAX_TIMEOUT,
            randomize: false,
            request_timeout: None,
            proxy: None,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded on the first call, if present.
    /// This will look for:
    /// - `FETCH_RETRY_RETRIES` for the retry count
    /// - `FETCH_RETRY_FACTOR` for the backoff multiplier
    /// - `FETCH_RETRY_MIN_TIMEOUT_MS` / `FETCH_RETRY_MAX_TIMEOUT_MS` for delay bounds
    /// - `FETCH_RETRY_RANDOMIZE` (`true`/`false`) for jitter
    /// - `FETCH_RETRY_TIMEOUT_SECS` for the per-attempt request timeout
    /// - `FETCH_RETRY_PROXY` for an HTTP proxy
    /// - `FETCH_RETRY_USER_AGENT` for the User-Agent header
    ///
    /// Values that fail to parse are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> Self {
        use std::env;

        static LOAD_DOTENV: std::sync::Once = std::sync::Once::new();
        LOAD_DOTENV.call_once(|| {
            let _ = dotenvy::dotenv();
        });

        let mut config = Self::default();

        if let Some(retries) = parse_var::<u32>("FETCH_RETRY_RETRIES") {
            config.retries = retries;
        }

        if let Some(factor) = parse_var::<f64>("FETCH_RETRY_FACTOR") {
            config.factor = factor;
        }

        if let Some(ms) = parse_var::<u64>("FETCH_RETRY_MIN_TIMEOUT_MS") {
            config.min_timeout = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_var::<u64>("FETCH_RETRY_MAX_TIMEOUT_MS") {
            config.max_timeout = Duration::from_millis(ms);
        }

        if let Some(randomize) = parse_var::<bool>("FETCH_RETRY_RANDOMIZE") {
            config.randomize = randomize;
        }

        if let Some(secs) = parse_var::<u64>("FETCH_RETRY_TIMEOUT_SECS") {
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(proxy) = env::var("FETCH_RETRY_PROXY") {
            config.proxy = Some(proxy);
        }

        if let Ok(user_agent) = env::var("FETCH_RETRY_USER_AGENT") {
            config.user_agent = Some(user_agent);
        }

        config
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Fields of `other` still at their default value do not override.
    pub fn merge(mut self, other: FetchConfig) -> Self {
        let defaults = FetchConfig::default();

        if other.retries != defaults.retries {
            self.retries = other.retries;
        }
        if other.factor != defaults.factor {
            self.factor = other.factor;
        }
        if other.min_timeout != defaults.min_timeout {
            self.min_timeout = other.min_timeout;
        }
        if other.max_timeout != defaults.max_timeout {
            self.max_timeout = other.max_timeout;
        }
        if other.randomize {
            self.randomize = true;
        }
        if other.request_timeout.is_some() {
            self.request_timeout = other.request_timeout;
        }
        if other.proxy.is_some() {
            self.proxy = other.proxy;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }

        self
    }

    /// Whether any setting of the default request function differs from a
    /// plain client.
    pub fn has_client_overrides(&self) -> bool {
        self.request_timeout.is_some() || self.proxy.is_some() || self.user_agent.is_some()
    }

    /// Seed a [`RetryOptionsBuilder`] with the retry settings.
    ///
    /// The predicate and observer are left for the caller.
    pub fn retry_options<T, E>(&self) -> RetryOptionsBuilder<T, E> {
        RetryOptions::builder()
            .retries(self.retries)
            .factor(self.factor)
            .min_timeout(self.min_timeout)
            .max_timeout(self.max_timeout)
            .randomize(self.randomize)
    }
}

#[cfg(feature = "env")]
fn parse_var<V: std::str::FromStr>(name: &str) -> Option<V> {
    std::env::var(name).ok()?.trim().parse().ok()
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod option_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(duration) => super::duration_ms::serialize(duration, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}
