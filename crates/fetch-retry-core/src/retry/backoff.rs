//! Exponential backoff with optional full jitter.

use std::time::Duration;

/// Exponential backoff bounded by a minimum and maximum timeout.
///
/// Delays grow as `min_timeout * factor^n`, capped at `max_timeout`, where `n`
/// is the number of retries already spent (counting the one about to happen).
///
/// # Mathematical Formula
///
/// ```text
/// base_delay  = min(max_timeout, min_timeout * factor ^ attempts_made)
/// final_delay = randomize ? base_delay * random[0, 1) : base_delay
/// ```
///
/// With the default options (`min_timeout` = 1s, `factor` = 2) the first retry
/// therefore waits 2s, the second 4s and the third 8s.
///
/// # Examples
///
/// ```rust
/// use fetch_retry_core::retry::Backoff;
/// use std::time::Duration;
///
/// let backoff = Backoff::new(2.0, Duration::from_millis(100), Duration::from_secs(1), false);
///
/// assert_eq!(backoff.delay(1), Duration::from_millis(200));
/// assert_eq!(backoff.delay(10), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    factor: f64,
    min_timeout: Duration,
    max_timeout: Duration,
    randomize: bool,
}

impl Backoff {
    /// Create a backoff from its raw parameters.
    pub fn new(factor: f64, min_timeout: Duration, max_timeout: Duration, randomize: bool) -> Self {
        Self {
            factor,
            min_timeout,
            max_timeout,
            randomize,
        }
    }

    /// Multiplier applied per spent retry.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Lower delay bound, before the exponent is applied.
    pub fn min_timeout(&self) -> Duration {
        self.min_timeout
    }

    /// Upper delay bound.
    pub fn max_timeout(&self) -> Duration {
        self.max_timeout
    }

    /// Whether delays are jittered.
    pub fn randomize(&self) -> bool {
        self.randomize
    }

    /// Deterministic delay for the given number of spent retries.
    pub fn base_delay(&self, attempts_made: u32) -> Duration {
        let max = self.max_timeout.as_secs_f64();
        let exponent = i32::try_from(attempts_made).unwrap_or(i32::MAX);
        let raw = self.min_timeout.as_secs_f64() * self.factor.powi(exponent);

        // powi overflows to infinity long before the cap matters
        if !raw.is_finite() || raw >= max {
            return self.max_timeout;
        }
        Duration::try_from_secs_f64(raw.max(0.0)).unwrap_or(self.max_timeout)
    }

    /// Delay to wait before the next attempt.
    ///
    /// Equal to [`base_delay`](Self::base_delay) unless `randomize` is set, in
    /// which case it is scaled by a uniform random value in `[0, 1)`.
    pub fn delay(&self, attempts_made: u32) -> Duration {
        let base = self.base_delay(attempts_made);
        if self.randomize {
            let scaled = base.as_secs_f64() * rand::random::<f64>();
            Duration::try_from_secs_f64(scaled).map_or(base, |delay| delay.min(base))
        } else {
            base
        }
    }
}

impl Default for Backoff {
    /// Defaults: `factor` 2, `min_timeout` 1s, `max_timeout` 10s, no jitter.
    fn default() -> Self {
        Self {
            factor: super::DEFAULT_FACTOR,
            min_timeout: super::DEFAULT_MIN_TIMEOUT,
            max_timeout: super::DEFAULT_MAX_TIMEOUT,
            randomize: false,
        }
    }
}
