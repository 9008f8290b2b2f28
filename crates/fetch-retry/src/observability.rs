//! Structured logging for fetch attempts and retry sequences
//!
//! Every attempt made through the default HTTP entry points is logged through
//! this module, so the field names stay consistent across transports.

use crate::http::{FetchRequest, HttpResponse};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Capture the loggable parts of a request
    pub fn from_request(request: &FetchRequest) -> Self {
        Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body_size: request.body_bytes().map(|body| body.len()),
        }
    }

    /// Log an attempt being sent
    pub fn log_attempt(&self, fetch_name: &str) {
        debug!(
            method = %self.method,
            url = %self.url,
            body_size = self.body_size,
            fetch = %fetch_name,
            "Sending HTTP request"
        );
    }

    /// Log an attempt's response
    pub fn log_response(&self, response: &HttpResponse, elapsed: Duration) {
        debug!(
            method = %self.method,
            url = %self.url,
            status = response.status().as_u16(),
            body_size = response.body().len(),
            elapsed_ms = elapsed_ms(elapsed),
            "Received HTTP response"
        );
    }

    /// Log an attempt that failed before producing a response
    pub fn log_failure(&self, error: &str, elapsed: Duration) {
        debug!(
            method = %self.method,
            url = %self.url,
            error = %error,
            elapsed_ms = elapsed_ms(elapsed),
            "HTTP request failed"
        );
    }
}

/// Summary of a finished retry sequence
#[derive(Debug, Clone)]
pub struct SequenceMetadata {
    /// Number of retries taken (0 if none)
    pub retries: u32,
    /// Total time across attempts and backoff
    pub elapsed: Duration,
}

impl SequenceMetadata {
    /// Create new sequence metadata
    pub fn new(retries: u32, elapsed: Duration) -> Self {
        Self { retries, elapsed }
    }

    /// Log a sequence that ended with a response
    pub fn log_success(&self, request: &RequestMetadata, status: u16) {
        info!(
            method = %request.method,
            url = %request.url,
            status,
            retries = self.retries,
            elapsed_ms = elapsed_ms(self.elapsed),
            "HTTP fetch settled"
        );
    }

    /// Log a sequence that ended with an error
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            url = %request.url,
            retries = self.retries,
            elapsed_ms = elapsed_ms(self.elapsed),
            error = %error,
            "HTTP fetch failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a `tracing-subscriber` formatter filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber is already set.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
